//! Development TLS material for a freshly built application.
//!
//! The build calls a [`CertIssuer`] once, when it has to create the `cert/`
//! directory. The generated key and certificate are self-signed and only fit
//! for local development.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::consts::CERT_DIR;
use crate::process::{Invocation, ProcessError, ProcessRunner};

pub const DH_PARAMS_FILE: &str = "dh2048.pem";
pub const KEY_FILE: &str = "server.key";
pub const CERT_FILE: &str = "server.crt";

/// Validity of generated certificates.
const CERT_DAYS: u32 = 3000;

const DH2048_PEM: &str = "-----BEGIN DH PARAMETERS-----
MIIBCAKCAQEAn4f4Qn5SudFjEYPWTbUaOTLUH85YWmmPFW1+b5bRa9ygr+1wfamv
VKVT7jO8c4msSNikUf6eEfoH0H4VTCaj+Habwu+Sj+I416r3mliMD4SjNsUJrBrY
Y0QV3ZUgZz4A8ARk/WwQcRl8+ZXJz34IaLwAcpyNhoV46iHVxW0ty8ND0U4DIku/
PNayKimu4BXWXk4RfwNVP59t8DQKqjshZ4fDnbotskmSZ+e+FHrd+Kvrq/WButvV
Bzy9fYgnUlJ82g/bziCI83R2xAdtH014fR63MpElkqdNeChb94pPbEdFlNUvYIBN
xx2vTUQMqRbB4UdG2zuzzr5j98HDdblQ+wIBAg==
-----END DH PARAMETERS-----";

#[derive(Debug, Error)]
pub enum CertError {
  #[error("failed to write {}: {source}", path.display())]
  Write { path: PathBuf, source: io::Error },

  #[error("certificate generation failed: {0}")]
  Process(#[from] ProcessError),
}

/// Produces key, certificate and DH parameters for an application.
#[allow(async_fn_in_trait)]
pub trait CertIssuer {
  async fn issue(&self, app: &str, root: &Path) -> Result<(), CertError>;
}

/// Issues certificates by running the `openssl` command-line tool.
#[derive(Debug, Clone)]
pub struct OpensslIssuer<R> {
  runner: R,
}

impl<R: ProcessRunner> OpensslIssuer<R> {
  pub fn new(runner: R) -> Self {
    Self { runner }
  }

  pub fn invocation(app: &str, root: &Path) -> Invocation {
    let cert_dir = root.join(CERT_DIR);
    let mut inv = Invocation::new("openssl");
    inv
      .args(["req", "-x509", "-newkey", "rsa:2048", "-sha256", "-nodes"])
      .arg("-days")
      .arg(CERT_DAYS.to_string())
      .arg("-subj")
      .arg(format!("/C=SE/O=kore autogen: {}/CN=localhost", app))
      .arg("-keyout")
      .arg(cert_dir.join(KEY_FILE))
      .arg("-out")
      .arg(cert_dir.join(CERT_FILE));
    inv
  }
}

impl<R: ProcessRunner> CertIssuer for OpensslIssuer<R> {
  async fn issue(&self, app: &str, root: &Path) -> Result<(), CertError> {
    write_dh_params(root)?;
    info!(app = %app, "generating self-signed certificate");
    self.runner.run(&Self::invocation(app, root)).await?;
    Ok(())
  }
}

/// Write the bundled DH parameters to `<root>/dh2048.pem`.
pub fn write_dh_params(root: &Path) -> Result<PathBuf, CertError> {
  let path = root.join(DH_PARAMS_FILE);
  fs::write(&path, DH2048_PEM).map_err(|e| CertError::Write {
    path: path.clone(),
    source: e,
  })?;
  Ok(path)
}
