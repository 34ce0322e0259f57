//! Scaffold a new application.
//!
//! Creates the application directory with:
//! - `src/<app>.c` containing a single page handler
//! - `conf/<app>.conf` serving that page on 127.0.0.1:8888
//! - `.gitignore` for build products
//! - empty `assets/` and a populated `cert/`

mod templates;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::cert::{CertError, CertIssuer};
use crate::consts::{ASSETS_DIR, CERT_DIR, CONF_DIR, CONF_EXT, SRC_DIR};
use crate::util::dirs::create_dir_mode;

pub use templates::{CONFIG_TEMPLATE, GITIGNORE_TEMPLATE, SRC_TEMPLATE};

const SCAFFOLD_DIRS: &[&str] = &[SRC_DIR, CERT_DIR, CONF_DIR, ASSETS_DIR];

#[derive(Debug, Error)]
pub enum CreateError {
  #[error("can't derive an application name from {}", path.display())]
  NoAppName { path: PathBuf },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: std::io::Error },

  #[error("failed to write file {}: {source}", path.display())]
  WriteFile { path: PathBuf, source: std::io::Error },

  #[error(transparent)]
  Cert(#[from] CertError),
}

/// Result of a successful scaffold.
#[derive(Debug, Serialize)]
pub struct CreateResult {
  pub app: String,
  pub root: PathBuf,
  /// Every file written, in creation order.
  pub files: Vec<PathBuf>,
}

/// Create a new application at `path`. The last path component names it.
///
/// # Errors
///
/// Fails if `path` already exists, if any directory or file can't be written,
/// or if certificate issuance fails.
pub async fn create<C: CertIssuer>(path: &Path, certs: &C) -> Result<CreateResult, CreateError> {
  let app = path
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .ok_or_else(|| CreateError::NoAppName { path: path.to_path_buf() })?;

  mkdir(path)?;
  for dir in SCAFFOLD_DIRS {
    mkdir(&path.join(dir))?;
  }

  let files = vec![
    write_file(
      &path.join(SRC_DIR).join(format!("{}.c", app)),
      SRC_TEMPLATE.to_string(),
    )?,
    write_file(
      &path.join(CONF_DIR).join(format!("{}.{}", app, CONF_EXT)),
      templates::render(CONFIG_TEMPLATE, &app),
    )?,
    write_file(&path.join(".gitignore"), templates::render(GITIGNORE_TEMPLATE, &app))?,
  ];

  certs.issue(&app, path).await?;

  Ok(CreateResult {
    app,
    root: path.to_path_buf(),
    files,
  })
}

fn mkdir(path: &Path) -> Result<(), CreateError> {
  create_dir_mode(path, 0o755).map_err(|e| CreateError::CreateDir {
    path: path.to_path_buf(),
    source: e,
  })
}

fn write_file(path: &Path, content: String) -> Result<PathBuf, CreateError> {
  fs::write(path, content).map_err(|e| CreateError::WriteFile {
    path: path.to_path_buf(),
    source: e,
  })?;
  info!(path = %path.display(), "created");
  Ok(path.to_path_buf())
}
