//! Hand-off to the server runtime once a build is done.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::consts::{CONF_DIR, CONF_EXT, SERVER_BIN};
use crate::process::{Invocation, ProcessError};

#[derive(Debug, Error)]
pub enum ServeError {
  #[error("couldn't change directory to {}: {source}", path.display())]
  Chdir { path: PathBuf, source: io::Error },

  #[error("failed to execute {program}: {source}")]
  Exec { program: String, source: io::Error },

  #[error(transparent)]
  Process(#[from] ProcessError),
}

/// `kore -fnrc conf/<app>.conf`, relative to the application root.
pub fn server_invocation(app: &str) -> Invocation {
  let mut inv = Invocation::new(SERVER_BIN);
  inv
    .arg("-fnrc")
    .arg(Path::new(CONF_DIR).join(format!("{}.{}", app, CONF_EXT)));
  inv
}

/// Change into `root` and replace the current process with the server.
///
/// Only returns on failure.
#[cfg(unix)]
pub fn exec_server(root: &Path, app: &str) -> Result<(), ServeError> {
  use std::os::unix::process::CommandExt;

  chdir(root)?;
  let inv = server_invocation(app);
  let err = Command::new(&inv.program).args(&inv.args).exec();
  Err(ServeError::Exec {
    program: inv.program.to_string_lossy().into_owned(),
    source: err,
  })
}

/// Change into `root` and run the server until it exits.
#[cfg(not(unix))]
pub fn exec_server(root: &Path, app: &str) -> Result<(), ServeError> {
  chdir(root)?;
  let inv = server_invocation(app);
  let program = inv.program.to_string_lossy().into_owned();
  let status = Command::new(&inv.program)
    .args(&inv.args)
    .status()
    .map_err(|e| ServeError::Exec {
      program: program.clone(),
      source: e,
    })?;
  crate::process::check_status(program, status)?;
  Ok(())
}

fn chdir(root: &Path) -> Result<(), ServeError> {
  std::env::set_current_dir(root).map_err(|e| ServeError::Chdir {
    path: root.to_path_buf(),
    source: e,
  })
}
