//! External compiler and linker processes.
//!
//! [`ProcessRunner`] is the single seam through which the build starts child
//! processes. Every failure it reports is fatal to the build; there are no
//! retries. [`SystemRunner`] is the real implementation, [`Toolchain`] builds
//! the argument vectors.

mod toolchain;

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

pub use toolchain::Toolchain;

/// Program plus argument vector for one child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
  pub program: OsString,
  pub args: Vec<OsString>,
}

impl Invocation {
  pub fn new(program: impl Into<OsString>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
    }
  }

  pub fn arg(&mut self, arg: impl Into<OsString>) -> &mut Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(&mut self, args: I) -> &mut Self
  where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  /// Value following the first `-o` argument.
  pub fn output(&self) -> Option<&OsStr> {
    let pos = self.args.iter().position(|a| a == "-o")?;
    self.args.get(pos + 1).map(OsString::as_os_str)
  }
}

impl fmt::Display for Invocation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program.to_string_lossy())?;
    for arg in &self.args {
      write!(f, " {}", arg.to_string_lossy())?;
    }
    Ok(())
  }
}

#[derive(Debug, Error)]
pub enum ProcessError {
  #[error("failed to start {program}: {source}")]
  Spawn { program: String, source: io::Error },

  #[error("failed to wait for {program}: {source}")]
  Wait { program: String, source: io::Error },

  #[error("subprocess trouble, check output: {program} exited with status {code}")]
  Exit { program: String, code: i32 },

  #[error("subprocess trouble, check output: {program} killed by signal {signal}")]
  Signal { program: String, signal: i32 },

  #[error("subprocess trouble, check output: {program} dumped core")]
  CoreDump { program: String },

  #[error("{program} did not finish within {}s", timeout.as_secs())]
  Timeout { program: String, timeout: Duration },
}

/// Runs a child process to completion.
#[allow(async_fn_in_trait)]
pub trait ProcessRunner {
  async fn run(&self, invocation: &Invocation) -> Result<(), ProcessError>;
}

/// Spawns real child processes with inherited stdio.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
  timeout: Option<Duration>,
}

impl SystemRunner {
  pub fn new(timeout: Option<Duration>) -> Self {
    Self { timeout }
  }
}

impl ProcessRunner for SystemRunner {
  async fn run(&self, invocation: &Invocation) -> Result<(), ProcessError> {
    let program = invocation.program.to_string_lossy().into_owned();
    debug!(cmd = %invocation, "spawning process");

    let mut child = Command::new(&invocation.program)
      .args(&invocation.args)
      .kill_on_drop(true)
      .spawn()
      .map_err(|e| ProcessError::Spawn {
        program: program.clone(),
        source: e,
      })?;

    let status = match self.timeout {
      Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
        Ok(status) => status,
        Err(_) => {
          // Reap before reporting.
          let _ = child.kill().await;
          return Err(ProcessError::Timeout { program, timeout: limit });
        }
      },
      None => child.wait().await,
    }
    .map_err(|e| ProcessError::Wait {
      program: program.clone(),
      source: e,
    })?;

    check_status(program, status)
  }
}

/// Map a finished child's status onto the build's failure kinds.
pub fn check_status(program: String, status: ExitStatus) -> Result<(), ProcessError> {
  if status.success() {
    return Ok(());
  }

  #[cfg(unix)]
  {
    use std::os::unix::process::ExitStatusExt;
    if status.core_dumped() {
      return Err(ProcessError::CoreDump { program });
    }
    if let Some(signal) = status.signal() {
      return Err(ProcessError::Signal { program, signal });
    }
  }

  Err(ProcessError::Exit {
    program,
    code: status.code().unwrap_or(-1),
  })
}
