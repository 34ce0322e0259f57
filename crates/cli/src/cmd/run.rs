//! Implementation of the `kbuild run` command.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use kbuild_lib::serve::{exec_server, server_invocation};

use super::build::{print_report, run_build};

/// Build the application, then hand the process over to the server runtime.
pub fn cmd_run(app: Option<&Path>) -> Result<()> {
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let report = rt.block_on(run_build(app))?;
  // The runtime's worker threads must be gone before exec.
  drop(rt);

  print_report(&report);

  info!(cmd = %server_invocation(&report.app), "starting server");
  exec_server(&report.root, &report.app)?;
  Ok(())
}
