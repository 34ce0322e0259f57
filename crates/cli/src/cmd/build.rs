//! Implementation of the `kbuild build` command.

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use kbuild_lib::build::{BuildContext, BuildOutcome, BuildReport, build};
use kbuild_lib::cert::OpensslIssuer;
use kbuild_lib::config::BuildConfig;
use kbuild_lib::process::SystemRunner;

use crate::output::{
  OutputFormat, format_elapsed, format_size, print_info, print_json, print_stat, print_success, print_unit,
};

/// Execute the build command.
///
/// Builds the application in `app`, or in the current directory when no
/// directory is given, and prints a summary.
pub fn cmd_build(app: Option<&Path>, output: OutputFormat) -> Result<()> {
  let start = Instant::now();

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let report = rt.block_on(run_build(app))?;

  if output.is_json() {
    print_json(&report)?;
  } else {
    print_report(&report);
    print_stat("Duration", &format_elapsed(start.elapsed()));
  }

  Ok(())
}

/// Build with settings from the environment. Shared with `kbuild run`.
pub(crate) async fn run_build(app: Option<&Path>) -> Result<BuildReport> {
  let config = BuildConfig::from_env()?;
  let runner = SystemRunner::new(config.timeout);
  let certs = OpensslIssuer::new(runner.clone());
  let ctx = BuildContext::for_target(app, config)?;

  Ok(build(ctx, &runner, &certs).await?)
}

pub(crate) fn print_report(report: &BuildReport) {
  match &report.outcome {
    BuildOutcome::Built { library } => {
      for unit in report.units.iter().filter(|u| u.build_required) {
        print_unit(unit);
      }
      print_success(&format!("{} built successfully!", report.app));
      print_stat("Units compiled", &report.compiled.len().to_string());
      print_stat("Units total", &report.units.len().to_string());
      let assets = report.units.iter().filter(|u| u.is_asset()).count();
      if assets > 0 {
        print_stat("Assets embedded", &assets.to_string());
      }
      if let Ok(meta) = fs::metadata(library) {
        print_stat("Library", &format!("{} ({})", library.display(), format_size(meta.len())));
      }
    }
    BuildOutcome::NothingToDo => print_info("nothing to be done"),
  }
}
