//! Implementation of the `kbuild clean` command.

use anyhow::Result;

use kbuild_lib::build::BuildContext;
use kbuild_lib::clean::clean;
use kbuild_lib::config::BuildConfig;

use crate::output::{OutputFormat, print_json, print_stat, print_success};

/// Remove the object cache and the built library of the application in the
/// current directory.
pub fn cmd_clean(output: OutputFormat) -> Result<()> {
  let ctx = BuildContext::for_target(None, BuildConfig::default())?;
  let report = clean(&ctx)?;

  if output.is_json() {
    print_json(&report)?;
  } else {
    print_success("Clean complete!");
    print_stat("Objects removed", &report.removed.len().to_string());
    print_stat("Library removed", if report.library_removed { "yes" } else { "no" });
  }

  Ok(())
}
