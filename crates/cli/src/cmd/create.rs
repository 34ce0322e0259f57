//! Implementation of the `kbuild create` command.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use kbuild_lib::cert::OpensslIssuer;
use kbuild_lib::create::create;
use kbuild_lib::process::SystemRunner;

use crate::output::symbols;

/// Execute the create command.
///
/// Scaffolds a new application directory with a page handler, a server
/// configuration, a `.gitignore` and development certificates.
///
/// # Errors
///
/// Returns an error if the directory already exists or certificates can't be
/// generated.
pub fn cmd_create(path: &Path) -> Result<()> {
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let issuer = OpensslIssuer::new(SystemRunner::default());
  let result = rt.block_on(create(path, &issuer))?;

  for file in &result.files {
    println!("  {} {}", symbols::ARROW.cyan(), file.display());
  }
  println!();
  println!(
    "{} {}",
    symbols::SUCCESS.green(),
    format!("{} created successfully!", result.app).green().bold()
  );
  println!("note: do NOT use the created DH parameters/certificates in production");
  println!();
  println!("{}", "Next steps:".bold());
  println!("  1. cd {}", result.root.display().to_string().cyan());
  println!("  2. Run: {}", "kbuild run".cyan());

  Ok(())
}
