//! Removal of build products.
//!
//! Cleaning never fails on an individual file: anything that can't be removed
//! is logged and left behind.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::Serialize;
use tracing::warn;

use crate::build::BuildContext;
use crate::process::Toolchain;
use crate::util::dirs::remove_file_if_exists;
use crate::walk::{WalkError, walk};

#[derive(Debug, Default, Serialize)]
pub struct CleanReport {
  /// Files removed from the object cache.
  pub removed: Vec<PathBuf>,
  pub obj_dir_removed: bool,
  pub library_removed: bool,
}

/// Empty and remove `.objs/`, then remove `<app>.so`.
pub fn clean(ctx: &BuildContext) -> Result<CleanReport, WalkError> {
  let mut report = CleanReport::default();
  let obj_dir = ctx.obj_dir();

  if obj_dir.is_dir() {
    walk::<WalkError, _>(&obj_dir, |path, _| {
      match fs::remove_file(path) {
        Ok(()) => report.removed.push(path.to_path_buf()),
        Err(e) => warn!(path = %path.display(), error = %e, "couldn't unlink"),
      }
      Ok(())
    })?;

    match fs::remove_dir(&obj_dir) {
      Ok(()) => report.obj_dir_removed = true,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {}
      Err(e) => warn!(path = %obj_dir.display(), error = %e, "couldn't rmdir"),
    }
  }

  let library = Toolchain::new(&ctx.root, ctx.config.clone()).library_path(&ctx.app);
  match remove_file_if_exists(&library) {
    Ok(removed) => report.library_removed = removed,
    Err(e) => warn!(path = %library.display(), error = %e, "couldn't unlink"),
  }

  Ok(report)
}
