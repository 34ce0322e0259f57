//! Recursive enumeration of regular files under a directory.
//!
//! The walk is depth-first and follows symlinks, so every entry is classified
//! by the file it points at. Entries of one directory are visited in file-name
//! order, which keeps the discovery order of a build stable between runs.
//!
//! Failing to open any directory, the root or one below it, is fatal: skipping
//! it would silently drop its files from the build. An entry that can't be
//! stat'ed, a symlink loop, a socket or a device node is logged and skipped.

use std::fs::Metadata;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum WalkError {
  #[error("failed to open directory {}: {source}", path.display())]
  OpenRoot { path: PathBuf, source: walkdir::Error },

  #[error("failed to read directory {}: {source}", path.display())]
  OpenDir { path: PathBuf, source: walkdir::Error },
}

/// Visit every regular file reachable from `root`.
///
/// `visit` receives the full path and the (symlink-resolved) metadata of each
/// file. An error returned by the visitor stops the walk and is returned as-is.
pub fn walk<E, F>(root: &Path, mut visit: F) -> Result<(), E>
where
  E: From<WalkError>,
  F: FnMut(&Path, &Metadata) -> Result<(), E>,
{
  let walker = WalkDir::new(root).follow_links(true).sort_by_file_name();

  for entry in walker {
    let entry = match entry {
      Ok(entry) => entry,
      Err(err) if err.depth() == 0 => {
        return Err(
          WalkError::OpenRoot {
            path: root.to_path_buf(),
            source: err,
          }
          .into(),
        );
      }
      Err(err) if is_unreadable_dir(&err) => {
        let path = err.path().map(Path::to_path_buf).unwrap_or_default();
        return Err(WalkError::OpenDir { path, source: err }.into());
      }
      Err(err) => {
        let path = err.path().map(|p| p.display().to_string()).unwrap_or_default();
        warn!(path = %path, error = %err, "skipping unreadable entry");
        continue;
      }
    };

    let file_type = entry.file_type();
    if file_type.is_dir() {
      continue;
    }

    if !file_type.is_file() {
      warn!(path = %entry.path().display(), "ignoring non-regular file");
      continue;
    }

    let metadata = match entry.metadata() {
      Ok(m) => m,
      Err(err) => {
        warn!(path = %entry.path().display(), error = %err, "stat failed, skipping");
        continue;
      }
    };

    visit(entry.path(), &metadata)?;
  }

  Ok(())
}

/// A directory that exists but can't be listed. Symlink loops also point at
/// directories but are not I/O errors.
fn is_unreadable_dir(err: &walkdir::Error) -> bool {
  err.loop_ancestor().is_none() && err.io_error().is_some() && err.path().is_some_and(Path::is_dir)
}
