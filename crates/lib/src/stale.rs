//! Staleness tracking by exact modification-time equality.
//!
//! An object is fresh only when its mtime is *equal* to its source's. After a
//! successful compile the object's mtime is forced to the source's, so a
//! second build sees equal stamps and skips the unit without asking the
//! compiler. The check is not "source newer than object": a
//! source whose timestamp is rolled back to exactly the object's recorded
//! value will not be rebuilt.

use std::fs::{self, File, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StaleError {
  #[error("stat({}): {source}", path.display())]
  Stat { path: PathBuf, source: io::Error },
}

/// The part of a file's metadata a build cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FileStamp {
  pub size: u64,
  /// Whole seconds since the Unix epoch.
  pub mtime: i64,
}

impl FileStamp {
  pub fn from_metadata(metadata: &Metadata) -> Self {
    Self {
      size: metadata.len(),
      mtime: mtime_secs(metadata),
    }
  }

  pub fn of(path: &Path) -> io::Result<Self> {
    fs::metadata(path).map(|m| Self::from_metadata(&m))
  }

  pub fn modified(&self) -> SystemTime {
    if self.mtime >= 0 {
      UNIX_EPOCH + Duration::from_secs(self.mtime as u64)
    } else {
      UNIX_EPOCH - Duration::from_secs(self.mtime.unsigned_abs())
    }
  }
}

#[cfg(unix)]
fn mtime_secs(metadata: &Metadata) -> i64 {
  use std::os::unix::fs::MetadataExt;
  metadata.mtime()
}

#[cfg(not(unix))]
fn mtime_secs(metadata: &Metadata) -> i64 {
  match metadata.modified().map(|t| t.duration_since(UNIX_EPOCH)) {
    Ok(Ok(d)) => d.as_secs() as i64,
    Ok(Err(before)) => -(before.duration().as_secs() as i64),
    Err(_) => 0,
  }
}

/// Returns `true` if the object at `object_path` has to be (re)built from a
/// source stamped `source`.
///
/// # Errors
///
/// Any stat failure other than "not found" is fatal.
pub fn requires_build(source: &FileStamp, object_path: &Path) -> Result<bool, StaleError> {
  match fs::metadata(object_path) {
    Ok(meta) => Ok(mtime_secs(&meta) != source.mtime),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(true),
    Err(e) => Err(StaleError::Stat {
      path: object_path.to_path_buf(),
      source: e,
    }),
  }
}

/// Force the mtime of `path` to the one recorded in `stamp`.
pub fn stamp_mtime(path: &Path, stamp: &FileStamp) -> io::Result<()> {
  let file = File::options().write(true).open(path)?;
  file.set_modified(stamp.modified())
}
