use std::fs;
use std::io;
use std::path::Path;

/// Create a single directory with the given permission bits. The mode is
/// ignored on platforms without Unix permissions.
pub fn create_dir_mode(path: &Path, mode: u32) -> io::Result<()> {
  #[cfg(unix)]
  {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().mode(mode).create(path)
  }

  #[cfg(not(unix))]
  {
    let _ = mode;
    fs::create_dir(path)
  }
}

/// Remove a file, treating "not found" as success.
pub fn remove_file_if_exists(path: &Path) -> io::Result<bool> {
  match fs::remove_file(path) {
    Ok(()) => Ok(true),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
    Err(e) => Err(e),
  }
}
