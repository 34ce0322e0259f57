//! Static asset embedding.
//!
//! Every file under `assets/` becomes a generated C source under `.objs/`
//! holding three symbols:
//!
//! - `asset_<stem>_<ext>`: the bytes, plus one trailing NUL that is not part
//!   of the length, so text assets can be used as C strings directly
//! - `asset_len_<stem>_<ext>`: the exact byte count as `u_int32_t`
//! - `asset_mtime_<stem>_<ext>`: the asset's modification time as `time_t`
//!
//! Matching `extern` declarations are collected in an [`AssetHeader`] which
//! the build writes to `src/assets.h` for the duration of the compile.

mod header;
mod name;

use std::ffi::OsStr;
use std::fs::{File, Metadata};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use thiserror::Error;
use tracing::{debug, info};

use crate::consts::OBJ_DIR;
use crate::registry::{AssetMeta, Language, SourceUnit, object_path};
use crate::stale::{FileStamp, StaleError, requires_build};

pub use header::AssetHeader;
pub use name::AssetName;

/// Bytes per line in the generated array initializer.
const BYTES_PER_LINE: usize = 16;

#[derive(Debug, Error)]
pub enum AssetError {
  #[error("couldn't find ext in {name}")]
  NoExtension { name: String },

  #[error("asset {} is too large to embed ({size} bytes)", path.display())]
  TooLarge { path: PathBuf, size: u64 },

  #[error("failed to open {}: {source}", path.display())]
  Open { path: PathBuf, source: io::Error },

  #[error("mmap: {} {source}", path.display())]
  Map { path: PathBuf, source: io::Error },

  #[error("failed to write {}: {source}", path.display())]
  Write { path: PathBuf, source: io::Error },

  #[error(transparent)]
  Stale(#[from] StaleError),
}

/// Turns asset files into generated build units.
pub struct AssetCompiler<'a> {
  root: &'a Path,
  header: &'a mut AssetHeader,
}

impl<'a> AssetCompiler<'a> {
  pub fn new(root: &'a Path, header: &'a mut AssetHeader) -> Self {
    Self { root, header }
  }

  /// Compile one asset.
  ///
  /// Returns `None` for an empty asset. When the generated object is already
  /// up to date the existing generated source is registered without being
  /// rewritten.
  pub fn compile(&mut self, asset_path: &Path, metadata: &Metadata) -> Result<Option<SourceUnit>, AssetError> {
    let file_name = asset_path.file_name().unwrap_or_default();
    let name = AssetName::parse(file_name)?;

    let stamp = FileStamp::from_metadata(metadata);
    if stamp.size == 0 {
      info!(asset = %name.unit_name(), "skipping empty asset");
      return Ok(None);
    }

    let length = u32::try_from(stamp.size).map_err(|_| AssetError::TooLarge {
      path: asset_path.to_path_buf(),
      size: stamp.size,
    })?;

    let meta = AssetMeta {
      stem: name.stem.clone(),
      extension: name.extension.clone(),
      length,
      mtime: stamp.mtime,
    };

    let unit_name = name.unit_name();
    let source_path = generated_source_path(self.root, name.unit_file_name());
    let opath = object_path(self.root, name.unit_file_name());

    if !requires_build(&stamp, &opath)? {
      debug!(asset = %unit_name, "asset up to date");
      self.header.declare(&meta);
      let unit = SourceUnit::new(unit_name, source_path, opath, stamp, false, Language::C).with_asset(meta);
      return Ok(Some(unit));
    }

    info!(asset = %file_name.to_string_lossy(), "building asset");
    emit_source(asset_path, &source_path, &meta)?;
    self.header.declare(&meta);

    let unit = SourceUnit::new(unit_name, source_path, opath, stamp, true, Language::C).with_asset(meta);
    Ok(Some(unit))
  }
}

/// `<root>/.objs/<name>.c`
pub fn generated_source_path(root: &Path, unit_name: impl AsRef<OsStr>) -> PathBuf {
  let mut file = unit_name.as_ref().to_os_string();
  file.push(".c");
  root.join(OBJ_DIR).join(file)
}

/// Write the generated C source for one asset.
///
/// The asset is mapped read-only for the duration of this call only.
fn emit_source(asset_path: &Path, out_path: &Path, meta: &AssetMeta) -> Result<(), AssetError> {
  let input = File::open(asset_path).map_err(|e| AssetError::Open {
    path: asset_path.to_path_buf(),
    source: e,
  })?;

  // SAFETY: the mapping is private and read-only, and dropped before return.
  let data = unsafe { Mmap::map(&input) }.map_err(|e| AssetError::Map {
    path: asset_path.to_path_buf(),
    source: e,
  })?;

  let output = File::create(out_path).map_err(|e| AssetError::Write {
    path: out_path.to_path_buf(),
    source: e,
  })?;

  write_source(BufWriter::new(output), &data, meta).map_err(|e| AssetError::Write {
    path: out_path.to_path_buf(),
    source: e,
  })
}

fn write_source<W: Write>(mut out: W, data: &[u8], meta: &AssetMeta) -> io::Result<()> {
  writeln!(out, "/* Auto generated */")?;
  writeln!(out, "#include <sys/param.h>")?;
  writeln!(out)?;

  writeln!(out, "u_int8_t {}[] = {{", meta.data_symbol())?;
  for (i, byte) in data.iter().enumerate() {
    write!(out, "0x{:02x},", byte)?;
    if (i + 1) % BYTES_PER_LINE == 0 {
      writeln!(out)?;
    }
  }
  writeln!(out, "0x00}};")?;
  writeln!(out)?;

  writeln!(out, "u_int32_t {} = {};", meta.len_symbol(), meta.length)?;
  writeln!(out, "time_t {} = {};", meta.mtime_symbol(), meta.mtime)?;

  out.flush()
}
