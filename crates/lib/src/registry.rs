//! Ordered collection of build units for one invocation.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::consts::{OBJ_DIR, OBJ_EXT};
use crate::stale::FileStamp;

/// Language of a build unit. Each variant compiles with its own diagnostic
/// flag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
  C,
  Cpp,
}

impl Language {
  /// Classify a source path by extension. Returns `None` for anything that
  /// isn't a recognized source file.
  pub fn from_path(path: &Path) -> Option<Self> {
    match path.extension()?.to_str()? {
      "c" => Some(Language::C),
      "cpp" => Some(Language::Cpp),
      _ => None,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Language::C => "c",
      Language::Cpp => "c++",
    }
  }
}

/// Extra data carried by a unit generated from a static asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetMeta {
  pub stem: String,
  pub extension: String,
  /// Exact byte count of the asset, without the trailing NUL.
  pub length: u32,
  pub mtime: i64,
}

impl AssetMeta {
  pub fn data_symbol(&self) -> String {
    format!("asset_{}_{}", self.stem, self.extension)
  }

  pub fn len_symbol(&self) -> String {
    format!("asset_len_{}_{}", self.stem, self.extension)
  }

  pub fn mtime_symbol(&self) -> String {
    format!("asset_mtime_{}_{}", self.stem, self.extension)
  }

  /// `extern` declarations for the generated header.
  pub fn declarations(&self) -> String {
    format!(
      "extern u_int8_t {}[];\nextern u_int32_t {};\nextern time_t {};\n",
      self.data_symbol(),
      self.len_symbol(),
      self.mtime_symbol()
    )
  }
}

/// One source (or generated source) file tracked for compilation.
#[derive(Debug, Clone, Serialize)]
pub struct SourceUnit {
  pub name: String,
  pub source_path: PathBuf,
  pub object_path: PathBuf,
  pub stamp: FileStamp,
  pub build_required: bool,
  pub language: Language,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub asset: Option<AssetMeta>,
}

impl SourceUnit {
  pub fn new(
    name: impl Into<String>,
    source_path: PathBuf,
    object_path: PathBuf,
    stamp: FileStamp,
    build_required: bool,
    language: Language,
  ) -> Self {
    Self {
      name: name.into(),
      source_path,
      object_path,
      stamp,
      build_required,
      language,
      asset: None,
    }
  }

  pub fn with_asset(mut self, meta: AssetMeta) -> Self {
    self.asset = Some(meta);
    self
  }

  pub fn is_asset(&self) -> bool {
    self.asset.is_some()
  }
}

/// `<root>/.objs/<name>.o`, keeping the raw bytes of `name`.
pub fn object_path(root: &Path, name: impl AsRef<OsStr>) -> PathBuf {
  let mut file = name.as_ref().to_os_string();
  file.push(".");
  file.push(OBJ_EXT);
  root.join(OBJ_DIR).join(file)
}

/// Build units in discovery order.
///
/// Units are never removed or deduplicated. Two sources sharing a file name in
/// different subdirectories map to the same object path; keeping the layout
/// flat is up to the application.
#[derive(Debug, Default)]
pub struct SourceRegistry {
  units: Vec<SourceUnit>,
}

impl SourceRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(&mut self, unit: SourceUnit) {
    self.units.push(unit);
  }

  pub fn len(&self) -> usize {
    self.units.len()
  }

  pub fn is_empty(&self) -> bool {
    self.units.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &SourceUnit> {
    self.units.iter()
  }

  pub fn units_requiring_build(&self) -> impl Iterator<Item = &SourceUnit> {
    self.units.iter().filter(|u| u.build_required)
  }

  pub fn any_build_required(&self) -> bool {
    self.units.iter().any(|u| u.build_required)
  }

  pub fn uses(&self, language: Language) -> bool {
    self.units.iter().any(|u| u.language == language)
  }
}
