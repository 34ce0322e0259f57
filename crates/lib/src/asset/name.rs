//! Symbol names derived from asset file names.

use std::ffi::{OsStr, OsString};

use super::AssetError;

/// A sanitized asset name split into stem and extension tag.
///
/// `stem` and `extension` feed the C symbol names. The generated files on
/// disk are named from the raw bytes so distinct non-UTF-8 names never share
/// an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetName {
  pub stem: String,
  pub extension: String,
  unit_file: OsString,
}

impl AssetName {
  /// Split `file_name` at its final `.` and replace every `.`, whitespace
  /// character and `-` with `_`.
  pub fn parse(file_name: impl AsRef<OsStr>) -> Result<Self, AssetError> {
    let file_name = file_name.as_ref();
    let Some((stem, extension)) = split_sanitized(file_name) else {
      return Err(AssetError::NoExtension {
        name: file_name.to_string_lossy().into_owned(),
      });
    };

    let mut unit_file = stem.clone();
    unit_file.push("_");
    unit_file.push(&extension);

    Ok(Self {
      stem: stem.to_string_lossy().into_owned(),
      extension: extension.to_string_lossy().into_owned(),
      unit_file,
    })
  }

  /// Identity of the generated unit, e.g. `logo_png`.
  pub fn unit_name(&self) -> String {
    format!("{}_{}", self.stem, self.extension)
  }

  /// [`unit_name`](Self::unit_name) without the lossy conversion, used for
  /// paths under `.objs/`.
  pub fn unit_file_name(&self) -> &OsStr {
    &self.unit_file
  }
}

fn is_separator(b: u8) -> bool {
  matches!(b, b'.' | b'-' | b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

#[cfg(unix)]
fn split_sanitized(name: &OsStr) -> Option<(OsString, OsString)> {
  use std::os::unix::ffi::{OsStrExt, OsStringExt};

  let bytes = name.as_bytes();
  let dot = bytes.iter().rposition(|&b| b == b'.')?;
  let clean = |part: &[u8]| {
    OsString::from_vec(part.iter().map(|&b| if is_separator(b) { b'_' } else { b }).collect())
  };
  Some((clean(&bytes[..dot]), clean(&bytes[dot + 1..])))
}

#[cfg(not(unix))]
fn split_sanitized(name: &OsStr) -> Option<(OsString, OsString)> {
  let name = name.to_string_lossy();
  let (stem, extension) = name.rsplit_once('.')?;
  let clean = |part: &str| -> OsString {
    part
      .chars()
      .map(|c| if c.is_ascii() && is_separator(c as u8) { '_' } else { c })
      .collect::<String>()
      .into()
  };
  Some((clean(stem), clean(extension)))
}
