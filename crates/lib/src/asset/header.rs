//! Shared header of asset declarations.

use crate::consts::ASSETS_HEADER_GUARD;
use crate::registry::AssetMeta;

/// Accumulates `extern` declarations for every embedded asset.
#[derive(Debug, Default)]
pub struct AssetHeader {
  declarations: String,
}

impl AssetHeader {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn declare(&mut self, meta: &AssetMeta) {
    self.declarations.push_str(&meta.declarations());
  }

  pub fn is_empty(&self) -> bool {
    self.declarations.is_empty()
  }

  /// Full header text wrapped in an include guard.
  pub fn render(&self) -> String {
    format!(
      "#ifndef {guard}\n#define {guard}\n{}\n#endif\n",
      self.declarations,
      guard = ASSETS_HEADER_GUARD
    )
  }
}
