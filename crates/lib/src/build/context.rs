use std::env;
use std::path::{Path, PathBuf};

use crate::config::BuildConfig;
use crate::consts::{ASSETS_DIR, ASSETS_HEADER, CERT_DIR, CONF_DIR, CONF_EXT, OBJ_DIR, SRC_DIR};
use crate::registry::SourceRegistry;

use super::BuildError;

/// State of one build invocation.
#[derive(Debug)]
pub struct BuildContext {
  pub root: PathBuf,
  pub app: String,
  pub config: BuildConfig,
  /// Generated `src/assets.h`, present only while the build runs.
  pub header_path: PathBuf,
  pub registry: SourceRegistry,
}

impl BuildContext {
  pub fn new(root: impl Into<PathBuf>, app: impl Into<String>, config: BuildConfig) -> Self {
    let root = root.into();
    let header_path = root.join(SRC_DIR).join(ASSETS_HEADER);
    Self {
      root,
      app: app.into(),
      config,
      header_path,
      registry: SourceRegistry::new(),
    }
  }

  /// Resolve the application to build.
  ///
  /// Without a target the current directory is the root and its name is the
  /// application name. With a target, the target directory is the root and
  /// its last component names the application.
  pub fn for_target(target: Option<&Path>, config: BuildConfig) -> Result<Self, BuildError> {
    match target {
      Some(dir) => {
        // `.` and `..` carry no name of their own
        let resolved = dunce::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
        let app = resolved
          .file_name()
          .map(|n| n.to_string_lossy().into_owned())
          .ok_or_else(|| BuildError::NoAppName { path: dir.to_path_buf() })?;
        Ok(Self::new(dir, app, config))
      }
      None => {
        let cwd = env::current_dir().map_err(BuildError::CurrentDir)?;
        let app = cwd
          .file_name()
          .map(|n| n.to_string_lossy().into_owned())
          .ok_or(BuildError::NoAppName { path: cwd.clone() })?;
        Ok(Self::new(".", app, config))
      }
    }
  }

  pub fn src_dir(&self) -> PathBuf {
    self.root.join(SRC_DIR)
  }

  pub fn assets_dir(&self) -> PathBuf {
    self.root.join(ASSETS_DIR)
  }

  pub fn obj_dir(&self) -> PathBuf {
    self.root.join(OBJ_DIR)
  }

  pub fn cert_dir(&self) -> PathBuf {
    self.root.join(CERT_DIR)
  }

  /// `<root>/conf/<app>.conf`
  pub fn config_file(&self) -> PathBuf {
    self.root.join(CONF_DIR).join(format!("{}.{}", self.app, CONF_EXT))
  }
}
