use std::path::{Path, PathBuf};

use tracing::info;

use super::{Invocation, ProcessError, ProcessRunner};
use crate::config::BuildConfig;
use crate::consts::{LIB_EXT, SRC_DIR};
use crate::registry::{Language, SourceRegistry, SourceUnit};

#[cfg(target_os = "macos")]
const SYSTEM_INCLUDE_DIRS: &[&str] = &[
  "/usr/local/include",
  "/opt/local/include",
  "/usr/local/opt/openssl/include",
];

#[cfg(not(target_os = "macos"))]
const SYSTEM_INCLUDE_DIRS: &[&str] = &["/usr/local/include"];

const COMMON_FLAGS: &[&str] = &[
  "-Wall",
  "-Wmissing-declarations",
  "-Wshadow",
  "-Wpointer-arith",
  "-Wcast-qual",
  "-Wsign-compare",
  "-fPIC",
  "-g",
];

const C_FLAGS: &[&str] = &["-Wstrict-prototypes", "-Wmissing-prototypes"];

const CPP_FLAGS: &[&str] = &["-Woverloaded-virtual", "-Wold-style-cast", "-Wnon-virtual-dtor"];

#[cfg(target_os = "macos")]
const SHARED_FLAGS: &[&str] = &["-dynamiclib", "-undefined", "suppress", "-flat_namespace"];

#[cfg(not(target_os = "macos"))]
const SHARED_FLAGS: &[&str] = &["-shared"];

impl Language {
  fn diagnostic_flags(self) -> &'static [&'static str] {
    match self {
      Language::C => C_FLAGS,
      Language::Cpp => CPP_FLAGS,
    }
  }
}

/// Compiler and linker command lines for one application.
#[derive(Debug, Clone)]
pub struct Toolchain {
  root: PathBuf,
  config: BuildConfig,
}

impl Toolchain {
  pub fn new(root: impl Into<PathBuf>, config: BuildConfig) -> Self {
    Self {
      root: root.into(),
      config,
    }
  }

  /// `<root>/<app>.so`
  pub fn library_path(&self, app: &str) -> PathBuf {
    self.root.join(format!("{}.{}", app, LIB_EXT))
  }

  pub fn compile_invocation(&self, unit: &SourceUnit) -> Invocation {
    let src = self.root.join(SRC_DIR);

    let mut inv = Invocation::new(&self.config.compiler);
    inv
      .arg(include_flag(&src))
      .arg(include_flag(&src.join("includes")))
      .args(SYSTEM_INCLUDE_DIRS.iter().map(|d| format!("-I{}", d)))
      .args(&self.config.cflags)
      .args(COMMON_FLAGS.iter().copied())
      .args(unit.language.diagnostic_flags().iter().copied());

    if unit.language == Language::Cpp {
      if let Some(std) = &self.config.cxx_std {
        inv.arg(format!("-std={}", std));
      }
    }

    inv
      .arg("-c")
      .arg(&unit.source_path)
      .arg("-o")
      .arg(&unit.object_path);
    inv
  }

  pub fn link_invocation(&self, registry: &SourceRegistry, app: &str) -> Invocation {
    let mut inv = Invocation::new(&self.config.compiler);
    inv
      .args(SHARED_FLAGS.iter().copied())
      .args(registry.iter().map(|u| u.object_path.as_os_str()));

    if registry.uses(Language::Cpp) {
      inv.arg(format!("-l{}", self.config.cxx_lib));
    }

    inv
      .args(&self.config.ldflags)
      .arg("-o")
      .arg(self.library_path(app));
    inv
  }

  /// Compile one unit and wait for the compiler to exit.
  pub async fn compile<R: ProcessRunner>(&self, runner: &R, unit: &SourceUnit) -> Result<(), ProcessError> {
    info!(unit = %unit.name, language = unit.language.as_str(), "compiling");
    runner.run(&self.compile_invocation(unit)).await
  }

  /// Link every registered object into `<root>/<app>.so`.
  pub async fn link<R: ProcessRunner>(
    &self,
    runner: &R,
    registry: &SourceRegistry,
    app: &str,
  ) -> Result<PathBuf, ProcessError> {
    let inv = self.link_invocation(registry, app);
    info!(objects = registry.len(), "linking");
    runner.run(&inv).await?;
    Ok(self.library_path(app))
  }
}

fn include_flag(dir: &Path) -> String {
  format!("-I{}", dir.display())
}
