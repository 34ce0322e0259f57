//! The incremental build driver.
//!
//! A build walks `assets/` and `src/`, registers one unit per file, compiles
//! every stale unit one at a time and relinks `<app>.so` when anything was
//! compiled. Any error aborts the build at once; objects from earlier steps
//! stay on disk and are picked up (or re-flagged) by the next run.

mod context;

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::asset::{AssetCompiler, AssetError, AssetHeader};
use crate::cert::{CertError, CertIssuer};
use crate::process::{ProcessError, ProcessRunner, Toolchain};
use crate::registry::{Language, SourceUnit, object_path};
use crate::stale::{FileStamp, StaleError, requires_build, stamp_mtime};
use crate::util::dirs::{create_dir_mode, remove_file_if_exists};
use crate::walk::{WalkError, walk};

pub use context::BuildContext;

#[derive(Debug, Error)]
pub enum BuildError {
  #[error("{app} doesn't appear to be a kore app")]
  NotAnApp { app: String },

  #[error("could not get cwd: {0}")]
  CurrentDir(#[source] io::Error),

  #[error("can't derive an application name from {}", path.display())]
  NoAppName { path: PathBuf },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: io::Error },

  #[error("failed to remove {}: {source}", path.display())]
  RemoveFile { path: PathBuf, source: io::Error },

  #[error("failed to write {}: {source}", path.display())]
  WriteFile { path: PathBuf, source: io::Error },

  #[error(transparent)]
  Walk(#[from] WalkError),

  #[error(transparent)]
  Stale(#[from] StaleError),

  #[error(transparent)]
  Asset(#[from] AssetError),

  #[error(transparent)]
  Process(#[from] ProcessError),

  #[error(transparent)]
  Cert(#[from] CertError),
}

/// Phases of a build, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildState {
  Validating,
  DiscoveringAssets,
  DiscoveringSources,
  Compiling,
  Linking,
  Done,
  Reported,
  Failed,
}

impl fmt::Display for BuildState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      BuildState::Validating => "validating",
      BuildState::DiscoveringAssets => "discovering assets",
      BuildState::DiscoveringSources => "discovering sources",
      BuildState::Compiling => "compiling",
      BuildState::Linking => "linking",
      BuildState::Done => "done",
      BuildState::Reported => "reported",
      BuildState::Failed => "failed",
    };
    f.write_str(s)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BuildOutcome {
  /// At least one unit was compiled and the library was relinked.
  Built { library: PathBuf },
  /// Every object was up to date.
  NothingToDo,
}

/// Summary of a finished build.
#[derive(Debug, Serialize)]
pub struct BuildReport {
  pub app: String,
  pub root: PathBuf,
  pub outcome: BuildOutcome,
  /// Names of the units that were compiled, in order.
  pub compiled: Vec<String>,
  pub units: Vec<SourceUnit>,
  pub certificates_issued: bool,
}

impl BuildReport {
  pub fn is_noop(&self) -> bool {
    self.outcome == BuildOutcome::NothingToDo
  }
}

/// Drives one build of one application.
pub struct BuildCoordinator<'a, R, C> {
  ctx: BuildContext,
  toolchain: Toolchain,
  runner: &'a R,
  certs: &'a C,
  state: BuildState,
}

impl<'a, R: ProcessRunner, C: CertIssuer> BuildCoordinator<'a, R, C> {
  pub fn new(ctx: BuildContext, runner: &'a R, certs: &'a C) -> Self {
    let toolchain = Toolchain::new(&ctx.root, ctx.config.clone());
    Self {
      ctx,
      toolchain,
      runner,
      certs,
      state: BuildState::Validating,
    }
  }

  pub fn state(&self) -> BuildState {
    self.state
  }

  /// Run the build to completion.
  pub async fn run(&mut self) -> Result<BuildReport, BuildError> {
    match self.execute().await {
      Ok(report) => {
        self.transition(BuildState::Reported);
        Ok(report)
      }
      Err(err) => {
        self.transition(BuildState::Failed);
        Err(err)
      }
    }
  }

  fn transition(&mut self, next: BuildState) {
    debug!(from = %self.state, to = %next, "build state");
    self.state = next;
  }

  async fn execute(&mut self) -> Result<BuildReport, BuildError> {
    self.transition(BuildState::Validating);
    self.validate()?;

    let obj_dir = self.ctx.obj_dir();
    if !obj_dir.is_dir() {
      create_dir_mode(&obj_dir, 0o755).map_err(|e| BuildError::CreateDir {
        path: obj_dir.clone(),
        source: e,
      })?;
    }

    self.remove_header()?;

    let assets_dir = self.ctx.assets_dir();
    if assets_dir.is_dir() {
      self.transition(BuildState::DiscoveringAssets);
      self.discover_assets(&assets_dir)?;
    }

    self.transition(BuildState::DiscoveringSources);
    self.discover_sources()?;

    self.transition(BuildState::Compiling);
    let compiled = self.compile_stale().await?;

    self.remove_header()?;

    let certificates_issued = self.ensure_certificates().await?;

    let outcome = if compiled.is_empty() {
      self.transition(BuildState::Done);
      BuildOutcome::NothingToDo
    } else {
      self.transition(BuildState::Linking);
      let library = self.toolchain.link(self.runner, &self.ctx.registry, &self.ctx.app).await?;
      self.transition(BuildState::Done);
      BuildOutcome::Built { library }
    };

    Ok(BuildReport {
      app: self.ctx.app.clone(),
      root: self.ctx.root.clone(),
      outcome,
      compiled,
      units: self.ctx.registry.iter().cloned().collect(),
      certificates_issued,
    })
  }

  fn validate(&self) -> Result<(), BuildError> {
    if !self.ctx.src_dir().is_dir() || !self.ctx.config_file().is_file() {
      return Err(BuildError::NotAnApp {
        app: self.ctx.app.clone(),
      });
    }
    Ok(())
  }

  fn remove_header(&self) -> Result<(), BuildError> {
    remove_file_if_exists(&self.ctx.header_path).map_err(|e| BuildError::RemoveFile {
      path: self.ctx.header_path.clone(),
      source: e,
    })?;
    Ok(())
  }

  fn discover_assets(&mut self, assets_dir: &Path) -> Result<(), BuildError> {
    let mut header = AssetHeader::new();
    let mut seen = HashSet::new();

    let root = self.ctx.root.clone();
    let registry = &mut self.ctx.registry;
    let mut compiler = AssetCompiler::new(&root, &mut header);

    walk::<BuildError, _>(assets_dir, |path, metadata| {
      if let Some(unit) = compiler.compile(path, metadata)? {
        if !seen.insert(unit.name.clone()) {
          warn!(asset = %path.display(), symbol = %unit.name, "asset symbol collides with an earlier asset");
        }
        registry.add(unit);
      }
      Ok(())
    })?;

    fs::write(&self.ctx.header_path, header.render()).map_err(|e| BuildError::WriteFile {
      path: self.ctx.header_path.clone(),
      source: e,
    })
  }

  fn discover_sources(&mut self) -> Result<(), BuildError> {
    let src_dir = self.ctx.src_dir();
    let root = &self.ctx.root;
    let registry = &mut self.ctx.registry;

    walk::<BuildError, _>(&src_dir, |path, metadata| {
      let Some(language) = Language::from_path(path) else {
        return Ok(());
      };

      let Some(file_name) = path.file_name() else {
        return Ok(());
      };
      let name = file_name.to_string_lossy().into_owned();
      let stamp = FileStamp::from_metadata(metadata);
      let opath = object_path(root, file_name);
      let build_required = requires_build(&stamp, &opath)?;

      registry.add(SourceUnit::new(
        name,
        path.to_path_buf(),
        opath,
        stamp,
        build_required,
        language,
      ));
      Ok(())
    })
  }

  async fn compile_stale(&self) -> Result<Vec<String>, BuildError> {
    let mut compiled = Vec::new();

    for unit in self.ctx.registry.units_requiring_build() {
      self.toolchain.compile(self.runner, unit).await?;

      if let Err(e) = stamp_mtime(&unit.object_path, &unit.stamp) {
        warn!(path = %unit.object_path.display(), error = %e, "failed to set object mtime");
      }

      compiled.push(unit.name.clone());
    }

    Ok(compiled)
  }

  /// Create `cert/` and issue certificates if it doesn't exist yet.
  async fn ensure_certificates(&self) -> Result<bool, BuildError> {
    let cert_dir = self.ctx.cert_dir();
    if cert_dir.is_dir() {
      return Ok(false);
    }

    create_dir_mode(&cert_dir, 0o700).map_err(|e| BuildError::CreateDir {
      path: cert_dir.clone(),
      source: e,
    })?;
    info!(path = %cert_dir.display(), "created certificate directory");

    self.certs.issue(&self.ctx.app, &self.ctx.root).await?;
    Ok(true)
  }
}

/// Build the application described by `ctx`.
pub async fn build<R: ProcessRunner, C: CertIssuer>(
  ctx: BuildContext,
  runner: &R,
  certs: &C,
) -> Result<BuildReport, BuildError> {
  BuildCoordinator::new(ctx, runner, certs).run().await
}
