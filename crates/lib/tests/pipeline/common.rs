//! Shared test helpers for pipeline tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use kbuild_lib::build::{BuildContext, BuildError, BuildReport, build};
use kbuild_lib::cert::{CertError, CertIssuer};
use kbuild_lib::config::BuildConfig;
use kbuild_lib::process::{Invocation, ProcessError, ProcessRunner};
use kbuild_lib::stale::{FileStamp, stamp_mtime};
use tempfile::TempDir;

/// Records every invocation and fakes the compiler by writing the `-o` file.
#[derive(Default)]
pub struct RecordingRunner {
  calls: Mutex<Vec<Invocation>>,
  fail_at: Option<usize>,
  probe: Option<PathBuf>,
  probe_hits: Mutex<Vec<bool>>,
}

impl RecordingRunner {
  /// Fail the `index`-th invocation (0-based) with exit status 1.
  pub fn failing_at(index: usize) -> Self {
    Self {
      fail_at: Some(index),
      ..Self::default()
    }
  }

  /// Record whether `path` exists at the time of each invocation.
  pub fn probing(path: PathBuf) -> Self {
    Self {
      probe: Some(path),
      ..Self::default()
    }
  }

  pub fn calls(&self) -> Vec<Invocation> {
    self.calls.lock().unwrap().clone()
  }

  pub fn call_strings(&self) -> Vec<String> {
    self.calls().iter().map(|c| c.to_string()).collect()
  }

  pub fn compile_count(&self) -> usize {
    self.calls().iter().filter(|c| c.args.iter().any(|a| a == "-c")).count()
  }

  pub fn link_count(&self) -> usize {
    self.calls().iter().filter(|c| c.args.iter().any(|a| a == "-shared" || a == "-dynamiclib")).count()
  }

  pub fn probe_hits(&self) -> Vec<bool> {
    self.probe_hits.lock().unwrap().clone()
  }
}

impl ProcessRunner for RecordingRunner {
  async fn run(&self, invocation: &Invocation) -> Result<(), ProcessError> {
    let index = {
      let mut calls = self.calls.lock().unwrap();
      calls.push(invocation.clone());
      calls.len() - 1
    };

    if let Some(probe) = &self.probe {
      self.probe_hits.lock().unwrap().push(probe.exists());
    }

    if self.fail_at == Some(index) {
      return Err(ProcessError::Exit {
        program: invocation.program.to_string_lossy().into_owned(),
        code: 1,
      });
    }

    if let Some(out) = invocation.output() {
      fs::write(out, b"\x7fELF").unwrap();
    }
    Ok(())
  }
}

/// Counts issuance requests without producing any files.
#[derive(Default)]
pub struct CountingIssuer {
  calls: AtomicUsize,
}

impl CountingIssuer {
  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

impl CertIssuer for CountingIssuer {
  async fn issue(&self, _app: &str, _root: &Path) -> Result<(), CertError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    Ok(())
  }
}

/// Application directory in a temp dir.
pub struct TestApp {
  _temp: TempDir,
  pub root: PathBuf,
  pub name: String,
}

impl TestApp {
  /// Minimal valid layout: `src/`, `conf/<name>.conf` and `cert/`.
  pub fn new(name: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join(name);
    fs::create_dir_all(root.join("src")).unwrap();
    fs::create_dir_all(root.join("conf")).unwrap();
    fs::create_dir_all(root.join("cert")).unwrap();
    fs::write(root.join("conf").join(format!("{}.conf", name)), "bind 127.0.0.1 8888\n").unwrap();
    Self {
      _temp: temp,
      root,
      name: name.to_string(),
    }
  }

  pub fn path(&self, relative: &str) -> PathBuf {
    self.root.join(relative)
  }

  pub fn write(&self, relative: &str, content: &[u8]) -> PathBuf {
    let path = self.path(relative);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
  }

  /// Move a file's mtime by `delta` seconds.
  pub fn shift_mtime(&self, relative: &str, delta: i64) {
    let path = self.path(relative);
    let mut stamp = FileStamp::of(&path).unwrap();
    stamp.mtime += delta;
    stamp_mtime(&path, &stamp).unwrap();
  }

  pub fn context(&self) -> BuildContext {
    BuildContext::new(&self.root, &self.name, BuildConfig::default())
  }

  pub async fn build_with(&self, runner: &RecordingRunner) -> Result<BuildReport, BuildError> {
    build(self.context(), runner, &CountingIssuer::default()).await
  }
}
