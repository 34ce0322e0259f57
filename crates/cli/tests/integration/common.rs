//! Shared test helpers for CLI integration tests.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Stand-in for the C compiler: logs its arguments, writes the `-o` target,
/// and fails when its command line contains `$FAKE_CC_FAIL`.
const FAKE_CC: &str = r#"#!/bin/sh
out=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "-o" ]; then out="$arg"; fi
  prev="$arg"
done
echo "$*" >> "$FAKE_CC_LOG"
if [ -n "$FAKE_CC_FAIL" ]; then
  case "$*" in
    *"$FAKE_CC_FAIL"*) echo "fake-cc: error" >&2; exit 1 ;;
  esac
fi
printf 'obj' > "$out"
"#;

/// Isolated application directory plus a fake compiler.
pub struct TestEnv {
  pub temp: TempDir,
  pub root: PathBuf,
  cc: PathBuf,
  log: PathBuf,
}

impl TestEnv {
  /// An application named `hello` with one source file. `cert/` is created
  /// up front so builds never need `openssl`.
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let base = dunce::canonicalize(temp.path()).unwrap();
    let root = base.join("hello");

    for dir in ["src", "conf", "cert"] {
      fs::create_dir_all(root.join(dir)).unwrap();
    }
    fs::write(root.join("conf/hello.conf"), "load ./hello.so\n").unwrap();
    fs::write(root.join("src/hello.c"), "int page(void) { return 0; }\n").unwrap();

    let cc = base.join("fake-cc");
    fs::write(&cc, FAKE_CC).unwrap();
    fs::set_permissions(&cc, fs::Permissions::from_mode(0o755)).unwrap();

    let log = base.join("cc.log");

    Self { temp, root, cc, log }
  }

  /// Write a file relative to the application root.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.root.join(relative_path);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
  }

  /// Every compiler invocation so far, one line each.
  pub fn cc_calls(&self) -> Vec<String> {
    fs::read_to_string(&self.log)
      .map(|s| s.lines().map(str::to_string).collect())
      .unwrap_or_default()
  }

  /// A kbuild command running inside the application root with the fake
  /// compiler and no user flag overrides.
  pub fn kbuild_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("kbuild");
    cmd.current_dir(&self.root);
    cmd.env("CC", &self.cc);
    cmd.env("FAKE_CC_LOG", &self.log);
    for var in ["CFLAGS", "LDFLAGS", "CXXSTD", "CXXLIB", "KBUILD_TIMEOUT", "FAKE_CC_FAIL"] {
      cmd.env_remove(var);
    }
    cmd
  }
}
