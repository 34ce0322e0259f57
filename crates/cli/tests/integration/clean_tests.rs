use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn clean_removes_build_products() {
  let env = TestEnv::new();
  env.kbuild_cmd().arg("build").assert().success();
  assert!(env.root.join("hello.so").exists());

  env
    .kbuild_cmd()
    .arg("clean")
    .assert()
    .success()
    .stdout(predicate::str::contains("Objects removed: 1"));

  assert!(!env.root.join(".objs").exists());
  assert!(!env.root.join("hello.so").exists());
  assert!(env.root.join("src/hello.c").exists());
}

#[test]
fn build_after_clean_recompiles() {
  let env = TestEnv::new();
  env.kbuild_cmd().arg("build").assert().success();
  env.kbuild_cmd().arg("clean").assert().success();

  env
    .kbuild_cmd()
    .arg("build")
    .assert()
    .success()
    .stdout(predicate::str::contains("built successfully"));

  assert_eq!(env.cc_calls().len(), 4);
}
