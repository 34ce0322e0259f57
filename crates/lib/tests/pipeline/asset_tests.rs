use std::fs;

use kbuild_lib::build::BuildOutcome;

use super::common::{RecordingRunner, TestApp};

#[tokio::test]
async fn assets_are_generated_compiled_and_linked() {
  let app = TestApp::new("hello");
  app.write("src/hello.c", b"#include \"assets.h\"\n");
  app.write("assets/style.css", b"body { color: red; }");

  let runner = RecordingRunner::default();
  let report = app.build_with(&runner).await.unwrap();

  assert_eq!(report.compiled, vec!["style_css", "hello.c"]);
  assert!(app.path(".objs/style_css.c").is_file());
  assert!(app.path(".objs/style_css.o").is_file());

  let calls = runner.call_strings();
  assert!(calls[0].contains(".objs/style_css.c"));
  assert!(matches!(report.outcome, BuildOutcome::Built { .. }));

  let asset = report.units[0].asset.as_ref().unwrap();
  assert_eq!(asset.length, 20);
}

#[tokio::test]
async fn header_exists_only_during_compile() {
  let app = TestApp::new("hello");
  app.write("src/hello.c", b"");
  app.write("assets/logo.svg", b"<svg/>");

  let runner = RecordingRunner::probing(app.path("src/assets.h"));
  app.build_with(&runner).await.unwrap();

  let hits = runner.probe_hits();
  // two compiles see the header, the link doesn't
  assert_eq!(hits, vec![true, true, false]);
  assert!(!app.path("src/assets.h").exists());
}

#[tokio::test]
async fn fresh_assets_stay_registered_next_to_rebuilt_ones() {
  let app = TestApp::new("hello");
  app.write("src/hello.c", b"");
  app.write("assets/a.js", b"1");
  app.build_with(&RecordingRunner::default()).await.unwrap();

  // a.js is now fresh, b.js is new; a source change forces a compile so the
  // header can be observed.
  app.write("assets/b.js", b"2");
  app.shift_mtime("src/hello.c", 5);

  let runner = RecordingRunner::probing(app.path("src/assets.h"));
  let report = app.build_with(&runner).await.unwrap();

  assert_eq!(report.compiled, vec!["b_js", "hello.c"]);
  assert!(report.units.iter().any(|u| u.name == "a_js" && !u.build_required));
  assert!(runner.probe_hits()[0]);
}

#[tokio::test]
async fn stale_header_from_previous_run_is_removed() {
  let app = TestApp::new("hello");
  app.write("src/assets.h", b"#error stale\n");

  app.build_with(&RecordingRunner::default()).await.unwrap();

  assert!(!app.path("src/assets.h").exists());
}

#[tokio::test]
async fn zero_length_asset_is_ignored() {
  let app = TestApp::new("hello");
  app.write("assets/empty.txt", b"");

  let runner = RecordingRunner::default();
  let report = app.build_with(&runner).await.unwrap();

  assert!(report.is_noop());
  assert!(report.units.is_empty());
  assert!(!app.path(".objs/empty_txt.c").exists());

  let report = app.build_with(&runner).await.unwrap();
  assert!(report.is_noop());
  assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn asset_without_extension_fails_the_build() {
  let app = TestApp::new("hello");
  app.write("assets/LICENSE", b"MIT");

  let result = app.build_with(&RecordingRunner::default()).await;

  let err = result.unwrap_err();
  assert!(err.to_string().contains("couldn't find ext in LICENSE"));
}

#[tokio::test]
async fn unchanged_asset_is_not_regenerated() {
  let app = TestApp::new("hello");
  app.write("assets/data.json", b"{}");
  app.build_with(&RecordingRunner::default()).await.unwrap();

  let generated = app.path(".objs/data_json.c");
  fs::write(&generated, "/* sentinel */").unwrap();

  let runner = RecordingRunner::default();
  let report = app.build_with(&runner).await.unwrap();

  assert!(report.is_noop());
  assert_eq!(fs::read_to_string(generated).unwrap(), "/* sentinel */");
}
