//! CLI integration tests: runs the `site-nav` binary against
//! `fixtures/content`.

use std::path::PathBuf;
use std::process::{Command, Output};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/content")
}

fn run(args: &[&str]) -> Output {
    let bin = env!("CARGO_BIN_EXE_site-nav");
    let source = fixtures_dir();
    Command::new(bin)
        .arg("--source")
        .arg(&source)
        .arg("--config")
        .arg(source.join("missing-nav.toml"))
        .args(args)
        .output()
        .expect("failed to run site-nav")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn check_reports_valid_content() {
    let output = run(&["check"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("==> Content is valid"));
    assert!(text.contains("002 docs (4 pages)"));
    assert!(text.contains("3 sections, 10 pages"));
}

#[test]
fn check_fails_on_invalid_page() {
    let tmp = tempfile::TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join("docs")).unwrap();
    std::fs::write(tmp.path().join("docs/bad.md"), "+++\nnav_label = \"x\"\n+++\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_site-nav"))
        .arg("--source")
        .arg(tmp.path())
        .arg("check")
        .output()
        .unwrap();
    assert!(!output.status.success());
    let err = String::from_utf8_lossy(&output.stderr);
    assert!(err.contains("bad.md"), "stderr: {err}");
}

#[test]
fn subpages_emits_lookup_json() {
    let output = run(&["subpages"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(stdout(&output).trim()).unwrap();

    let docs = value["subpages"]["docs"].as_array().unwrap();
    assert_eq!(docs.len(), 4);
    assert_eq!(docs[0]["href"], "/docs/");
    assert_eq!(docs[0]["label"], "Overview");
    assert_eq!(docs[1]["href"], "/docs/install/");
    assert_eq!(value["icons"]["deploy"], "rocket");
    assert!(value["subpages"].get("drafts").is_none());
}

#[test]
fn render_marks_active_entry() {
    let output = run(&["render", "guides", "--path", "/guides/deploy"]);
    assert!(output.status.success());
    let html = stdout(&output);
    assert_eq!(html.matches("<li>").count(), 2);
    assert!(html.contains(r#"href="/guides/deploy/" aria-current="page""#));
    assert!(html.contains("Setup"));
}

#[test]
fn render_unknown_section_prints_nothing() {
    let output = run(&["render", "nope"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "");
}

#[test]
fn gen_config_prints_stock_toml() {
    let output = run(&["gen-config"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("[sub_sidebar]"));
    assert!(text.contains("close_delay_ms = 150"));
}

#[test]
fn invalid_config_is_rejected() {
    let tmp = tempfile::TempDir::new().unwrap();
    let config = tmp.path().join("nav.toml");
    std::fs::write(&config, "[storage]\nsection_key = \"\"\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_site-nav"))
        .arg("--source")
        .arg(fixtures_dir())
        .arg("--config")
        .arg(&config)
        .arg("check")
        .output()
        .unwrap();
    assert!(!output.status.success());
}
