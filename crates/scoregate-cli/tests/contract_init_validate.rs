#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn scoregate() -> Command {
    let mut cmd = Command::cargo_bin("scoregate").unwrap();
    cmd.env_remove("SCOREGATE_CONFIG");
    cmd
}

#[test]
fn init_writes_a_valid_goals_file() {
    let temp = tempdir().unwrap();

    scoregate()
        .current_dir(temp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created scoregate.yaml"));

    let content = fs::read_to_string(temp.path().join("scoregate.yaml")).unwrap();
    assert!(content.contains("version: 1"));
    assert!(content.contains("pattern: \"main.*.js\""));

    scoregate()
        .current_dir(temp.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"category\": \"best-practices\""))
        .stdout(predicate::str::contains("sha256:"));
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("goals.yaml");
    fs::write(&path, "keep me").unwrap();

    scoregate()
        .current_dir(temp.path())
        .args(["init", "--config", "goals.yaml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--force"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "keep me");

    scoregate()
        .current_dir(temp.path())
        .args(["init", "--config", "goals.yaml", "--force"])
        .assert()
        .success();
    assert!(fs::read_to_string(&path).unwrap().contains("goals:"));
}

#[test]
fn validate_rejects_two_bundle_budgets() {
    let temp = tempdir().unwrap();
    fs::write(
        temp.path().join("scoregate.yaml"),
        r#"version: 1
goals:
  performance:
    min_score: 90
    bundle: { max_kb: 200, pattern: "main.*.js" }
  seo:
    min_score: 90
    bundle: { max_kb: 100, pattern: "vendor.*.js" }
"#,
    )
    .unwrap();

    scoregate()
        .current_dir(temp.path())
        .arg("validate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("config error"));
}

#[test]
fn version_prints_crate_version() {
    scoregate()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
