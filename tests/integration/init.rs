//! Tests for the `init` command.

use assert_cmd::Command;
use predicates::prelude::*;

fn devstack() -> Command {
    Command::cargo_bin("devstack").unwrap()
}

#[test]
fn init_writes_a_parseable_sample() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("stack.json");

    devstack().arg("init").arg(&path).assert().success();

    let content = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed["project"].as_str().unwrap(), "demo");
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("stack.json");
    std::fs::write(&path, "{\"project\": \"mine\"}").unwrap();

    devstack()
        .arg("init")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "{\"project\": \"mine\"}"
    );
}

#[test]
fn init_force_overwrites() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("stack.json");
    std::fs::write(&path, "old").unwrap();

    devstack()
        .arg("init")
        .arg(&path)
        .arg("--force")
        .assert()
        .success();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("\"project\": \"demo\""));
}
