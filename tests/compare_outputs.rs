use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn compare_json_lists_shared_and_unique_nodes() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "app=core,util\n").unwrap();
    fs::write(dir.path().join("b.txt"), "app=core,log\nlonely\n").unwrap();

    let assert = Command::cargo_bin("adjgraph")
        .unwrap()
        .current_dir(dir.path())
        .args(["compare", "a.txt", "b.txt", "--format", "json"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let v: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(v["graphs"], serde_json::json!(["a.txt", "b.txt"]));
    assert_eq!(v["intersection"], serde_json::json!(["app", "core"]));
    assert_eq!(v["unique"]["a.txt"], serde_json::json!(["util"]));
    // isolated nodes take no part in the comparison
    assert_eq!(v["unique"]["b.txt"], serde_json::json!(["log"]));
}

#[test]
fn compare_text_renders_table() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "app=core\n").unwrap();
    fs::write(dir.path().join("b.txt"), "app=log\n").unwrap();

    Command::cargo_bin("adjgraph")
        .unwrap()
        .current_dir(dir.path())
        .args(["compare", "a.txt", "b.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| Graph | Nodes | Unique |"))
        .stdout(predicate::str::contains("| a.txt | 2     | 1      |"))
        .stdout(predicate::str::contains("Shared by all (1):\n  app\n"))
        .stdout(predicate::str::contains("Only in b.txt:\n  log\n"));
}

#[test]
fn compare_with_squashed_versions() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "g:app:jar:1=g:lib:jar:1.0\n").unwrap();
    fs::write(dir.path().join("b.txt"), "g:app:jar:2=g:lib:jar:2.0\n").unwrap();

    let assert = Command::cargo_bin("adjgraph")
        .unwrap()
        .current_dir(dir.path())
        .args(["compare", "--squash-versions", "--format", "json", "a.txt", "b.txt"])
        .assert()
        .success();
    let v: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(v["intersection"], serde_json::json!(["g:app:jar", "g:lib:jar"]));
}

#[test]
fn compare_needs_two_inputs() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "app=core\n").unwrap();
    Command::cargo_bin("adjgraph")
        .unwrap()
        .current_dir(dir.path())
        .args(["compare", "a.txt"])
        .assert()
        .failure();
}
