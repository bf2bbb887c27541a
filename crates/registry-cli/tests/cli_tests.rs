//! CLI smoke tests

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn registry_cmd(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("registry").unwrap();
    cmd.arg("--root").arg(root);
    cmd
}

fn write_agent(root: &Path, version: u32) {
    let dir = root.join("agents/demo");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("config.yaml"),
        format!("agent:\n  agent_id: demo\n  version: {}\n  name: Demo\n", version),
    )
    .unwrap();
}

#[test]
fn help_lists_commands() {
    Command::cargo_bin("registry")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("activate"))
        .stdout(predicate::str::contains("resolve"));
}

#[test]
fn create_list_resolve_round_trip() {
    let temp = TempDir::new().unwrap();
    write_agent(temp.path(), 1);

    registry_cmd(temp.path())
        .args(["create", "agents/demo/config.yaml", "--type", "agent", "--activate"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created demo version 1"));

    registry_cmd(temp.path())
        .args(["list", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("v1"))
        .stdout(predicate::str::contains("active"));

    registry_cmd(temp.path())
        .args(["resolve", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"agent_id\": \"demo\""));
}

#[test]
fn sync_reports_created_component() {
    let temp = TempDir::new().unwrap();
    write_agent(temp.path(), 1);

    registry_cmd(temp.path())
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("created"))
        .stdout(predicate::str::contains("demo"));
}

#[test]
fn deprecating_the_active_version_fails_with_nonzero_exit() {
    let temp = TempDir::new().unwrap();
    write_agent(temp.path(), 1);

    registry_cmd(temp.path()).arg("sync").assert().success();

    registry_cmd(temp.path())
        .args(["deprecate", "demo", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("active"));
}

#[test]
fn resolve_unknown_component_fails() {
    let temp = TempDir::new().unwrap();

    registry_cmd(temp.path())
        .args(["resolve", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost"));
}
