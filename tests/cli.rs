// ABOUTME: Integration tests for the d2ship CLI commands.
// ABOUTME: Validates --help output and argument handling that fails before any request.

use assert_cmd::Command;
use predicates::prelude::*;

fn d2ship_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("d2ship"));
    // Point at a closed port so nothing accidentally reaches a real gateway.
    cmd.env("D2SHIP_API_URL", "http://127.0.0.1:9")
        .env_remove("D2SHIP_CORS_RELAY");
    cmd
}

#[test]
fn help_shows_commands() {
    d2ship_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("logs"))
        .stdout(predicate::str::contains("commit"));
}

#[test]
fn batch_commands_require_ids() {
    d2ship_cmd()
        .arg("stop")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<IDS>"));
}

#[test]
fn create_rejects_invalid_names_before_any_request() {
    let dir = tempfile::tempdir().unwrap();
    d2ship_cmd()
        .current_dir(dir.path())
        .args([
            "create",
            "--image",
            "r.example.com/acme/dhis2-data:2.36-template",
            "--name",
            "My_Copy",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("container name must be lowercase"));
}

#[test]
fn create_rejects_non_data_images() {
    let dir = tempfile::tempdir().unwrap();
    d2ship_cmd()
        .current_dir(dir.path())
        .args(["create", "--image", "nginx:latest", "--name", "copy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a data image reference: nginx:latest"));
}

#[test]
fn json_errors_are_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    d2ship_cmd()
        .current_dir(dir.path())
        .args(["--json", "create", "--image", "nginx:latest", "--name", "copy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"event\":\"error\""));
}

#[test]
fn invalid_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("d2ship.yml"), "default_port: 0\n").unwrap();
    d2ship_cmd()
        .current_dir(dir.path())
        .env_remove("D2SHIP_API_URL")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("default_port"));
}

#[test]
fn https_gateway_is_rejected_before_any_request() {
    let dir = tempfile::tempdir().unwrap();
    d2ship_cmd()
        .current_dir(dir.path())
        .env("D2SHIP_API_URL", "https://127.0.0.1:9")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("TLS is not supported"));
}

#[test]
fn create_has_no_client_file_options() {
    d2ship_cmd()
        .args([
            "create",
            "--image",
            "r.example.com/acme/dhis2-data:2.36-template",
            "--name",
            "copy",
            "--run-sql",
            "seed.sql",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected argument '--run-sql'"));
}
