//! Integration tests for the `poectl` binary.
//!
//! Argument parsing, help, completions and configuration errors run
//! without a controller; the reconciliation tests drive the binary
//! against a wiremock classic controller.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// `poectl` with every `POECTL_*` variable cleared and config pointed at
/// a path that does not exist.
fn poectl_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("poectl");
    cmd.env("HOME", "/tmp/poectl-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/poectl-test-nonexistent")
        .env("POECTL_CONFIG", "/tmp/poectl-test-nonexistent/config.toml")
        .env_remove("POECTL_PROFILE")
        .env_remove("POECTL_CONTROLLER")
        .env_remove("POECTL_SITE")
        .env_remove("POECTL_USERNAME")
        .env_remove("POECTL_PASSWORD")
        .env_remove("POECTL_OUTPUT")
        .env_remove("POECTL_INSECURE")
        .env_remove("POECTL_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = poectl_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_flag() {
    poectl_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("set")
            .and(predicate::str::contains("status"))
            .and(predicate::str::contains("completions")),
    );
}

#[test]
fn test_version_flag() {
    poectl_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("poectl"));
}

#[test]
fn test_completions_zsh() {
    poectl_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_bash() {
    poectl_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Argument validation ─────────────────────────────────────────────

#[test]
fn test_set_requires_state() {
    let output = poectl_cmd()
        .args(["set", "aa:bb:cc:dd:ee:ff", "1"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--state"));
}

#[test]
fn test_set_rejects_bad_port_list() {
    for ports in ["0", "5-2", "x", ""] {
        let output = poectl_cmd()
            .args(["set", "aa:bb:cc:dd:ee:ff", ports, "--state", "on"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(2), "ports={ports:?}");
    }
}

#[test]
fn test_set_rejects_bad_mac() {
    let output = poectl_cmd()
        .args(["set", "not-a-mac", "1", "--state", "on"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("not a MAC address"));
}

#[test]
fn test_invalid_output_format() {
    let output = poectl_cmd()
        .args(["--output", "xml", "config", "path"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

// ── Configuration ───────────────────────────────────────────────────

#[test]
fn test_set_without_controller_fails() {
    poectl_cmd()
        .args(["set", "aa:bb:cc:dd:ee:ff", "1", "--state", "on", "--yes"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No controller configured"));
}

#[test]
fn test_unknown_profile_is_reported() {
    poectl_cmd()
        .args(["--profile", "nope", "status", "aa:bb:cc:dd:ee:ff"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Profile 'nope' not found"));
}

#[test]
fn test_missing_credentials_exit_auth() {
    poectl_cmd()
        .args([
            "--controller",
            "https://127.0.0.1:1",
            "status",
            "aa:bb:cc:dd:ee:ff",
        ])
        .assert()
        .code(3);
}

#[test]
fn test_config_path_honors_override() {
    poectl_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/tmp/poectl-test-nonexistent/config.toml"));
}

#[test]
fn test_config_show_redacts_passwords() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("config.toml");
    std::fs::write(
        &file,
        r#"
[profiles.default]
controller = "https://10.0.0.1"
username = "admin"
password = "hunter2"
"#,
    )
    .unwrap();

    poectl_cmd()
        .env("POECTL_CONFIG", &file)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("https://10.0.0.1")
                .and(predicate::str::contains("hunter2").not()),
        );
}

// ── Against a mock controller ───────────────────────────────────────

const MAC: &str = "aa:bb:cc:dd:ee:ff";

fn device(port1_mode: &str) -> serde_json::Value {
    json!({
        "meta": { "rc": "ok" },
        "data": [{
            "_id": "5f1a",
            "mac": MAC,
            "type": "usw",
            "name": "Rack Switch",
            "port_table": [
                { "port_idx": 1, "name": "AP", "poe_mode": port1_mode, "poe_caps": 7 },
                { "port_idx": 2, "poe_mode": "off", "poe_caps": 7 },
                { "port_idx": 3, "poe_caps": 0 }
            ],
            "port_overrides": []
        }]
    })
}

async fn mock_controller(first_reads: u64, before: &str, after: &str) -> MockServer {
    let server = MockServer::start().await;
    let ok = json!({ "meta": { "rc": "ok" }, "data": [] });

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok.clone()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok.clone()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/s/default/stat/device"))
        .respond_with(ResponseTemplate::new(200).set_body_json(device(before)))
        .up_to_n_times(first_reads)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/s/default/stat/device"))
        .respond_with(ResponseTemplate::new(200).set_body_json(device(after)))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/s/default/rest/device/5f1a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok))
        .mount(&server)
        .await;

    server
}

/// Run the binary off the async runtime and collect its output.
async fn run(server: &MockServer, args: &[&str]) -> std::process::Output {
    let mut cmd = poectl_cmd();
    cmd.env("POECTL_CONTROLLER", server.uri())
        .env("POECTL_USERNAME", "admin")
        .env("POECTL_PASSWORD", "secret")
        .args(args);
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_lists_ports_as_json() {
    let server = mock_controller(10, "auto", "auto").await;
    let output = run(&server, &["-o", "json", "status", MAC, "1-2"]).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["ports"].as_array().unwrap().len(), 2);
    assert_eq!(body["ports"][0]["mode"], "auto");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_set_converges_and_exits_zero() {
    // Plan read + merge read see auto; verification sees off.
    let server = mock_controller(2, "auto", "off").await;
    let output = run(
        &server,
        &[
            "-o",
            "json",
            "set",
            MAC,
            "1,2",
            "--state",
            "off",
            "--yes",
            "--verify-delay",
            "0",
        ],
    )
    .await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["status"], "done");
    assert_eq!(report["overall_success"], true);
    assert_eq!(report["ports"][0]["outcome"], "changed-and-verified");
    assert_eq!(report["ports"][1]["outcome"], "already-satisfied");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_set_unsupported_port_exits_nonzero() {
    let server = mock_controller(10, "off", "off").await;
    let output = run(
        &server,
        &["-o", "plain", "set", MAC, "2,3", "--state", "off", "--yes"],
    )
    .await;

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2 already-satisfied"), "{stdout}");
    assert!(stdout.contains("3 unsupported"), "{stdout}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_set_without_yes_is_refused_when_not_a_terminal() {
    let server = mock_controller(10, "auto", "auto").await;
    let output = run(&server, &["set", MAC, "1", "--state", "off"]).await;

    assert_eq!(output.status.code(), Some(2), "{}", combined_output(&output));
    let puts = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method.as_str() == "PUT")
        .count();
    assert_eq!(puts, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_switch_exits_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "meta": { "rc": "ok" }, "data": [] })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/s/default/stat/device"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "meta": { "rc": "ok" }, "data": [] })))
        .mount(&server)
        .await;

    let output = run(&server, &["status", MAC]).await;
    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
}
