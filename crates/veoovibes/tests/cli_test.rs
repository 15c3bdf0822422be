//! Integration tests for the `veoovibes` CLI binary.
//!
//! Argument parsing, help output, completions and config handling run
//! without a device. Device-bound commands run against a wiremock server.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `veoovibes` binary with env isolation.
///
/// Clears all `VEOOVIBES_*` env vars and points config directories at
/// `home` so tests never touch the user's real configuration.
fn veoo_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("veoovibes");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("VEOOVIBES_PROFILE")
        .env_remove("VEOOVIBES_URL")
        .env_remove("VEOOVIBES_API_KEY")
        .env_remove("VEOOVIBES_OUTPUT")
        .env_remove("VEOOVIBES_INSECURE")
        .env_remove("VEOOVIBES_TIMEOUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn ok(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "status": "succeeded",
        "code": "0",
        "result": result,
    }))
}

async fn device_with_rooms() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/listrooms"))
        .respond_with(ok(json!({
            "95": {"id_room": "95", "name": "Kitchen"},
            "91": {"id_room": "91", "name": "Bath"},
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/room_player_status"))
        .respond_with(ok(json!({"is_playing": 1, "zone_volume": 30, "title": "Song"})))
        .mount(&server)
        .await;

    server
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run_blocking(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = veoo_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = tempfile::tempdir().unwrap();
    veoo_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("rooms")
            .and(predicate::str::contains("volume"))
            .and(predicate::str::contains("sources"))
            .and(predicate::str::contains("watch")),
    );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    veoo_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("veoovibes"));
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    veoo_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    veoo_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_points_into_config_dir() {
    let home = tempfile::tempdir().unwrap();
    veoo_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_no_config() {
    let home = tempfile::tempdir().unwrap();
    veoo_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]"));
}

#[test]
fn test_command_without_device_fails() {
    let home = tempfile::tempdir().unwrap();
    let output = veoo_cmd(home.path()).args(["rooms", "list"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(text.contains("No device configured"), "unexpected output:\n{text}");
}

#[test]
fn test_unknown_profile_fails() {
    let home = tempfile::tempdir().unwrap();
    let output = veoo_cmd(home.path())
        .args(["--profile", "attic", "check"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(text.contains("attic"), "unexpected output:\n{text}");
}

#[test]
fn test_invalid_output_format() {
    let home = tempfile::tempdir().unwrap();
    let output = veoo_cmd(home.path())
        .args(["--output", "xml", "rooms", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about valid output formats:\n{text}"
    );
}

// ── Sources ─────────────────────────────────────────────────────────

#[test]
fn test_sources_from_yaml_file() {
    let home = tempfile::tempdir().unwrap();
    let file = home.path().join("sources.yaml");
    std::fs::write(
        &file,
        "sources:\n  - name: FM4\n    group: 1\n    prog: 3\n  - name: Broken\n    group: 2\n",
    )
    .unwrap();

    veoo_cmd(home.path())
        .args(["sources", "--output", "plain", "--from-file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::diff("FM4\n"));
}

#[test]
fn test_sources_from_json_file() {
    let home = tempfile::tempdir().unwrap();
    let file = home.path().join("sources.json");
    std::fs::write(&file, r#"{"sources": [{"name": "Lounge", "group": "2", "prog": 1}]}"#).unwrap();

    let output = veoo_cmd(home.path())
        .args(["sources", "-o", "json-compact", "--from-file"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed, json!([{"name": "Lounge", "group": 2, "prog": 1}]));
}

#[test]
fn test_sources_garbage_is_empty() {
    let home = tempfile::tempdir().unwrap();
    let file = home.path().join("sources.txt");
    std::fs::write(&file, "{{{ not a map").unwrap();

    veoo_cmd(home.path())
        .args(["sources", "--from-file"])
        .arg(&file)
        .assert()
        .success()
        .stderr(predicate::str::contains("No sources configured"));
}

#[test]
fn test_sources_from_profile() {
    let home = tempfile::tempdir().unwrap();
    let path_output = veoo_cmd(home.path()).args(["config", "path"]).output().unwrap();
    let config_file = std::path::PathBuf::from(String::from_utf8_lossy(&path_output.stdout).trim());
    std::fs::create_dir_all(config_file.parent().unwrap()).unwrap();
    std::fs::write(
        &config_file,
        "default_profile = \"home\"\n\n[profiles.home]\nbase_url = \"192.168.1.50\"\nsource_map = '{\"sources\": [{\"name\": \"FM4\", \"group\": 1, \"prog\": 3}]}'\n",
    )
    .unwrap();

    veoo_cmd(home.path())
        .args(["sources", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FM4"));
}

#[test]
fn test_malformed_config_reports_parse_error() {
    let home = tempfile::tempdir().unwrap();
    let path_output = veoo_cmd(home.path()).args(["config", "path"]).output().unwrap();
    let config_file = std::path::PathBuf::from(String::from_utf8_lossy(&path_output.stdout).trim());
    std::fs::create_dir_all(config_file.parent().unwrap()).unwrap();
    std::fs::write(&config_file, "[profiles.home\nbase_url = \"192.168.1.50\"\n").unwrap();

    let output = veoo_cmd(home.path()).args(["rooms", "list"]).output().unwrap();
    let text = combined_output(&output);
    assert_eq!(output.status.code(), Some(1), "{text}");
    assert!(text.contains("config loading failed"), "{text}");
    assert!(!text.contains("No device configured"), "{text}");
}

// ── Device-bound commands ───────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_check_reports_room_count() {
    let server = device_with_rooms().await;
    let home = tempfile::tempdir().unwrap();

    let mut cmd = veoo_cmd(home.path());
    cmd.args(["--url", &server.uri(), "check", "-o", "plain"]);
    let output = run_blocking(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "2");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_check_without_rooms_exits_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/listrooms"))
        .respond_with(ok(json!({})))
        .mount(&server)
        .await;
    let home = tempfile::tempdir().unwrap();

    let mut cmd = veoo_cmd(home.path());
    cmd.args(["--url", &server.uri(), "check"]);
    let output = run_blocking(cmd).await;

    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("No rooms"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_check_unreachable_exits_connection() {
    let home = tempfile::tempdir().unwrap();

    let mut cmd = veoo_cmd(home.path());
    cmd.args(["--url", "http://127.0.0.1:9", "--timeout", "2", "check"]);
    let output = run_blocking(cmd).await;

    assert_eq!(output.status.code(), Some(7), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rooms_list_json() {
    let server = device_with_rooms().await;
    let home = tempfile::tempdir().unwrap();

    let mut cmd = veoo_cmd(home.path());
    cmd.args(["--url", &server.uri(), "rooms", "list", "-o", "json"]);
    let output = run_blocking(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let rooms: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rooms = rooms.as_array().unwrap();
    assert_eq!(rooms.len(), 2);
    assert_eq!(rooms[0]["room_id"], "95");
    assert_eq!(rooms[0]["state"], "playing");
    assert_eq!(rooms[0]["volume_level"], 0.3);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_volume_is_clamped_and_sent() {
    let server = device_with_rooms().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/room_vol_set"))
        .and(query_param("room", "95"))
        .and(query_param("vol", "100"))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;
    let home = tempfile::tempdir().unwrap();

    let mut cmd = veoo_cmd(home.path());
    cmd.args(["--url", &server.uri(), "volume", "kitchen", "150"]);
    let output = run_blocking(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_room_exits_not_found() {
    let server = device_with_rooms().await;
    let home = tempfile::tempdir().unwrap();

    let mut cmd = veoo_cmd(home.path());
    cmd.args(["--url", &server.uri(), "play", "attic"]);
    let output = run_blocking(cmd).await;

    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("attic"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_source_exits_not_found() {
    let server = device_with_rooms().await;
    let home = tempfile::tempdir().unwrap();

    let mut cmd = veoo_cmd(home.path());
    cmd.args(["--url", &server.uri(), "source", "95", "FM4"]);
    let output = run_blocking(cmd).await;

    assert_eq!(output.status.code(), Some(4));
    let requests = server.received_requests().await.unwrap();
    assert!(
        requests.iter().all(|r| r.url.path() != "/api/v1/music_room"),
        "no source command may reach the device"
    );
}
