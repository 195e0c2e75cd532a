//! Integration tests for the zentra-smoke binary
//!
//! Tests:
//! - steps (text and JSON)
//! - run against the mock backend (JSON report, FAIL/ERROR reporting, exit codes)
//! - health
//! - config init / set / show / path

use std::path::Path;
use std::process::Command;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use super::common::{api_path, MockBackend, COMMUNITY_ID, SUFFIX};

struct CliOutput {
    success: bool,
    stdout: String,
    stderr: String,
}

/// Run the binary with a scrubbed environment rooted at `home`
async fn run_cli(home: &Path, args: &[&str]) -> CliOutput {
    let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
    let home = home.to_path_buf();

    tokio::task::spawn_blocking(move || {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_zentra-smoke"));
        cmd.args(&args).current_dir(&home).env_clear().env("HOME", &home);
        if let Ok(path) = std::env::var("PATH") {
            cmd.env("PATH", path);
        }

        let output = cmd.output().expect("failed to execute zentra-smoke");
        CliOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    })
    .await
    .expect("task join error")
}

#[tokio::test]
async fn test_steps_text() {
    let home = tempfile::tempdir().expect("temp dir");

    let output = run_cli(home.path(), &["steps", "--preflight", "--verify-delete"]).await;

    assert!(output.success, "stderr: {}", output.stderr);
    assert!(output.stdout.contains("Health Check"));
    assert!(output.stdout.contains("Confirm Message Deleted"));
    assert!(output.stdout.contains("/messages/{messageId}/reactions"));
}

#[tokio::test]
async fn test_steps_json() {
    let home = tempfile::tempdir().expect("temp dir");

    let output = run_cli(home.path(), &["steps", "--output", "json"]).await;

    assert!(output.success, "stderr: {}", output.stderr);
    let rows: serde_json::Value = serde_json::from_str(&output.stdout).expect("valid JSON");
    let rows = rows.as_array().expect("array of steps");
    assert_eq!(rows.len(), 12);
    assert_eq!(rows[0]["step"], "register");
    assert_eq!(rows[0]["expected_status"], 201);
    assert_eq!(rows[11]["step"], "list_communities");
}

#[tokio::test]
async fn test_run_json_report() {
    let home = tempfile::tempdir().expect("temp dir");
    let backend = MockBackend::start().await;
    let base_url = backend.api_url();

    let output = run_cli(
        home.path(),
        &["run", "--base-url", &base_url, "--suffix", SUFFIX, "--output", "json"],
    )
    .await;

    assert!(output.success, "stderr: {}", output.stderr);
    let report: serde_json::Value =
        serde_json::from_str(&output.stdout).expect("stdout holds only the JSON report");
    assert_eq!(report["community_id"], COMMUNITY_ID);
    assert_eq!(report["username"], "testuser_ab12cd34");
    assert_eq!(report["steps"].as_array().map(Vec::len), Some(12));
}

#[tokio::test]
async fn test_run_text_progress() {
    let home = tempfile::tempdir().expect("temp dir");
    let backend = MockBackend::start().await;
    let base_url = backend.api_url();

    let output = run_cli(home.path(), &["run", "--base-url", &base_url, "--suffix", SUFFIX]).await;

    assert!(output.success, "stderr: {}", output.stderr);
    assert!(output.stdout.contains("Starting E2E API tests..."));
    assert!(output.stdout.contains("Testing Registration: testuser_ab12cd34"));
    assert!(output.stdout.contains("SUCCESS:"));
    assert!(output.stdout.contains("Registration successful"));
    assert!(output.stdout.contains("All E2E API tests passed successfully!"));
}

#[tokio::test]
async fn test_run_failure_exits_non_zero() {
    let home = tempfile::tempdir().expect("temp dir");
    let backend = MockBackend::start().await;
    backend
        .override_with(
            Mock::given(method("POST")).and(path(api_path("/auth/register"))).respond_with(
                ResponseTemplate::new(400).set_body_json(json!({
                    "error": "Validation failed",
                    "details": {"password": "too weak"}
                })),
            ),
        )
        .await;
    let base_url = backend.api_url();

    let output =
        run_cli(home.path(), &["run", "--base-url", &base_url, "--password", "weak"]).await;

    assert!(!output.success);
    assert!(output.stderr.contains("FAIL:"), "stderr: {}", output.stderr);
    assert!(output.stderr.contains("Registration failed with 400 Bad Request"));
    assert!(output.stderr.contains("too weak"));
    assert!(output.stderr.contains("Backend error: Validation failed"));
    assert!(!output.stdout.contains("passed successfully"));
}

#[tokio::test]
async fn test_invalid_base_url_is_unexpected_error() {
    let home = tempfile::tempdir().expect("temp dir");

    let output = run_cli(home.path(), &["run", "--base-url", "ftp://example.com/api/v1"]).await;

    assert!(!output.success);
    assert!(output.stderr.contains("ERROR:"), "stderr: {}", output.stderr);
    assert!(output.stderr.contains("Tests failed with unexpected error:"));
    assert!(!output.stderr.contains("FAIL:"));
}

#[tokio::test]
async fn test_health_command() {
    let home = tempfile::tempdir().expect("temp dir");
    let backend = MockBackend::start().await;
    let base_url = backend.api_url();

    let output = run_cli(home.path(), &["health", "--base-url", &base_url]).await;

    assert!(output.success, "stderr: {}", output.stderr);
    assert!(output.stdout.contains(&format!("{}/health is ok", backend.server.uri())));
}

#[tokio::test]
async fn test_health_command_against_dead_backend() {
    let home = tempfile::tempdir().expect("temp dir");

    let output =
        run_cli(home.path(), &["health", "--base-url", "http://127.0.0.1:1/api/v1", "--timeout", "2"])
            .await;

    assert!(!output.success);
    assert!(output.stderr.contains("Health check against http://127.0.0.1:1/health failed"));
}

#[tokio::test]
async fn test_config_file_supplies_base_url() {
    let home = tempfile::tempdir().expect("temp dir");
    let backend = MockBackend::start().await;
    let base_url = backend.api_url();
    let config_path = home.path().join("smoke.toml");
    let config = config_path.to_str().expect("utf-8 path");

    let init = run_cli(home.path(), &["config", "init", "--config", config]).await;
    assert!(init.success, "stderr: {}", init.stderr);

    let set = run_cli(home.path(), &["config", "set", "base_url", &base_url, "--config", config])
        .await;
    assert!(set.success, "stderr: {}", set.stderr);

    let output =
        run_cli(home.path(), &["run", "--suffix", SUFFIX, "--output", "yaml", "--config", config])
            .await;
    assert!(output.success, "stderr: {}", output.stderr);
    assert!(output.stdout.contains(COMMUNITY_ID));
}

#[tokio::test]
async fn test_config_show_masks_password() {
    let home = tempfile::tempdir().expect("temp dir");
    let config_path = home.path().join("smoke.toml");
    let config = config_path.to_str().expect("utf-8 path");

    run_cli(home.path(), &["config", "init", "--config", config]).await;
    let set = run_cli(home.path(), &["config", "set", "password", "Sup3rSecret!", "--config", config])
        .await;
    assert!(set.success, "stderr: {}", set.stderr);

    let shown = run_cli(home.path(), &["config", "show", "--output", "json", "--config", config])
        .await;
    assert!(shown.success, "stderr: {}", shown.stderr);
    assert!(!shown.stdout.contains("Sup3rSecret!"));

    let on_disk = std::fs::read_to_string(&config_path).expect("config written");
    assert!(on_disk.contains("Sup3rSecret!"));
}

#[tokio::test]
async fn test_config_path_defaults_to_home() {
    let home = tempfile::tempdir().expect("temp dir");

    let output = run_cli(home.path(), &["config", "path"]).await;

    assert!(output.success, "stderr: {}", output.stderr);
    let expected = home.path().join(".zentra").join("smoke.toml");
    assert_eq!(output.stdout.trim(), expected.display().to_string());
}

#[tokio::test]
async fn test_verbose_run_logs_bodies() {
    let home = tempfile::tempdir().expect("temp dir");
    let backend = MockBackend::start().await;
    let base_url = backend.api_url();

    let output = run_cli(
        home.path(),
        &["-v", "run", "--base-url", &base_url, "--suffix", SUFFIX, "--output", "json"],
    )
    .await;

    assert!(output.success, "stderr: {}", output.stderr);
    assert!(output.stderr.contains("Request body"), "stderr: {}", output.stderr);
    assert!(output.stderr.contains("Response body"));
    assert!(output.stderr.contains("testuser_ab12cd34"));
    serde_json::from_str::<serde_json::Value>(&output.stdout).expect("logs stay off stdout");
}

#[tokio::test]
async fn test_quiet_run_omits_bodies() {
    let home = tempfile::tempdir().expect("temp dir");
    let backend = MockBackend::start().await;
    let base_url = backend.api_url();

    let output = run_cli(
        home.path(),
        &["run", "--base-url", &base_url, "--suffix", SUFFIX, "--output", "json"],
    )
    .await;

    assert!(output.success, "stderr: {}", output.stderr);
    assert!(!output.stderr.contains("Response body"));
}

#[tokio::test]
async fn test_failure_shows_backend_error_code() {
    let home = tempfile::tempdir().expect("temp dir");
    let backend = MockBackend::start().await;
    backend
        .override_with(
            Mock::given(method("POST")).and(path(api_path("/auth/register"))).respond_with(
                ResponseTemplate::new(409).set_body_json(json!({
                    "error": "Username already taken",
                    "code": "CONFLICT"
                })),
            ),
        )
        .await;
    let base_url = backend.api_url();

    let output = run_cli(home.path(), &["run", "--base-url", &base_url, "--suffix", SUFFIX]).await;

    assert!(!output.success);
    assert!(output.stderr.contains("Registration failed with 409 Conflict"), "stderr: {}", output.stderr);
    assert!(output.stderr.contains("Backend error: [CONFLICT] Username already taken"));
}
