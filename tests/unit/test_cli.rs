//! Tests for the `irmap` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn irmap() -> Command {
    let mut cmd = Command::cargo_bin("irmap").unwrap();
    cmd.env_remove("IRMAP_ANALYZER_ENDPOINT")
        .env_remove("IRMAP_ANALYZER_PATH")
        .env_remove("IRMAP_ANALYZER_TIMEOUT")
        .env_remove("IRMAP_LOG")
        .env_remove("RUST_LOG");
    cmd
}

fn config_file(body: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", body).unwrap();
    file
}

#[test]
fn test_assess_prints_scored_json() {
    let cfg = config_file("");
    irmap()
        .args(["-c", cfg.path().to_str().unwrap()])
        .args([
            "assess",
            "--asset-id",
            "2",
            "--threat",
            "Phishing",
            "--vulnerability",
            "No MFA",
            "--likelihood",
            "3",
            "--impact",
            "5",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"score\": 15"))
        .stdout(predicate::str::contains("\"level\": \"critical\""));
}

#[test]
fn test_assess_rejects_out_of_range() {
    let cfg = config_file("");
    irmap()
        .args(["-c", cfg.path().to_str().unwrap()])
        .args([
            "assess",
            "--asset-id",
            "2",
            "--threat",
            "t",
            "--vulnerability",
            "v",
            "--likelihood",
            "9",
            "--impact",
            "1",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("likelihood"));
}

#[test]
fn test_session_resolves_seed() {
    let cfg = config_file("[[session.seed]]\ntoken = \"tok-9\"\nusername = \"auditor\"\n");
    irmap()
        .args(["-c", cfg.path().to_str().unwrap(), "session", "tok-9"])
        .assert()
        .success()
        .stdout("auditor\n");
}

#[test]
fn test_session_unknown_token_fails() {
    let cfg = config_file("");
    irmap()
        .args(["-c", cfg.path().to_str().unwrap(), "session", "nope"])
        .assert()
        .failure();
}

#[test]
fn test_invalid_endpoint_is_config_error() {
    let cfg = config_file("[analyzer]\nendpoint = \"ftp://scoring\"\n");
    irmap()
        .args(["-c", cfg.path().to_str().unwrap(), "config"])
        .assert()
        .code(2);
}

#[test]
fn test_config_prints_defaults() {
    let cfg = config_file("");
    irmap()
        .args(["-c", cfg.path().to_str().unwrap(), "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://127.0.0.1:5000"))
        .stdout(predicate::str::contains("/analyze"));
}

#[test]
fn test_analyze_unreachable_service_exit_code() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let cfg = config_file(&format!("[analyzer]\nendpoint = \"{}\"\n", endpoint));
    let asset = config_file(r#"{"name":"srv1"}"#);

    irmap()
        .args(["-c", cfg.path().to_str().unwrap()])
        .args(["analyze", asset.path().to_str().unwrap(), "--raw"])
        .assert()
        .code(4);
}

// ============================================================================
// Configuration file errors
// ============================================================================

#[test]
fn test_malformed_config_file_is_config_error() {
    let cfg = config_file("[analyzer\nendpoint = ");
    irmap()
        .args(["-c", cfg.path().to_str().unwrap(), "config"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to parse"));
}

#[test]
fn test_missing_config_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    irmap()
        .args(["-c", missing.to_str().unwrap(), "config"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to read config"));
}

// ============================================================================
// Environment overrides
// ============================================================================

#[test]
fn test_env_overrides_endpoint() {
    let cfg = config_file("[analyzer]\nendpoint = \"http://127.0.0.1:5000\"\n");
    irmap()
        .env("IRMAP_ANALYZER_ENDPOINT", "http://scoring:9000")
        .args(["-c", cfg.path().to_str().unwrap(), "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("endpoint = \"http://scoring:9000\""));
}

#[test]
fn test_env_overrides_path() {
    let cfg = config_file("");
    irmap()
        .env("IRMAP_ANALYZER_PATH", "/v2/analyze")
        .args(["-c", cfg.path().to_str().unwrap(), "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("path = \"/v2/analyze\""));
}

#[test]
fn test_env_path_is_validated() {
    let cfg = config_file("");
    irmap()
        .env("IRMAP_ANALYZER_PATH", "analyze")
        .args(["-c", cfg.path().to_str().unwrap(), "config"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("analyzer.path"));
}

#[test]
fn test_env_overrides_timeout() {
    let cfg = config_file("[analyzer]\ntimeout_secs = 60\n");
    irmap()
        .env("IRMAP_ANALYZER_TIMEOUT", "15")
        .args(["-c", cfg.path().to_str().unwrap(), "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("timeout_secs = 15"));
}

#[test]
fn test_invalid_env_timeout_is_config_error() {
    let cfg = config_file("");
    irmap()
        .env("IRMAP_ANALYZER_TIMEOUT", "thirty")
        .args(["-c", cfg.path().to_str().unwrap(), "config"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("IRMAP_ANALYZER_TIMEOUT"))
        .stderr(predicate::str::contains("thirty"));
}

#[test]
fn test_env_overrides_log_filter() {
    let cfg = config_file("[logging]\nfilter = \"warn\"\n");
    irmap()
        .env("IRMAP_LOG", "debug")
        .args(["-c", cfg.path().to_str().unwrap(), "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("filter = \"debug\""));
}
