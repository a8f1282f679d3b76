use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn config_init_writes_example_file() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("config.toml");

    let mut cmd = cargo_bin_cmd!("reddit-research");
    cmd.args(["config", "init", "--path"])
        .arg(&config_path)
        .assert()
        .success();

    let content = fs::read_to_string(&config_path).expect("read config");
    assert!(content.contains("monitoring_duration_secs"));
    assert!(content.contains("provider = \"openai\""));
    assert!(content.contains("rate_limit_delay_secs"));
}

#[test]
fn config_init_refuses_to_overwrite_without_force() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "# existing").expect("write existing config");

    let mut cmd = cargo_bin_cmd!("reddit-research");
    cmd.args(["config", "init", "--path"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn run_fails_cleanly_when_reddit_credentials_are_missing() {
    let mut cmd = cargo_bin_cmd!("reddit-research");
    cmd.env_remove("REDDIT_CLIENT_ID")
        .args([
            "run",
            "--prompt",
            "What features do users want?",
            "--subreddit",
            "smartphones",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("REDDIT_CLIENT_ID"));
}

#[test]
fn missing_config_file_is_an_error() {
    let mut cmd = cargo_bin_cmd!("reddit-research");
    cmd.args([
        "--config",
        "/nonexistent/config.toml",
        "run",
        "--prompt",
        "topic",
        "--subreddit",
        "rust",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Config file not found"));
}
