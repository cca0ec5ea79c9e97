//! Integration tests for the catalan-lab binary
//!
//! Only paths that fail or exit before a model is downloaded are covered here.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn lab() -> Command {
    let mut cmd = Command::cargo_bin("catalan-lab").unwrap();
    cmd.env_remove("CATALAN_LAB_CONFIG")
        .env_remove("CATALAN_LAB_DEVICE")
        .env_remove("CATALAN_LAB_TOP_K")
        .env_remove("CATALAN_LAB_MAX_LENGTH");
    cmd
}

/// Config file in a fresh directory, so the per-user file is never read.
fn config_file(content: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, content).unwrap();
    (dir, path)
}

#[test]
fn test_help_lists_commands() {
    lab()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("mask"))
        .stdout(predicate::str::contains("pos"))
        .stdout(predicate::str::contains("ner"))
        .stdout(predicate::str::contains("trad"));
}

#[test]
fn test_trad_help_shows_combination_default() {
    lab()
        .args(["trad", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--combination"))
        .stdout(predicate::str::contains("fr-ca"));
}

#[test]
fn test_version() {
    lab()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_subcommand_fails() {
    lab().assert().failure();
}

#[test]
fn test_unknown_device_is_rejected() {
    lab()
        .args(["--device", "tpu", "mask"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown device 'tpu'"));
}

#[test]
fn test_unknown_device_from_env_is_rejected() {
    lab()
        .env("CATALAN_LAB_DEVICE", "npu")
        .arg("pos")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown device"));
}

#[test]
fn test_missing_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.toml");

    lab()
        .arg("--config")
        .arg(&path)
        .arg("mask")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: Configuration file not found"));
}

#[test]
fn test_missing_config_file_from_env() {
    let dir = TempDir::new().unwrap();

    lab()
        .env("CATALAN_LAB_CONFIG", dir.path().join("nope.toml"))
        .arg("ner")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn test_invalid_config_file() {
    let (_dir, path) = config_file("[models\nmask = ");

    lab()
        .arg("--config")
        .arg(&path)
        .arg("pos")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid configuration file"));
}

#[test]
fn test_config_with_unknown_section() {
    let (_dir, path) = config_file("[colors]\nprompt = \"green\"\n");

    lab()
        .arg("--config")
        .arg(&path)
        .arg("pos")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("colors"));
}

#[test]
fn test_zero_top_k_from_config() {
    let (_dir, path) = config_file("[mask]\ntop_k = 0\n");

    lab()
        .arg("--config")
        .arg(&path)
        .arg("mask")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("top-k must be at least 1"));
}

#[test]
fn test_zero_top_k_flag() {
    let (_dir, path) = config_file("");

    lab()
        .arg("--config")
        .arg(&path)
        .args(["mask", "--top-k", "0"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("top-k must be at least 1"));
}

#[test]
fn test_malformed_combination() {
    let (_dir, path) = config_file("");

    lab()
        .arg("--config")
        .arg(&path)
        .args(["trad", "--combination", "francais"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Invalid language combination 'francais'",
        ));
}

#[test]
fn test_same_source_and_target() {
    let (_dir, path) = config_file("");

    lab()
        .arg("--config")
        .arg(&path)
        .args(["trad", "--combination", "ca-ca"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("both 'ca'"));
}

#[test]
fn test_zero_max_length() {
    let (_dir, path) = config_file("");

    lab()
        .arg("--config")
        .arg(&path)
        .args(["trad", "--max-length", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("max-length must be at least 1"));
}
