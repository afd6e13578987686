// crates/radgate-config/tests/load_validation.rs
// ============================================================================
// Module: Config Loading Tests
// Description: File loading, TOML parsing, and environment override tests.
// Purpose: Ensure load() composes read, override, and validation correctly.
// ============================================================================

//! ## Overview
//! Round-trips configs through TOML files and verifies that environment
//! overrides inject secrets without touching the checked-in file.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]
#![allow(unsafe_code, reason = "Process-env mutation requires unsafe in edition 2024.")]

use std::fs;
use std::path::PathBuf;

use radgate_config::ConfigError;
use radgate_config::RadgateConfig;
use tempfile::TempDir;

fn write_config(dir: &TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).expect("write config file");
    path
}

#[test]
fn loads_a_complete_config_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_config(
        &dir,
        "radgate.toml",
        r#"
[server]
bind_addr = "127.0.0.1:9001"

[radflow]
partner_api_key = "file-partner-key"

[casebook]
api_user = "file-user"
api_password = "file-pass"
"#,
    );
    let config = RadgateConfig::load(&path).expect("load config");
    assert_eq!(config.server.bind_addr, "127.0.0.1:9001");
    assert_eq!(config.radflow.partner_api_key, "file-partner-key");
    assert_eq!(config.radflow.timeout_secs, 30);
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("absent.toml");
    match RadgateConfig::load(&path) {
        Err(ConfigError::Read {
            ..
        }) => {}
        other => panic!("expected read error, got {other:?}"),
    }
}

#[test]
fn unknown_keys_are_a_parse_error() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_config(&dir, "radgate.toml", "[server]\nbind_port = 9001\n");
    match RadgateConfig::load(&path) {
        Err(ConfigError::Parse {
            ..
        }) => {}
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn incomplete_credentials_are_an_invalid_error() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_config(
        &dir,
        "radgate.toml",
        "[radflow]\npartner_api_key = \"key-only\"\n",
    );
    match RadgateConfig::load(&path) {
        Err(ConfigError::Invalid(message)) => {
            assert!(message.contains("casebook.api_user"), "unexpected message: {message}");
        }
        other => panic!("expected invalid error, got {other:?}"),
    }
}

#[test]
fn environment_overrides_inject_secrets() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_config(
        &dir,
        "radgate.toml",
        "[radflow]\npartner_api_key = \"from-file\"\n[casebook]\napi_user = \"u\"\napi_password = \"p\"\n",
    );
    // SAFETY: this test is the only one in the binary touching process env.
    unsafe {
        std::env::set_var("RADGATE_PARTNER_API_KEY", "from-env");
    }
    let config = RadgateConfig::load(&path).expect("load config");
    unsafe {
        std::env::remove_var("RADGATE_PARTNER_API_KEY");
    }
    assert_eq!(config.radflow.partner_api_key, "from-env");
}
