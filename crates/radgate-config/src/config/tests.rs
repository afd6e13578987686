// crates/radgate-config/src/config/tests.rs
// ============================================================================
// Module: Configuration Model Tests
// Description: Unit tests for field validation rules.
// Purpose: Ensure config validation is fail-closed and names the field.
// Dependencies: radgate-config
// ============================================================================

//! ## Overview
//! Exercises every validation rule against a known-good baseline config so
//! each test flips exactly one field.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use super::ConfigError;
use super::MAX_CREDENTIAL_LENGTH;
use super::MAX_TIMEOUT_SECS;
use super::MAX_URL_LENGTH;
use super::RadgateConfig;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn valid_config() -> RadgateConfig {
    let mut config = RadgateConfig::default();
    config.radflow.partner_api_key = "partner-key".to_string();
    config.casebook.api_user = "casebook-user".to_string();
    config.casebook.api_password = "casebook-pass".to_string();
    config
}

fn assert_invalid(config: &RadgateConfig, needle: &str) {
    match config.validate() {
        Err(ConfigError::Invalid(message)) => {
            assert!(message.contains(needle), "error '{message}' did not contain '{needle}'");
        }
        other => panic!("expected invalid config, got {other:?}"),
    }
}

// ============================================================================
// SECTION: Baseline
// ============================================================================

#[test]
fn baseline_config_validates() {
    valid_config().validate().expect("baseline config");
}

#[test]
fn default_config_is_rejected_without_credentials() {
    assert_invalid(&RadgateConfig::default(), "credential must be non-empty");
}

// ============================================================================
// SECTION: Server Rules
// ============================================================================

#[test]
fn rejects_unparseable_bind_address() {
    let mut config = valid_config();
    config.server.bind_addr = "not-an-addr".to_string();
    assert_invalid(&config, "bind address is invalid");
}

// ============================================================================
// SECTION: URL Rules
// ============================================================================

#[test]
fn rejects_empty_url() {
    let mut config = valid_config();
    config.radflow.lookup_url = String::new();
    assert_invalid(&config, "url must be non-empty: radflow.lookup_url");
}

#[test]
fn rejects_overlong_url() {
    let mut config = valid_config();
    config.casebook.patient_report_url = format!("https://h.example/{}", "a".repeat(MAX_URL_LENGTH));
    assert_invalid(&config, "url too long: casebook.patient_report_url");
}

#[test]
fn rejects_non_http_scheme() {
    let mut config = valid_config();
    config.radflow.partner_token_url = "ftp://host.example/token".to_string();
    assert_invalid(&config, "unsupported url scheme 'ftp'");
}

#[test]
fn rejects_unparseable_url() {
    let mut config = valid_config();
    config.casebook.insert_case_update_log_url = "://nope".to_string();
    assert_invalid(&config, "url is invalid: casebook.insert_case_update_log_url");
}

// ============================================================================
// SECTION: Credential Rules
// ============================================================================

#[test]
fn rejects_blank_partner_api_key() {
    let mut config = valid_config();
    config.radflow.partner_api_key = "   ".to_string();
    assert_invalid(&config, "credential must be non-empty: radflow.partner_api_key");
}

#[test]
fn rejects_overlong_credential() {
    let mut config = valid_config();
    config.casebook.api_password = "a".repeat(MAX_CREDENTIAL_LENGTH + 1);
    assert_invalid(&config, "credential too long: casebook.api_password");
}

// ============================================================================
// SECTION: Timeout Rules
// ============================================================================

#[test]
fn rejects_zero_timeout() {
    let mut config = valid_config();
    config.radflow.timeout_secs = 0;
    assert_invalid(&config, "timeout must be between 1 and");
}

#[test]
fn rejects_excessive_timeout() {
    let mut config = valid_config();
    config.casebook.timeout_secs = MAX_TIMEOUT_SECS + 1;
    assert_invalid(&config, "casebook.timeout_secs");
}

#[test]
fn accepts_timeout_at_the_bound() {
    let mut config = valid_config();
    config.radflow.timeout_secs = MAX_TIMEOUT_SECS;
    config.validate().expect("bound timeout");
}

// ============================================================================
// SECTION: TLS Opt-in
// ============================================================================

#[test]
fn tls_verification_is_on_by_default() {
    let config = RadgateConfig::default();
    assert!(!config.radflow.danger_accept_invalid_certs);
    assert!(!config.casebook.danger_accept_invalid_certs);
}
