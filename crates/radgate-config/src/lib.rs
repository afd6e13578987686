// crates/radgate-config/src/lib.rs
// ============================================================================
// Module: Radgate Config
// Description: Canonical configuration model for server and upstreams.
// Purpose: Load, override, and validate deployment configuration fail-closed.
// Dependencies: serde, thiserror, toml, url
// ============================================================================

//! ## Overview
//! One configuration type covers the listener and both upstream services.
//! Loading is TOML-first with environment overrides for secrets so
//! credentials never have to live in a checked-in file. Validation is
//! fail-closed: empty URLs, out-of-range timeouts, or absent credentials
//! reject the whole config before the server starts. Disabling TLS
//! verification is a per-upstream explicit opt-in, never a default.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod config;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use config::CasebookConfig;
pub use config::ConfigError;
pub use config::MAX_CREDENTIAL_LENGTH;
pub use config::MAX_TIMEOUT_SECS;
pub use config::MAX_URL_LENGTH;
pub use config::RadflowConfig;
pub use config::RadgateConfig;
pub use config::ServerConfig;
