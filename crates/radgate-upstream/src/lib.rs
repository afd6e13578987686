// crates/radgate-upstream/src/lib.rs
// ============================================================================
// Module: Radgate Upstream
// Description: Credential lifecycle and outbound gateway clients.
// Purpose: Own every network interaction with the two upstream services.
// Dependencies: radgate-core, radgate-config, reqwest, tokio
// ============================================================================

//! ## Overview
//! This crate owns the two outbound concerns of the gateway: the partner
//! token lifecycle (single-flight refresh behind a read-write lock) and the
//! HTTP clients that talk to the RadFlow and Casebook services. Clients
//! return [`radgate_core::UpstreamCallResult`] instead of raising past the
//! boundary; exactly one attempt is made per call and nothing is retried or
//! cached.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod credentials;
pub mod endpoints;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use client::AuthMode;
pub use client::EndpointSpec;
pub use client::Gateway;
pub use client::GatewayError;
pub use client::UpstreamClient;
pub use client::UpstreamClientOptions;
pub use credentials::CredentialManager;
pub use credentials::IssuedToken;
pub use credentials::PartnerTokenIssuer;
pub use credentials::TokenIssuer;
pub use credentials::decode_jwt_expiry;
pub use endpoints::CasebookEndpoints;
pub use endpoints::RadflowEndpoints;
pub use endpoints::partner_token_endpoint;
