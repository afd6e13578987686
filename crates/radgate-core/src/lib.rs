// crates/radgate-core/src/lib.rs
// ============================================================================
// Module: Radgate Core
// Description: Canonical record model, normalization, and validation engine.
// Purpose: Provide the upstream-agnostic core shared by gateway and tools.
// Dependencies: serde, serde_json, thiserror, time
// ============================================================================

//! ## Overview
//! Radgate core defines the canonical patient/study record schema, the
//! uniform response envelope every tool returns, the error taxonomy, the
//! record normalizer that flattens heterogeneous upstream payloads, and the
//! event-conditioned validation engine for write operations. Nothing in this
//! crate performs I/O; upstream calls live in `radgate-upstream` and tool
//! dispatch lives in `radgate-mcp`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod call;
pub mod clock;
pub mod dates;
pub mod envelope;
pub mod error;
pub mod normalize;
pub mod records;
pub mod validate;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use call::CallFailure;
pub use call::UpstreamCallResult;
pub use clock::Clock;
pub use clock::SystemClock;
pub use envelope::DataSuccess;
pub use envelope::PatientSuccess;
pub use envelope::StudySuccess;
pub use envelope::ToolEnvelope;
pub use envelope::ToolFailure;
pub use error::ToolError;
pub use normalize::MAX_UNWRAP_DEPTH;
pub use normalize::NormalizeKind;
pub use normalize::normalize;
pub use normalize::strip_dialing_prefix;
pub use records::CanonicalPatientRecord;
pub use records::CanonicalStudyRecord;
pub use records::StudyFacility;
pub use validate::required_fields_for;
pub use validate::validate_case_update;
