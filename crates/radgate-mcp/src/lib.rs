// crates/radgate-mcp/src/lib.rs
// ============================================================================
// Module: Radgate MCP
// Description: Tool registry, handlers, and JSON-RPC transport surface.
// Purpose: Expose the record tools to MCP clients over one uniform envelope.
// Dependencies: radgate-core, radgate-config, radgate-upstream, axum, tokio
// ============================================================================

//! ## Overview
//! This crate is the boundary layer: a static tool registry built once at
//! startup, one handler per named operation, and a JSON-RPC server that
//! routes `tools/list` and `tools/call`. Handlers compose the credential
//! manager, gateway clients, normalizer, and validation engine; every
//! failure path resolves to the `{success: false, error}` envelope and
//! nothing throws past the tool boundary.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod requests;
pub mod server;
pub mod telemetry;
pub mod tools;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use server::McpServer;
pub use server::McpServerError;
pub use server::ServerState;
pub use telemetry::CallOutcome;
pub use telemetry::NoopMetrics;
pub use telemetry::ToolCallEvent;
pub use telemetry::ToolMetrics;
pub use tools::ToolDeps;
pub use tools::ToolHandler;
pub use tools::ToolRegistry;
pub use tools::ToolRegistryError;
pub use tools::ToolSpec;
