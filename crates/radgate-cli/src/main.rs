// crates/radgate-cli/src/main.rs
// ============================================================================
// Module: Radgate CLI Entry Point
// Description: Command dispatcher for the Radgate MCP server.
// Purpose: Serve the gateway, validate configs, and print the tool catalog.
// Dependencies: clap, radgate-config, radgate-mcp, tokio, tracing-subscriber
// ============================================================================

//! ## Overview
//! Thin operational wrapper around the gateway: `serve` loads and validates
//! the config, assembles the server, and runs it on a multi-threaded
//! runtime; `check-config` validates without serving; `tools` prints the
//! static tool catalog as JSON. Logging is `tracing` with an env-filter
//! (`RUST_LOG`), defaulting to `info`.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;
use radgate_config::RadgateConfig;
use radgate_mcp::McpServer;
use serde_json::Value;
use serde_json::json;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Command Line
// ============================================================================

/// Radgate command line.
#[derive(Debug, Parser)]
#[command(
    name = "radgate",
    version,
    about = "MCP gateway for patient, study, and case-management records"
)]
struct Cli {
    /// Selected subcommand.
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Run the MCP server.
    Serve {
        /// Path to the configuration file.
        #[arg(long, default_value = "radgate.toml")]
        config: PathBuf,
    },
    /// Validate a configuration file and exit.
    CheckConfig {
        /// Path to the configuration file.
        #[arg(long, default_value = "radgate.toml")]
        config: PathBuf,
    },
    /// Print the tool catalog as JSON.
    Tools,
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            tracing::error!("{message}");
            let mut stderr = std::io::stderr().lock();
            let _ = writeln!(stderr, "error: {message}");
            ExitCode::FAILURE
        }
    }
}

/// Installs the tracing subscriber with `RUST_LOG` filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Routes the parsed command line.
fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Serve {
            config,
        } => serve(&config),
        Command::CheckConfig {
            config,
        } => check_config(&config),
        Command::Tools => print_tools(),
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Loads the config, assembles the server, and serves until shutdown.
fn serve(path: &Path) -> Result<(), String> {
    let config = RadgateConfig::load(path).map_err(|err| err.to_string())?;
    let server = McpServer::from_config(&config).map_err(|err| err.to_string())?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("failed to start runtime: {err}"))?;
    runtime.block_on(server.run()).map_err(|err| err.to_string())
}

/// Validates a config file without serving.
fn check_config(path: &Path) -> Result<(), String> {
    RadgateConfig::load(path).map_err(|err| err.to_string())?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "config ok: {}", path.display()).map_err(|err| err.to_string())
}

/// Prints the static tool catalog as JSON.
fn print_tools() -> Result<(), String> {
    let catalog = tool_catalog()?;
    let rendered =
        serde_json::to_string_pretty(&catalog).map_err(|err| err.to_string())?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}").map_err(|err| err.to_string())
}

/// Builds the tool catalog from a default (unserved) assembly.
fn tool_catalog() -> Result<Value, String> {
    let server =
        McpServer::from_config(&RadgateConfig::default()).map_err(|err| err.to_string())?;
    let tools: Vec<Value> = server
        .state()
        .registry
        .specs()
        .into_iter()
        .map(|spec| {
            json!({
                "name": spec.name,
                "description": spec.description,
                "inputSchema": spec.input_schema
            })
        })
        .collect();
    Ok(json!({"tools": tools}))
}
