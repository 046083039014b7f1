// crates/airtable-gate-cli/src/main.rs
// ============================================================================
// Module: Airtable Gate CLI Entry Point
// Description: Command dispatcher for the Airtable Gate MCP server.
// Purpose: Provide a safe CLI for serving and inspecting the tool catalog.
// Dependencies: airtable-gate-mcp, clap, serde_json, tokio
// ============================================================================

//! ## Overview
//! The Airtable Gate CLI starts the MCP server and prints the tool catalog.
//! The runtime is single-threaded: dispatch logic never executes on parallel
//! threads, and calls suspend only at upstream network I/O.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use airtable_gate_contract::tool_definitions;
use airtable_gate_mcp::AirtableGateConfig;
use airtable_gate_mcp::McpServer;
use airtable_gate_mcp::ServerTransport;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "airtable-gate", version, about = "Gated Airtable MCP server")]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Airtable Gate MCP server.
    Serve(ServeCommand),
    /// Tool catalog utilities.
    Tools {
        /// Selected tools subcommand.
        #[command(subcommand)]
        command: ToolsCommand,
    },
}

/// Arguments for the serve subcommand.
#[derive(clap::Args, Debug)]
struct ServeCommand {
    /// Configuration file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Transport override.
    #[arg(long, value_enum, value_name = "TRANSPORT")]
    transport: Option<TransportArg>,
    /// Bind address override for the HTTP transport.
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,
}

/// Transport selection argument.
#[derive(ValueEnum, Debug, Clone, Copy)]
enum TransportArg {
    /// JSON-RPC over stdin/stdout.
    Stdio,
    /// JSON-RPC over HTTP.
    Http,
}

impl From<TransportArg> for ServerTransport {
    fn from(value: TransportArg) -> Self {
        match value {
            TransportArg::Stdio => Self::Stdio,
            TransportArg::Http => Self::Http,
        }
    }
}

/// Tool catalog subcommands.
#[derive(Subcommand, Debug)]
enum ToolsCommand {
    /// Print the tool catalog as JSON.
    List,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Serve(command) => command_serve(command).await,
        Commands::Tools {
            command,
        } => command_tools(&command),
    }
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Starts the MCP server with optional overrides applied.
async fn command_serve(command: ServeCommand) -> CliResult<ExitCode> {
    let mut config = AirtableGateConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(err.to_string()))?;
    if let Some(transport) = command.transport {
        config.server.transport = transport.into();
    }
    if let Some(bind) = command.bind {
        config.server.bind = Some(bind);
    }
    let server = McpServer::from_config(config).map_err(|err| CliError::new(err.to_string()))?;
    server.serve().await.map_err(|err| CliError::new(err.to_string()))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Tools Command
// ============================================================================

/// Executes a tools subcommand.
fn command_tools(command: &ToolsCommand) -> CliResult<ExitCode> {
    match command {
        ToolsCommand::List => {
            let catalog = serde_json::to_string_pretty(&tool_definitions())
                .map_err(|err| CliError::new(err.to_string()))?;
            write_stdout_line(&catalog)
                .map_err(|err| CliError::new(format!("stdout write failed: {err}")))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes one line to stdout.
fn write_stdout_line(line: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{line}")?;
    stdout.flush()
}

/// Writes an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let mut stderr = std::io::stderr().lock();
    let _ = writeln!(stderr, "airtable-gate: {message}");
    ExitCode::FAILURE
}
