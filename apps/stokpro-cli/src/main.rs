//! # StokPro CLI Entry Point
//!
//! ## Startup Sequence
//! 1. Initialize tracing (stderr, so JSON on stdout stays clean)
//! 2. Parse arguments
//! 3. Load configuration from the environment, apply flag overrides
//! 4. Run the command and print its output

use std::process::ExitCode;

use clap::Parser;
use stokpro_cli::config::{CliConfig, OutputFormat};
use stokpro_cli::error::CliError;
use stokpro_cli::{run, Cli};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let requested_format = cli.format;

    let config = match CliConfig::load() {
        Ok(config) => config.with_overrides(cli.snapshot.clone(), cli.format),
        Err(err) => {
            return report(CliError::from(err), requested_format.unwrap_or_default());
        }
    };
    debug!(?config, "Configuration loaded");

    let format = config.format;
    match run(cli, &config).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => report(err, format),
    }
}

/// Prints a failure in the requested format and picks the exit status.
fn report(err: CliError, format: OutputFormat) -> ExitCode {
    error!(code = ?err.code, "{}", err.message);

    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(&err) {
            Ok(json) => println!("{json}"),
            Err(_) => eprintln!("{err}"),
        },
        OutputFormat::Text => eprintln!("error: {}", err.message),
    }
    ExitCode::FAILURE
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=stokpro_cli=trace` - Trace the CLI only
/// - Default: INFO level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
