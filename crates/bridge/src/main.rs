//! Tracker authorization bridge CLI.
//!
//! Provides commands for:
//! - `keys`: Check the application key pair
//! - `authorize-url`: Start authorization and print the consent URL
//! - `authorize`: Complete authorization with the verifier code
//! - `status`: Check whether a user is authorized

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AuthorizeArgs, AuthorizeUrlArgs, KeysArgs, StatusArgs};
use error::CliError;
use output::Output;

/// Tracker authorization bridge.
#[derive(Parser)]
#[command(name = "bridge", version, about)]
struct Cli {
    /// Enable info-level logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the application key pair is provisioned.
    Keys(KeysArgs),
    /// Start authorization and print the consent URL.
    AuthorizeUrl(AuthorizeUrlArgs),
    /// Exchange a verifier code for an access token.
    Authorize(AuthorizeArgs),
    /// Check whether a user is authorized.
    Status(StatusArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Keys(args) => args.execute(),
        Commands::AuthorizeUrl(args) => args.execute(),
        Commands::Authorize(args) => args.execute(),
        Commands::Status(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        if let CliError::Authorization(auth_err) = &err {
            output.warning(auth_err.remediation());
        }
        std::process::exit(1);
    }
}
