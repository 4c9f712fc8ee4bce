//! # Press Start Back-Office Entry Point
//!
//! ## Startup Sequence
//! 1. Parse the command line
//! 2. Load configuration (defaults, TOML file, environment)
//! 3. Initialize tracing (to stderr)
//! 4. Connect to PostgreSQL, migrating if configured
//! 5. Run the command and print its result as JSON
//! 6. Close the pool
//!
//! Any failure is printed to stderr as an `AppError` JSON object and the
//! process exits with status 1.

use std::process::ExitCode;

use clap::Parser;
use pressstart_backoffice::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match pressstart_backoffice::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err.to_json());
            ExitCode::FAILURE
        }
    }
}
