//! # Press Start Back-Office Library
//!
//! ## Module Organization
//! ```text
//! pressstart_backoffice/
//! ├── lib.rs          ◄─── You are here (startup & shutdown)
//! ├── cli.rs          ◄─── clap argument definitions
//! ├── config.rs       ◄─── BackofficeConfig loading and validation
//! ├── commands.rs     ◄─── One handler per subcommand
//! └── error.rs        ◄─── AppError presented to the operator
//! ```
//!
//! The [`Database`] handle is created here, lent to the command by
//! reference and closed before returning, whether the command failed or not.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

use pressstart_db::Database;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::BackofficeConfig;
use error::AppError;

/// Runs one back-office command to completion.
pub async fn run(cli: Cli) -> Result<(), AppError> {
    let config = BackofficeConfig::load(cli.config.as_deref())?;
    init_tracing(&config.log);

    info!(command = cli.command.name(), "Starting back office");

    let db = Database::connect(config.db_config()).await?;
    let result = commands::execute(&db, cli.command).await;
    db.close().await;

    let output = result?;
    let rendered = serde_json::to_string_pretty(&output)?;
    println!("{rendered}");

    Ok(())
}

/// Installs the tracing subscriber. Logs go to stderr so stdout stays JSON.
///
/// ## Log Levels
/// - `RUST_LOG` wins when set
/// - otherwise the configured `log` directive (default `info`)
fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{default_directive},sqlx=warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .init();
}
