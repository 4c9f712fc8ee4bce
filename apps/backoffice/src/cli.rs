//! Command-line interface.
//!
//! ```text
//! backoffice [--config FILE] <COMMAND>
//!
//!   migrate                                  run migrations, print status
//!   search <ENTITY> <CRITERIA_JSON>          e.g. search inventory '{"name":"Zelda"}'
//!   get <ENTITY> <ID>                        one row or NOT_FOUND
//!   lines <INVOICE> <ID>                     invoice header plus its lines
//!   report items [--month YYYY-MM] [--limit N]
//!   report stores [--month YYYY-MM]
//!   offers                                   front-page news
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use pressstart_core::DEFAULT_PAGE_LIMIT;

#[derive(Debug, Parser)]
#[command(name = "backoffice", version, about = "Press Start back-office tools")]
pub struct Cli {
    /// Path to a TOML config file (defaults to the platform config dir)
    #[arg(long, global = true, env = "PRESSSTART_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Apply pending migrations and print the migration status
    Migrate,

    /// Search an entity with a JSON object of criteria
    Search {
        entity: Entity,
        /// e.g. '{"storeId": 2, "name": "Zelda"}'
        criteria: String,
    },

    /// Fetch one row by id
    Get { entity: Entity, id: i64 },

    /// Show an invoice with its line items
    Lines { invoice: InvoiceKind, id: i64 },

    /// Sales reports
    #[command(subcommand)]
    Report(ReportCommand),

    /// List front-page offers
    Offers,
}

impl Command {
    /// Subcommand name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Migrate => "migrate",
            Command::Search { .. } => "search",
            Command::Get { .. } => "get",
            Command::Lines { .. } => "lines",
            Command::Report(ReportCommand::Items { .. }) => "report items",
            Command::Report(ReportCommand::Stores { .. }) => "report stores",
            Command::Offers => "offers",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ReportCommand {
    /// Best-selling items by revenue
    Items {
        /// Restrict to one calendar month (UTC)
        #[arg(long, value_name = "YYYY-MM")]
        month: Option<String>,

        #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
        limit: i64,
    },

    /// Sales totals per store
    Stores {
        #[arg(long, value_name = "YYYY-MM")]
        month: Option<String>,
    },
}

/// Searchable entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Entity {
    Inventory,
    Members,
    Employees,
    Trades,
    Repairs,
    Reservations,
    Sales,
}

impl Entity {
    /// Singular display name used in NOT_FOUND messages.
    pub fn label(self) -> &'static str {
        match self {
            Entity::Inventory => "Item",
            Entity::Members => "Member",
            Entity::Employees => "Employee",
            Entity::Trades => "Trade",
            Entity::Repairs => "Repair",
            Entity::Reservations => "Reservation",
            Entity::Sales => "Sale",
        }
    }
}

/// Entities made of a header and line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InvoiceKind {
    Sales,
    Trades,
    Repairs,
    Reservations,
}

impl From<InvoiceKind> for Entity {
    fn from(kind: InvoiceKind) -> Self {
        match kind {
            InvoiceKind::Sales => Entity::Sales,
            InvoiceKind::Trades => Entity::Trades,
            InvoiceKind::Repairs => Entity::Repairs,
            InvoiceKind::Reservations => Entity::Reservations,
        }
    }
}
