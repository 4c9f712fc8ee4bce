//! # Command Handlers
//!
//! Each handler borrows the [`Database`], calls one repository operation and
//! returns the result as a JSON value for `lib.rs` to print.
//!
//! ## Search Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  backoffice search members '{"firstName": "al"}'                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  parse_criteria  ── not JSON / not an object ──► VALIDATION_ERROR       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.members().search(&criteria)                                         │
//! │       │         └── no recognized key ──► VALIDATION_ERROR              │
//! │       ▼                                                                 │
//! │  [ {member}, ... ]  (password hashes never serialized)                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use pressstart_core::{DateRange, Invoice, SearchCriteria};
use pressstart_db::Database;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::cli::{Command, Entity, InvoiceKind, ReportCommand};
use crate::error::AppError;

/// Runs `command` against `db`.
pub async fn execute(db: &Database, command: Command) -> Result<Value, AppError> {
    match command {
        Command::Migrate => migrate(db).await,
        Command::Search { entity, criteria } => {
            let criteria = parse_criteria(&criteria)?;
            search(db, entity, &criteria).await
        }
        Command::Get { entity, id } => get(db, entity, id).await,
        Command::Lines { invoice, id } => lines(db, invoice, id).await,
        Command::Report(ReportCommand::Items { month, limit }) => {
            let range = parse_month(month.as_deref())?;
            to_json(db.reports().items_report(range, limit).await?)
        }
        Command::Report(ReportCommand::Stores { month }) => {
            let range = parse_month(month.as_deref())?;
            to_json(db.reports().store_sales(range).await?)
        }
        Command::Offers => to_json(db.news().front_page().await?),
    }
}

async fn migrate(db: &Database) -> Result<Value, AppError> {
    db.run_migrations().await?;
    let (total, applied) = db.migration_status().await?;

    info!(total, applied, "Migrations up to date");
    Ok(json!({ "total": total, "applied": applied }))
}

async fn search(db: &Database, entity: Entity, criteria: &SearchCriteria) -> Result<Value, AppError> {
    debug!(?entity, keys = criteria.len(), "Searching");

    match entity {
        Entity::Inventory => to_json(db.inventory().search(criteria).await?),
        Entity::Members => to_json(db.members().search(criteria).await?),
        Entity::Employees => to_json(db.employees().search(criteria).await?),
        Entity::Trades => to_json(db.trades().search(criteria).await?),
        Entity::Repairs => to_json(db.repairs().search(criteria).await?),
        Entity::Reservations => to_json(db.reservations().search(criteria).await?),
        Entity::Sales => to_json(db.sales().search(criteria).await?),
    }
}

async fn get(db: &Database, entity: Entity, id: i64) -> Result<Value, AppError> {
    let row = match entity {
        Entity::Inventory => found(db.inventory().get_by_id(id).await?),
        Entity::Members => found(db.members().get_by_id(id).await?),
        Entity::Employees => found(db.employees().get_by_id(id).await?),
        Entity::Trades => found(db.trades().get_by_id(id).await?),
        Entity::Repairs => found(db.repairs().get_by_id(id).await?),
        Entity::Reservations => found(db.reservations().get_by_id(id).await?),
        Entity::Sales => found(db.sales().get_by_id(id).await?),
    }?;

    row.ok_or_else(|| AppError::not_found(entity.label(), id))
}

/// The invoice header with its lines; `NOT_FOUND` if the header is missing.
async fn lines(db: &Database, kind: InvoiceKind, id: i64) -> Result<Value, AppError> {
    let invoice = match kind {
        InvoiceKind::Sales => {
            let sales = db.sales();
            match sales.get_by_id(id).await? {
                Some(invoice) => Some(to_json(Invoice {
                    invoice,
                    items: sales.line_items(id).await?,
                })?),
                None => None,
            }
        }
        InvoiceKind::Trades => {
            let trades = db.trades();
            match trades.get_by_id(id).await? {
                Some(invoice) => Some(to_json(Invoice {
                    invoice,
                    items: trades.line_items(id).await?,
                })?),
                None => None,
            }
        }
        InvoiceKind::Repairs => {
            let repairs = db.repairs();
            match repairs.get_by_id(id).await? {
                Some(invoice) => Some(to_json(Invoice {
                    invoice,
                    items: repairs.line_items(id).await?,
                })?),
                None => None,
            }
        }
        InvoiceKind::Reservations => {
            let reservations = db.reservations();
            match reservations.get_by_id(id).await? {
                Some(invoice) => Some(to_json(Invoice {
                    invoice,
                    items: reservations.line_items(id).await?,
                })?),
                None => None,
            }
        }
    };

    invoice.ok_or_else(|| AppError::not_found(Entity::from(kind).label(), id))
}

// =============================================================================
// Input Parsing
// =============================================================================

/// Parses the criteria argument, which must be a JSON object.
pub fn parse_criteria(raw: &str) -> Result<SearchCriteria, AppError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| AppError::validation(format!("criteria is not valid JSON: {e}")))?;
    Ok(SearchCriteria::from_json(&value)?)
}

/// Parses an optional `--month YYYY-MM`.
pub fn parse_month(month: Option<&str>) -> Result<Option<DateRange>, AppError> {
    Ok(month.map(DateRange::parse_month).transpose()?)
}

fn to_json<T: Serialize>(value: T) -> Result<Value, AppError> {
    Ok(serde_json::to_value(value)?)
}

fn found<T: Serialize>(row: Option<T>) -> Result<Option<Value>, AppError> {
    row.map(to_json).transpose()
}
