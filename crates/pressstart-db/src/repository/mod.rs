//! # Repository Module
//!
//! Database repository implementations for the back office.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Caller                                                                 │
//! │       │  db.inventory().search(&criteria)                               │
//! │       ▼                                                                 │
//! │  InventoryRepository                                                    │
//! │  ├── search(&criteria)   → planned by pressstart-core, executed here   │
//! │  ├── get_by_id(id)       → Option<Item>                                 │
//! │  ├── all()               → Vec<Item>                                    │
//! │  ├── create(&NewItem)    → Item (validated, RETURNING)                  │
//! │  └── update(&Item)       → Item or NotFound                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PostgreSQL (parameterized statements only)                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`InventoryRepository`] - Items, pagination, item types
//! - [`StoreRepository`] - Store locations
//! - [`MemberRepository`] / [`EmployeeRepository`] - People and logins
//! - [`NewsRepository`] - Offers and news articles
//! - [`SaleRepository`], [`TradeRepository`], [`RepairRepository`],
//!   [`ReservationRepository`] - Invoice families
//! - [`ReportRepository`] - Aggregated sales reports

pub mod employee;
pub mod inventory;
pub mod member;
pub mod news;
pub mod repair;
pub mod report;
pub mod reservation;
pub mod sale;
pub mod store;
pub mod trade;

pub use employee::EmployeeRepository;
pub use inventory::InventoryRepository;
pub use member::MemberRepository;
pub use news::NewsRepository;
pub use repair::RepairRepository;
pub use report::ReportRepository;
pub use reservation::ReservationRepository;
pub use sale::SaleRepository;
pub use store::StoreRepository;
pub use trade::TradeRepository;

use pressstart_core::search::{EntitySearch, SearchCriteria, SearchValue};
use pressstart_core::validation::Validate;
use pressstart_core::MAX_PAGE_LIMIT;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};

// =============================================================================
// Shared Helpers
// =============================================================================

/// Plans and executes a search against `search`.
pub(crate) async fn fetch_search<T>(
    pool: &PgPool,
    search: &EntitySearch,
    criteria: &SearchCriteria,
) -> DbResult<Vec<T>>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let plan = search.plan(criteria)?;
    let sql = plan.to_sql();

    debug!(
        entity = search.entity,
        predicates = plan.len(),
        by_id = plan.is_primary_key_lookup(),
        "Executing search"
    );

    let mut query = sqlx::query_as::<_, T>(&sql);
    for value in plan.params() {
        query = match value {
            SearchValue::Int(n) => query.bind(n),
            SearchValue::Text(s) => query.bind(s),
            SearchValue::Bool(b) => query.bind(b),
            SearchValue::Unsupported(v) => {
                return Err(DbError::Internal(format!("unbindable search value {v}")))
            }
        };
    }

    Ok(query.fetch_all(pool).await?)
}

/// `SELECT` every row of `search`'s table, ordered by id.
pub(crate) async fn fetch_all<T>(pool: &PgPool, search: &EntitySearch) -> DbResult<Vec<T>>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    Ok(sqlx::query_as::<_, T>(&search.select_all())
        .fetch_all(pool)
        .await?)
}

/// `SELECT` one row of `search`'s table by id.
pub(crate) async fn fetch_by_id<T>(pool: &PgPool, search: &EntitySearch, id: i64) -> DbResult<Option<T>>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    Ok(sqlx::query_as::<_, T>(&search.select_by_id())
        .bind(id)
        .fetch_optional(pool)
        .await?)
}

/// Validates a write input, logging the rejection.
pub(crate) fn validated<V: Validate + ?Sized>(entity: &'static str, input: &V) -> DbResult<()> {
    input.validate().map_err(|err| {
        warn!(entity, error = %err, "Rejected write");
        DbError::Invalid(err)
    })
}

/// Maps a failed write to `DbError`, logging it.
pub(crate) fn write_failed(entity: &'static str, action: &'static str) -> impl FnOnce(sqlx::Error) -> DbError {
    move |e| {
        let err = DbError::from(e);
        warn!(entity, action, error = %err, "Write failed");
        err
    }
}

/// Page sizes are kept within `1..=MAX_PAGE_LIMIT`.
pub(crate) fn clamp_limit(limit: i64) -> i64 {
    limit.clamp(1, MAX_PAGE_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(0), 1);
        assert_eq!(clamp_limit(-5), 1);
        assert_eq!(clamp_limit(25), 25);
        assert_eq!(clamp_limit(10_000), MAX_PAGE_LIMIT);
    }

    #[test]
    fn test_write_failed_classifies() {
        let err = write_failed("item", "insert")(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, DbError::PoolExhausted));
    }
}
