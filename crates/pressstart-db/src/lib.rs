//! # pressstart-db: Database Layer for the Press Start Back Office
//!
//! This crate provides PostgreSQL access for the back office: the connection
//! pool, migrations, one repository per entity family, invoice transactions
//! and reports.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Press Start Data Flow                            │
//! │                                                                         │
//! │  backoffice search inventory '{"storeId": 2, "name": "Zelda"}'         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  pressstart-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ inventory.rs  │    │  (embedded)  │  │   │
//! │  │   │               │    │ member.rs     │    │              │  │   │
//! │  │   │ PgPool        │◄───│ sale.rs ...   │    │ 0001_initial │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │                               │   │
//! │  │                        ┌───────▼───────┐                       │   │
//! │  │                        │ transaction.rs│  parent + lines, atomic│   │
//! │  │                        └───────────────┘                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PostgreSQL                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//! - [`credentials`] - Password hashing
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pressstart_core::SearchCriteria;
//! use pressstart_db::{Database, DbConfig};
//!
//! let db = Database::connect(DbConfig::from_env()?).await?;
//!
//! let criteria = SearchCriteria::new().with("firstName", "al");
//! let members = db.members().search(&criteria).await?;
//!
//! db.close().await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod credentials;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
mod transaction;

#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::{
    EmployeeRepository, InventoryRepository, MemberRepository, NewsRepository, RepairRepository,
    ReportRepository, ReservationRepository, SaleRepository, StoreRepository, TradeRepository,
};
