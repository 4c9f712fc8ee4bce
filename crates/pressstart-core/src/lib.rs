//! # pressstart-core: Pure Domain Logic for the Press Start Back Office
//!
//! This crate holds everything about the back office that can be expressed
//! without touching a database: entity types, money, validation rules and
//! the planning half of the dynamic search.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Press Start Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Back-office CLI (apps/backoffice)               │   │
//! │  │        search, get, lines, report, offers, migrate              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ pressstart-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  search   │  │ validation│  │   │
//! │  │   │  Item     │  │   Money   │  │ Criteria  │  │   rules   │  │   │
//! │  │   │  Member   │  │           │  │ QueryPlan │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  pressstart-db (Database Layer)                 │   │
//! │  │          PostgreSQL pool, repositories, transactions            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entity rows and their create inputs
//! - [`money`] - Integer-cent money type
//! - [`search`] - Search criteria, field bindings, query plans
//! - [`report`] - Report rows and date ranges
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation for create/update inputs
//!
//! ## Example Usage
//!
//! ```rust
//! use pressstart_core::search::{entities, SearchCriteria};
//!
//! let criteria = SearchCriteria::new()
//!     .with("name", "Zelda")
//!     .with("storeId", 2);
//!
//! let plan = entities::INVENTORY.plan(&criteria).unwrap();
//! assert_eq!(plan.where_clause(), "store_id = $1 AND item_name ILIKE $2 || '%'");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod report;
pub mod search;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use report::{DateRange, ItemsReportRow, StoreSalesRow};
pub use search::{EntitySearch, FieldBinding, MatchMode, QueryPlan, SearchCriteria, SearchValue};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default page size for paginated inventory listings.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Largest page a caller may request.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Largest quantity accepted on a single sale line.
///
/// Mirrors the `smallint` stock column the chain's stores were sized for.
pub const MAX_LINE_QUANTITY: i64 = 999;
