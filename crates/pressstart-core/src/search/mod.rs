//! # Dynamic Search
//!
//! Builds parameterized `SELECT` statements from partial filter objects.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  {"name": "Zelda", "storeId": 2}          SearchCriteria                │
//! │              │                                                          │
//! │              ▼                                                          │
//! │  EntitySearch::plan()                                                   │
//! │  ├── id present?  ──yes──► primary-key lookup, everything else ignored │
//! │  ├── walk `fields` in DECLARED order, keep present non-null keys       │
//! │  ├── coerce each value to the column's kind                            │
//! │  └── nothing kept? ──────► ValidationError::NoSearchCriteria           │
//! │              │                                                          │
//! │              ▼                                                          │
//! │  QueryPlan                                                              │
//! │    where_clause() = "store_id = $1 AND item_name ILIKE $2 || '%'"      │
//! │    params()       = [2, "Zelda"]                                        │
//! │              │                                                          │
//! │              ▼                                                          │
//! │  pressstart-db binds params in order and executes                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! User input only ever reaches the database as a bound parameter. Column
//! and table names come from the static tables in [`entities`].

mod binding;
mod criteria;
pub mod entities;
mod plan;

pub use binding::{FieldBinding, MatchMode, ValueKind};
pub use criteria::{SearchCriteria, SearchValue};
pub use plan::{EntitySearch, Predicate, QueryPlan};
