//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  ValidationError (core)        PostgreSQL error (sqlx::Error)          │
//! │       │                              │                                  │
//! │       │                              ▼  classify by SQLSTATE            │
//! │       └──────────► DbError (this module) ◄───┘                          │
//! │                          │                                              │
//! │                          ▼                                              │
//! │  AppError (back-office CLI) ← Serialized for the operator              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use pressstart_core::ValidationError;
use sqlx::error::ErrorKind;
use sqlx::postgres::PgDatabaseError;
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `update` of an id that doesn't exist
    /// - `mark_signed` / `set_status` on a missing invoice
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation (SQLSTATE 23505).
    ///
    /// ## When This Occurs
    /// - Signing up a member with an email already in use
    /// - Hiring an employee with a duplicate email
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation (SQLSTATE 23503).
    ///
    /// ## When This Occurs
    /// - Sale line referencing a non-existent item
    /// - Item referencing a non-existent store
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Begin, commit or rollback failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use past `acquire_timeout`).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Input rejected before any SQL was sent.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// Password hashing failed.
    #[error("Credential error: {0}")]
    Credential(String),

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → classify by ErrorKind (SQLSTATE)
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// sqlx::Error::Io / Tls       → DbError::ConnectionFailed
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let detail = db_err
                    .try_downcast_ref::<PgDatabaseError>()
                    .and_then(|pg| pg.detail())
                    .map(str::to_string);

                match db_err.kind() {
                    ErrorKind::UniqueViolation => {
                        let (field, value) = detail
                            .as_deref()
                            .and_then(parse_key_detail)
                            .unwrap_or_else(|| {
                                (
                                    db_err.constraint().unwrap_or("unknown").to_string(),
                                    "unknown".to_string(),
                                )
                            });
                        DbError::UniqueViolation { field, value }
                    }
                    ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation {
                        message: detail.unwrap_or_else(|| db_err.message().to_string()),
                    },
                    _ => DbError::QueryFailed(db_err.message().to_string()),
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            sqlx::Error::Io(_) | sqlx::Error::Tls(_) => DbError::ConnectionFailed(err.to_string()),

            sqlx::Error::ColumnDecode { .. } | sqlx::Error::ColumnNotFound(_) => {
                DbError::QueryFailed(err.to_string())
            }

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Pulls `(column, value)` out of a PostgreSQL key detail such as
/// `Key (member_email)=(a@b.ca) already exists.`
fn parse_key_detail(detail: &str) -> Option<(String, String)> {
    let rest = detail.strip_prefix("Key (")?;
    let (field, rest) = rest.split_once(")=(")?;
    let end = rest.rfind(')')?;
    Some((field.to_string(), rest[..end].to_string()))
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_detail() {
        assert_eq!(
            parse_key_detail("Key (member_email)=(link@example.com) already exists."),
            Some(("member_email".into(), "link@example.com".into()))
        );
        assert_eq!(
            parse_key_detail("Key (lower(member_email::text))=(a@b.ca) already exists."),
            Some(("lower(member_email::text)".into(), "a@b.ca".into()))
        );
        assert_eq!(parse_key_detail("something else"), None);
    }

    #[test]
    fn test_sqlx_classification() {
        assert!(DbError::from(sqlx::Error::RowNotFound).is_not_found());
        assert!(matches!(DbError::from(sqlx::Error::PoolTimedOut), DbError::PoolExhausted));
        assert!(matches!(
            DbError::from(sqlx::Error::PoolClosed),
            DbError::ConnectionFailed(_)
        ));
    }

    #[test]
    fn test_validation_is_transparent() {
        let err: DbError = ValidationError::NoSearchCriteria {
            allowed: vec!["id".into(), "email".into()],
        }
        .into();
        assert_eq!(err.to_string(), "must specify at least one of: id, email");
    }
}
