//! # Back-Office Error Type
//!
//! Every failure a command can hit ends up as an [`AppError`], printed to
//! stderr as JSON:
//!
//! ```json
//! { "code": "VALIDATION_ERROR", "message": "must specify at least one of: id, storeId, name, itemType" }
//! ```
//!
//! ## Error Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ValidationError / DbError::Invalid     ──► VALIDATION_ERROR            │
//! │  DbError::UniqueViolation / FK          ──► VALIDATION_ERROR            │
//! │  DbError::NotFound                      ──► NOT_FOUND                   │
//! │  DbError (connection, query, tx, ...)   ──► DATABASE_ERROR (logged)     │
//! │  ConfigError                            ──► CONFIG_ERROR                │
//! │  anything else                          ──► INTERNAL                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Database detail is logged with `tracing::error!` and replaced by a generic
//! message in the output.

use std::fmt;

use pressstart_core::{CoreError, ValidationError};
use pressstart_db::DbError;
use serde::Serialize;

use crate::config::ConfigError;

/// Error presented to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input or search criteria rejected
    ValidationError,

    /// No row with the requested id
    NotFound,

    /// Database operation failed
    DatabaseError,

    /// Configuration could not be loaded or is invalid
    ConfigError,

    Internal,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        AppError::new(ErrorCode::NotFound, format!("{resource} not found: {id}"))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }

    /// Single-line JSON for stderr.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":"INTERNAL","message":{:?}}}"#, self.message)
        })
    }
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Invalid(e) => e.into(),
            DbError::NotFound { entity, id } => AppError::not_found(&entity, id),
            DbError::UniqueViolation { field, value } => {
                AppError::validation(format!("{field} '{value}' already exists"))
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                AppError::validation("Invalid reference")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Migration failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) | DbError::Internal(e) => {
                tracing::error!("Database query failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                AppError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Credential(e) => {
                tracing::error!("Credential error: {}", e);
                AppError::internal("Credential processing failed")
            }
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => e.into(),
            other => AppError::validation(other.to_string()),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::internal(format!("JSON error: {err}"))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let err = AppError::not_found("Item", 42);
        assert_eq!(err.to_json(), r#"{"code":"NOT_FOUND","message":"Item not found: 42"}"#);
    }

    #[test]
    fn test_empty_criteria_is_validation_error() {
        let err: AppError = DbError::Invalid(ValidationError::NoSearchCriteria {
            allowed: vec!["id".into(), "email".into()],
        })
        .into();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "must specify at least one of: id, email");
    }

    #[test]
    fn test_db_errors() {
        let dup: AppError = DbError::duplicate("member_email", "a@b.ca").into();
        assert_eq!(dup.code, ErrorCode::ValidationError);
        assert_eq!(dup.message, "member_email 'a@b.ca' already exists");

        let missing: AppError = DbError::not_found("Trade", 9).into();
        assert_eq!(missing.code, ErrorCode::NotFound);

        let query: AppError = DbError::QueryFailed("relation tbl_x does not exist".into()).into();
        assert_eq!(query.code, ErrorCode::DatabaseError);
        assert!(!query.message.contains("tbl_x"));
    }

    #[test]
    fn test_config_error() {
        let err: AppError = ConfigError::InvalidDatabaseUrl.into();
        assert_eq!(err.code, ErrorCode::ConfigError);
        assert!(err.to_json().contains(r#""code":"CONFIG_ERROR""#));
    }

    #[test]
    fn test_core_error() {
        let err: AppError = CoreError::UnknownPayoutType("barter".into()).into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("barter"));
    }
}
