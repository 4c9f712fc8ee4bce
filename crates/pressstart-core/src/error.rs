//! # Error Types
//!
//! Domain-specific error types for pressstart-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pressstart-core errors (this file)                                    │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Bad input, including empty search criteria     │
//! │                                                                         │
//! │  pressstart-db errors (separate crate)                                 │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Back-office errors (in app)                                           │
//! │  └── AppError         - What the operator sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → DbError::Invalid → AppError → stderr          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Payout type string is not one we understand.
    #[error("Unknown payout type: {0}")]
    UnknownPayoutType(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur before any SQL is sent: on create/update inputs, and when a
/// search is attempted without any usable filter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A search was attempted with no recognized, non-null filter key.
    ///
    /// ## When This Occurs
    /// - Criteria is empty
    /// - Criteria only has keys the entity doesn't know (`{"colour": "red"}`)
    /// - Every recognized key is null
    #[error("must specify at least one of: {}", .allowed.join(", "))]
    NoSearchCriteria { allowed: Vec<String> },

    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g. postal code, phone, a non-numeric id).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::InvalidFormat`].
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_search_criteria_message() {
        let err = ValidationError::NoSearchCriteria {
            allowed: vec!["id".into(), "storeId".into(), "name".into()],
        };
        assert_eq!(err.to_string(), "must specify at least one of: id, storeId, name");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "member_email".to_string(),
        };
        assert_eq!(err.to_string(), "member_email is required");

        let err = ValidationError::invalid_format("storeId", "expected an integer");
        assert_eq!(err.to_string(), "storeId has invalid format: expected an integer");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "item_name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
