//! Error types for the store and user actions

use rust_decimal::Decimal;
use thiserror::Error;

/// Wiring failures of the session-scoped store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store was accessed before `Session::begin` or after `Session::end`
    #[error("store not initialized")]
    NotInitialized,
}

/// Rejected user input. The store is left untouched when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid {field}: '{value}' is not a number")]
    InvalidAmount { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),

    #[error("{0} must not be negative")]
    Negative(&'static str),

    #[error("{field} must not exceed {max}")]
    TooLarge { field: &'static str, max: Decimal },

    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("unknown {field} '{value}'")]
    UnknownOption { field: &'static str, value: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}
