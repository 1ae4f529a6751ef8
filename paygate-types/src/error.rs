//! Error types for the payment gateway.

use std::collections::BTreeMap;

/// Per-field validation messages, keyed by the API field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Domain-level errors (business rule violations).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Amount cannot be negative")]
    NegativeAmount,

    #[error("Amount has more than two decimal places")]
    AmountScale,

    #[error("Amount exceeds the maximum of 999999.99")]
    AmountRange,

    #[error("Amount is not a valid decimal: {0:?}")]
    AmountFormat(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Repository-level errors (data access failures).
///
/// Lookup misses are `Ok(None)`, not errors; `NotFound` is reserved for
/// operations that require the row to exist (e.g. `update`).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// The order id uniqueness constraint rejected an insert.
    #[error("Order id is already registered")]
    DuplicateOrderId,

    #[error("Entity not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),
}

/// Session store errors. Absence (unknown or expired token) is not an
/// error - stores report it as `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session storage error: {0}")]
    Storage(String),
}

/// Notification transport errors. Logged at the service boundary,
/// never propagated to the caller.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Notification transport error: {0}")]
    Transport(String),
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error occurred")]
    Validation(FieldErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// A validation error carrying a single message for one field.
    pub fn field_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.into(), vec![message.into()]);
        AppError::Validation(errors)
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            // Mirrors the registration form behavior: a duplicate order id is
            // reported as a validation failure attached to the orderId field.
            RepoError::DuplicateOrderId => {
                AppError::field_error("orderId", "This value is already used.")
            }
            RepoError::NotFound => AppError::NotFound("Resource not found".into()),
            RepoError::Database(e) => AppError::Internal(e),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Storage(e) => AppError::Internal(e),
        }
    }
}
