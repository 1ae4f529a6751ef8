//! # Paygate Types
//!
//! Domain types and port traits for the payment gateway.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (Payment, Amount, SessionId)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `query/` - Sort criteria shared by the repository port and its callers
//! - `error/` - Domain and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;
pub mod query;

// Re-export commonly used types
pub use domain::{Amount, NewPayment, OrderId, Payment, PaymentId, PaymentStatus, SessionId};
pub use dto::*;
pub use error::{AppError, DomainError, FieldErrors, NotifyError, RepoError, SessionError};
pub use ports::{Notifier, PaymentRepository, SessionStore};
pub use query::{SortDirection, SortField};
