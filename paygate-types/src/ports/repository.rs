//! Payment repository port trait.
//!
//! This is the primary port in our hexagonal architecture.
//! Adapters (Postgres, SQLite) will implement this trait.

use chrono::{DateTime, Utc};

use crate::domain::{NewPayment, OrderId, Payment, PaymentId};
use crate::error::RepoError;
use crate::query::{SortDirection, SortField};

/// Durable storage and range/point queries over payment records.
///
/// Order-id uniqueness MUST be enforced by the storage layer's own
/// constraint, not an application-level check-then-insert; two concurrent
/// registrations with the same order id must leave exactly one row behind.
#[async_trait::async_trait]
pub trait PaymentRepository: Send + Sync + 'static {
    // ─────────────────────────────────────────────────────────────────────────────
    // Point operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Inserts a new payment, assigning its id and creation timestamp.
    ///
    /// Fails with [`RepoError::DuplicateOrderId`] when the order id is
    /// already registered.
    async fn insert(&self, new: NewPayment) -> Result<Payment, RepoError>;

    /// Persists mutated fields (notably status) of an existing payment.
    async fn update(&self, payment: &Payment) -> Result<(), RepoError>;

    /// Gets a payment by its id.
    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepoError>;

    /// Gets a payment by its external order id.
    async fn find_by_order_id(&self, order_id: &OrderId) -> Result<Option<Payment>, RepoError>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Range and listing queries
    // ─────────────────────────────────────────────────────────────────────────────

    /// Payments created strictly inside the given period.
    ///
    /// Both bounds are exclusive: a payment created exactly at `start` or
    /// exactly at `end` is not part of the result. `order` is applied as a
    /// multi-key sort in the given order; an empty slice leaves the order
    /// store-defined. `limit`/`offset` apply after ordering.
    async fn find_by_created_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        order: &[(SortField, SortDirection)],
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Payment>, RepoError>;

    /// Count with the same exclusive-bound semantics as
    /// [`find_by_created_range`](Self::find_by_created_range); agrees in
    /// cardinality with the unbounded find at a consistent read.
    async fn count_by_created_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, RepoError>;

    /// Full listing with ordering and pagination.
    async fn list(
        &self,
        order: &[(SortField, SortDirection)],
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Payment>, RepoError>;

    /// Total number of registered payments.
    async fn count(&self) -> Result<i64, RepoError>;
}
