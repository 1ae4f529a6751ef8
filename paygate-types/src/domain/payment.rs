//! Payment domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::amount::Amount;

/// Unique identifier for a Payment, assigned by the storage layer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct PaymentId(i64);

impl PaymentId {
    /// Creates a PaymentId from a raw database id.
    pub fn from_i64(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw id value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for PaymentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PaymentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// The caller-supplied external order identifier.
///
/// Globally unique across all payments (enforced by the storage layer) and
/// immutable once registered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Terminal payment status. A pending payment has no status at all
/// (`Option<PaymentStatus>` is `None`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PaymentStatus {
    Success,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Success => "Success",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unrecognized status strings coming back from storage.
#[derive(Debug, thiserror::Error)]
#[error("Unknown payment status: {0}")]
pub struct UnknownStatus(pub String);

impl std::str::FromStr for PaymentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Success" => Ok(PaymentStatus::Success),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A validated payment ready for insertion. The id and creation timestamp
/// are assigned by the repository.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub purpose: String,
    pub amount: Amount,
    pub notification: Option<String>,
    pub order_id: OrderId,
}

/// A registered payment.
///
/// `id`, `order_id` and `created_at` are immutable once assigned; `status`
/// transitions exactly once, from `None` (pending) to `Some(Success)`,
/// and never back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Storage-assigned identifier
    pub id: PaymentId,
    /// Free-text purpose of the payment
    pub purpose: String,
    /// Amount with fixed two-decimal scale
    pub amount: Amount,
    /// Optional merchant callback URL notified on completion
    pub notification: Option<String>,
    /// When the payment was registered
    pub created_at: DateTime<Utc>,
    /// `None` while the payment is pending
    pub status: Option<PaymentStatus>,
    /// External order identifier
    pub order_id: OrderId,
}

impl Payment {
    /// Reconstructs a payment from database fields.
    pub fn from_parts(
        id: PaymentId,
        purpose: String,
        amount: Amount,
        notification: Option<String>,
        created_at: DateTime<Utc>,
        status: Option<PaymentStatus>,
        order_id: OrderId,
    ) -> Self {
        Self {
            id,
            purpose,
            amount,
            notification,
            created_at,
            status,
            order_id,
        }
    }

    /// A payment is pending while its status is unset.
    pub fn is_pending(&self) -> bool {
        self.status.is_none()
    }

    /// Marks the payment completed. The transition is one-way; calling this
    /// on an already completed payment keeps the terminal status.
    pub fn complete(&mut self) {
        self.status = Some(PaymentStatus::Success);
    }
}
