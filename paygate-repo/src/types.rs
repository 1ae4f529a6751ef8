//! Shared database types with feature-gated fields for SQLite and PostgreSQL.

use sqlx::FromRow;

use paygate_types::{
    Amount, OrderId, Payment, PaymentId, PaymentStatus, RepoError, SortDirection, SortField,
};

#[cfg(not(feature = "sqlite"))]
use chrono::{DateTime, Utc};

// ─────────────────────────────────────────────────────────────────────────────
// Database row structs (derive FromRow for automatic mapping)
// ─────────────────────────────────────────────────────────────────────────────

/// Payment row from database.
#[derive(FromRow)]
pub struct DbPayment {
    pub id: i64,
    pub purpose: String,
    pub amount: i64,
    pub notification: Option<String>,

    #[cfg(not(feature = "sqlite"))]
    pub created_at: DateTime<Utc>,
    #[cfg(feature = "sqlite")]
    pub created_at: String,

    pub status: Option<String>,
    pub order_id: String,
}

impl DbPayment {
    /// Convert database row to domain Payment.
    pub fn into_domain(self) -> Result<Payment, RepoError> {
        let amount = Amount::from_minor_units(self.amount)
            .map_err(|e| RepoError::Database(e.to_string()))?;

        let status = self
            .status
            .map(|s| s.parse::<PaymentStatus>())
            .transpose()
            .map_err(|e| RepoError::Database(e.to_string()))?;

        #[cfg(not(feature = "sqlite"))]
        let created_at = self.created_at;

        #[cfg(feature = "sqlite")]
        let created_at = chrono::DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| RepoError::Database(e.to_string()))?
            .with_timezone(&chrono::Utc);

        Ok(Payment::from_parts(
            PaymentId::from_i64(self.id),
            self.purpose,
            amount,
            self.notification,
            created_at,
            status,
            OrderId::new(self.order_id),
        ))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Query helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Renders a multi-key ORDER BY clause. Sort fields come from a closed enum,
/// so the interpolated column names cannot carry injected SQL.
pub fn order_clause(order: &[(SortField, SortDirection)]) -> String {
    if order.is_empty() {
        return String::new();
    }
    let keys: Vec<String> = order
        .iter()
        .map(|(field, direction)| format!("{} {}", field.column(), direction.as_sql()))
        .collect();
    format!(" ORDER BY {}", keys.join(", "))
}

/// Maps driver errors, surfacing unique-constraint violations on the order id
/// as their own condition.
pub fn map_db_err(e: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(db) = &e {
        if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) {
            return RepoError::DuplicateOrderId;
        }
    }
    RepoError::Database(e.to_string())
}
