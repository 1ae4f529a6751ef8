//! SQLite repository adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use std::str::FromStr;

use paygate_types::{
    NewPayment, OrderId, Payment, PaymentId, PaymentRepository, RepoError, SortDirection,
    SortField,
};

use crate::types::{DbPayment, map_db_err, order_clause};

const PAYMENT_COLUMNS: &str = "id, purpose, amount, notification, created_at, status, order_id";

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
///
/// Timestamps are stored as RFC 3339 strings in UTC; with a fixed offset the
/// lexicographic order of the column matches chronological order, which the
/// exclusive range comparisons rely on.
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            // Remove query parameters
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        // Run migration from migration file
        let ddl = include_str!("../migrations/0001_create_payment.sql");
        sqlx::query(ddl).execute(&pool).await?;

        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl PaymentRepository for SqliteRepo {
    async fn insert(&self, new: NewPayment) -> Result<Payment, RepoError> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"INSERT INTO payment (purpose, amount, notification, created_at, status, order_id)
               VALUES (?, ?, ?, ?, NULL, ?)"#,
        )
        .bind(&new.purpose)
        .bind(new.amount.minor_units())
        .bind(&new.notification)
        .bind(now.to_rfc3339())
        .bind(new.order_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(Payment::from_parts(
            PaymentId::from_i64(result.last_insert_rowid()),
            new.purpose,
            new.amount,
            new.notification,
            now,
            None,
            new.order_id,
        ))
    }

    async fn update(&self, payment: &Payment) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"UPDATE payment SET purpose = ?, amount = ?, notification = ?, status = ? WHERE id = ?"#,
        )
        .bind(&payment.purpose)
        .bind(payment.amount.minor_units())
        .bind(&payment.notification)
        .bind(payment.status.map(|s| s.as_str()))
        .bind(payment.id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepoError> {
        let sql = format!("SELECT {PAYMENT_COLUMNS} FROM payment WHERE id = ?");
        let row: Option<DbPayment> = sqlx::query_as(&sql)
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;

        row.map(DbPayment::into_domain).transpose()
    }

    async fn find_by_order_id(&self, order_id: &OrderId) -> Result<Option<Payment>, RepoError> {
        let sql = format!("SELECT {PAYMENT_COLUMNS} FROM payment WHERE order_id = ?");
        let row: Option<DbPayment> = sqlx::query_as(&sql)
            .bind(order_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;

        row.map(DbPayment::into_domain).transpose()
    }

    async fn find_by_created_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        order: &[(SortField, SortDirection)],
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Payment>, RepoError> {
        let mut sql = format!(
            "SELECT {PAYMENT_COLUMNS} FROM payment WHERE created_at > ? AND created_at < ?"
        );
        sql.push_str(&order_clause(order));
        match (limit, offset) {
            (Some(_), Some(_)) => sql.push_str(" LIMIT ? OFFSET ?"),
            (Some(_), None) => sql.push_str(" LIMIT ?"),
            // SQLite requires a LIMIT clause before OFFSET; -1 means unbounded.
            (None, Some(_)) => sql.push_str(" LIMIT -1 OFFSET ?"),
            (None, None) => {}
        }

        let mut query = sqlx::query_as::<_, DbPayment>(&sql)
            .bind(start.to_rfc3339())
            .bind(end.to_rfc3339());
        if let Some(limit) = limit {
            query = query.bind(limit);
        }
        if let Some(offset) = offset {
            query = query.bind(offset);
        }

        let rows = query.fetch_all(&self.pool).await.map_err(map_db_err)?;
        rows.into_iter().map(DbPayment::into_domain).collect()
    }

    async fn count_by_created_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, RepoError> {
        sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(id) FROM payment WHERE created_at > ? AND created_at < ?"#,
        )
        .bind(start.to_rfc3339())
        .bind(end.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err)
    }

    async fn list(
        &self,
        order: &[(SortField, SortDirection)],
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Payment>, RepoError> {
        let mut sql = format!("SELECT {PAYMENT_COLUMNS} FROM payment");
        sql.push_str(&order_clause(order));
        match (limit, offset) {
            (Some(_), Some(_)) => sql.push_str(" LIMIT ? OFFSET ?"),
            (Some(_), None) => sql.push_str(" LIMIT ?"),
            (None, Some(_)) => sql.push_str(" LIMIT -1 OFFSET ?"),
            (None, None) => {}
        }

        let mut query = sqlx::query_as::<_, DbPayment>(&sql);
        if let Some(limit) = limit {
            query = query.bind(limit);
        }
        if let Some(offset) = offset {
            query = query.bind(offset);
        }

        let rows = query.fetch_all(&self.pool).await.map_err(map_db_err)?;
        rows.into_iter().map(DbPayment::into_domain).collect()
    }

    async fn count(&self) -> Result<i64, RepoError> {
        sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(id) FROM payment"#)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_err)
    }
}
