//! PostgreSQL repository adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use paygate_types::{
    NewPayment, OrderId, Payment, PaymentId, PaymentRepository, RepoError, SortDirection,
    SortField,
};

use crate::types::{DbPayment, map_db_err, order_clause};

const PAYMENT_COLUMNS: &str = "id, purpose, amount, notification, created_at, status, order_id";

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL repository implementation.
pub struct PostgresRepo {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

impl PostgresRepo {
    /// Creates a new PostgreSQL repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        execute_migration(
            &pool,
            include_str!("../migrations/0001_create_payment_pg.sql"),
            "0001",
        )
        .await?;
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl PaymentRepository for PostgresRepo {
    async fn insert(&self, new: NewPayment) -> Result<Payment, RepoError> {
        let now = Utc::now();

        let id: i64 = sqlx::query_scalar(
            r#"INSERT INTO payment (purpose, amount, notification, created_at, status, order_id)
               VALUES ($1, $2, $3, $4, NULL, $5)
               RETURNING id"#,
        )
        .bind(&new.purpose)
        .bind(new.amount.minor_units())
        .bind(&new.notification)
        .bind(now)
        .bind(new.order_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(Payment::from_parts(
            PaymentId::from_i64(id),
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
            r#"UPDATE payment SET purpose = $1, amount = $2, notification = $3, status = $4 WHERE id = $5"#,
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
        let sql = format!("SELECT {PAYMENT_COLUMNS} FROM payment WHERE id = $1");
        let row: Option<DbPayment> = sqlx::query_as(&sql)
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;

        row.map(DbPayment::into_domain).transpose()
    }

    async fn find_by_order_id(&self, order_id: &OrderId) -> Result<Option<Payment>, RepoError> {
        let sql = format!("SELECT {PAYMENT_COLUMNS} FROM payment WHERE order_id = $1");
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
            "SELECT {PAYMENT_COLUMNS} FROM payment WHERE created_at > $1 AND created_at < $2"
        );
        sql.push_str(&order_clause(order));
        let mut placeholder = 2;
        if limit.is_some() {
            placeholder += 1;
            sql.push_str(&format!(" LIMIT ${placeholder}"));
        }
        if offset.is_some() {
            placeholder += 1;
            sql.push_str(&format!(" OFFSET ${placeholder}"));
        }

        let mut query = sqlx::query_as::<_, DbPayment>(&sql).bind(start).bind(end);
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
            r#"SELECT COUNT(id) FROM payment WHERE created_at > $1 AND created_at < $2"#,
        )
        .bind(start)
        .bind(end)
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
        let mut placeholder = 0;
        if limit.is_some() {
            placeholder += 1;
            sql.push_str(&format!(" LIMIT ${placeholder}"));
        }
        if offset.is_some() {
            placeholder += 1;
            sql.push_str(&format!(" OFFSET ${placeholder}"));
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
