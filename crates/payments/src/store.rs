//! Durable payment record store
//!
//! One SQLite table of processed payments. The UNIQUE constraint on
//! `reference` is the authoritative dedup mechanism; callers treat a
//! constraint hit on insert as a duplicate, not a failure.

use serde::Serialize;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::error::PaymentResult;

/// One processed payment, as listed by the API.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PaymentRecord {
    pub id: i64,
    pub reference: String,
    pub status: String,
    pub amount: i64,
    pub email: String,
    pub full_name: Option<String>,
    pub paid_at: String,
    pub chat_id: Option<String>,
    pub invite_link: Option<String>,
}

/// Column values for a payment about to be persisted.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub reference: String,
    pub status: String,
    pub amount: i64,
    pub email: String,
    pub full_name: Option<String>,
    pub paid_at: String,
    pub chat_id: Option<String>,
    pub invite_link: Option<String>,
}

/// Store over the shared connection pool.
#[derive(Clone)]
pub struct PaymentStore {
    pool: SqlitePool,
}

impl PaymentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the payments table if it does not exist yet.
    pub async fn ensure_schema(&self) -> PaymentResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS payments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                reference TEXT UNIQUE,
                status TEXT,
                amount INTEGER,
                email TEXT,
                full_name TEXT,
                paid_at TEXT,
                chat_id TEXT,
                invite_link TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Whether a payment with this reference was already processed.
    pub async fn exists(&self, reference: &str) -> PaymentResult<bool> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT 1 FROM payments WHERE reference = ?")
                .bind(reference)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.is_some())
    }

    /// Insert one payment record.
    ///
    /// Returns `false` when the reference was already present (a concurrent
    /// delivery won the race); the caller decides how loudly to log that.
    pub async fn insert(&self, payment: &NewPayment) -> PaymentResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO payments
                (reference, status, amount, email, full_name, paid_at, chat_id, invite_link)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&payment.reference)
        .bind(&payment.status)
        .bind(payment.amount)
        .bind(&payment.email)
        .bind(&payment.full_name)
        .bind(&payment.paid_at)
        .bind(&payment.chat_id)
        .bind(&payment.invite_link)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(true),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                tracing::warn!(
                    reference = %payment.reference,
                    "Payment with this reference already saved"
                );
                Ok(false)
            }
            Err(error) => Err(error.into()),
        }
    }

    /// List payments newest-first by insertion id.
    ///
    /// Without a limit all rows are returned and the offset is ignored.
    pub async fn list(
        &self,
        limit: Option<i64>,
        offset: i64,
    ) -> PaymentResult<Vec<PaymentRecord>> {
        const BASE_QUERY: &str = r#"
            SELECT id, reference, status, amount, email, full_name, paid_at, chat_id, invite_link
            FROM payments
            ORDER BY id DESC
        "#;

        let records = match limit {
            Some(limit) => {
                sqlx::query_as(&format!("{BASE_QUERY} LIMIT ? OFFSET ?"))
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => sqlx::query_as(BASE_QUERY).fetch_all(&self.pool).await?,
        };
        Ok(records)
    }
}

/// Open the payments database.
pub async fn create_pool(database_url: &str) -> PaymentResult<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;
    Ok(pool)
}
