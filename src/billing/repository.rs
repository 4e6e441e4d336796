use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::models::{BatchStatus, PaymentBatch, PaymentHistoryEntry};
use crate::error::AppResult;

const BATCH_COLUMNS: &str = "id, client_id, batch_name, total_amount, status, created_at";

pub struct BillingRepository {
    pool: PgPool,
}

impl BillingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_batch(
        &self,
        client_id: Uuid,
        batch_name: &str,
        total_amount: Decimal,
    ) -> AppResult<PaymentBatch> {
        let batch = sqlx::query_as::<_, PaymentBatch>(&format!(
            r#"
            INSERT INTO payment_batches (client_id, batch_name, total_amount, status)
            VALUES ($1, $2, $3, 'pending_payment')
            RETURNING {BATCH_COLUMNS}
            "#
        ))
        .bind(client_id)
        .bind(batch_name)
        .bind(total_amount)
        .fetch_one(&self.pool)
        .await?;

        Ok(batch)
    }

    pub async fn get_batch(&self, batch_id: Uuid) -> AppResult<Option<PaymentBatch>> {
        let batch = sqlx::query_as::<_, PaymentBatch>(&format!(
            "SELECT {BATCH_COLUMNS} FROM payment_batches WHERE id = $1"
        ))
        .bind(batch_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(batch)
    }

    pub async fn list_pending(&self) -> AppResult<Vec<PaymentBatch>> {
        let batches = sqlx::query_as::<_, PaymentBatch>(&format!(
            r#"
            SELECT {BATCH_COLUMNS} FROM payment_batches
            WHERE status = 'pending_payment'
            ORDER BY created_at DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(batches)
    }

    pub async fn list_by_client(&self, client_id: Uuid) -> AppResult<Vec<PaymentBatch>> {
        let batches = sqlx::query_as::<_, PaymentBatch>(&format!(
            r#"
            SELECT {BATCH_COLUMNS} FROM payment_batches
            WHERE client_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(batches)
    }

    /// Flip a pending batch to paid. The status guard makes the transition
    /// a compare-and-set: a batch settled by a concurrent request affects
    /// zero rows, which the caller surfaces instead of double-settling.
    pub async fn mark_paid(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        batch_id: Uuid,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE payment_batches SET status = $2 WHERE id = $1 AND status = $3",
        )
        .bind(batch_id)
        .bind(BatchStatus::Paid)
        .bind(BatchStatus::PendingPayment)
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected())
    }

    /// Remove a batch that is still pending. Same compare-and-set shape as
    /// `mark_paid`: a paid batch is never deleted.
    pub async fn delete_pending(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        batch_id: Uuid,
    ) -> AppResult<u64> {
        let result =
            sqlx::query("DELETE FROM payment_batches WHERE id = $1 AND status = $2")
                .bind(batch_id)
                .bind(BatchStatus::PendingPayment)
                .execute(&mut **tx)
                .await?;

        Ok(result.rows_affected())
    }

    pub async fn insert_history(
        &self,
        client_id: Uuid,
        batch_id: Uuid,
        total_amount: Decimal,
    ) -> AppResult<PaymentHistoryEntry> {
        let entry = sqlx::query_as::<_, PaymentHistoryEntry>(
            r#"
            INSERT INTO payment_history (client_id, batch_id, total_amount)
            VALUES ($1, $2, $3)
            RETURNING id, client_id, batch_id, total_amount, paid_at
            "#,
        )
        .bind(client_id)
        .bind(batch_id)
        .bind(total_amount)
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    pub async fn list_history(&self, client_id: Uuid) -> AppResult<Vec<PaymentHistoryEntry>> {
        let entries = sqlx::query_as::<_, PaymentHistoryEntry>(
            r#"
            SELECT id, client_id, batch_id, total_amount, paid_at
            FROM payment_history
            WHERE client_id = $1
            ORDER BY paid_at DESC
            "#,
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn begin_tx(&self) -> AppResult<Transaction<'_, Postgres>> {
        Ok(self.pool.begin().await?)
    }
}
