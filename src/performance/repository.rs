use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::models::SyncRecord;
use crate::error::AppResult;

const SELECT_COLUMNS: &str = r#"
    id, agent_id, full_name, calls, talk_time, wait_time, sync_date,
    created_at, batch_id, is_paid, number_of_sets, meeting_hours, break_hours
"#;

/// Store access for the dialer sync records. The sync process inserts rows
/// out-of-band; this repository only reads them and edits adjustment and
/// payment-linkage fields.
pub struct PerformanceRepository {
    pool: PgPool,
}

impl PerformanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> AppResult<Vec<SyncRecord>> {
        let records = sqlx::query_as::<_, SyncRecord>(&format!(
            "SELECT {SELECT_COLUMNS} FROM agent_performance_sync ORDER BY sync_date DESC NULLS LAST, created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn list_by_agent(&self, agent_id: &str) -> AppResult<Vec<SyncRecord>> {
        let records = sqlx::query_as::<_, SyncRecord>(&format!(
            "SELECT {SELECT_COLUMNS} FROM agent_performance_sync WHERE agent_id = $1 ORDER BY sync_date DESC NULLS LAST"
        ))
        .bind(agent_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn list_by_batch(&self, batch_id: Uuid) -> AppResult<Vec<SyncRecord>> {
        let records = sqlx::query_as::<_, SyncRecord>(&format!(
            "SELECT {SELECT_COLUMNS} FROM agent_performance_sync WHERE batch_id = $1"
        ))
        .bind(batch_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn fetch_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<SyncRecord>> {
        let records = sqlx::query_as::<_, SyncRecord>(&format!(
            "SELECT {SELECT_COLUMNS} FROM agent_performance_sync WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Edit the per-record adjustment fields (payroll ledger settings).
    pub async fn update_adjustments(
        &self,
        record_id: Uuid,
        number_of_sets: i32,
        meeting_hours: Decimal,
        break_hours: Decimal,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE agent_performance_sync
            SET number_of_sets = $2, meeting_hours = $3, break_hours = $4
            WHERE id = $1 AND is_paid = FALSE
            "#,
        )
        .bind(record_id)
        .bind(number_of_sets)
        .bind(meeting_hours)
        .bind(break_hours)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Stamp the selected records with a new batch reference. The
    /// `batch_id IS NULL` guard is the claim step: a record grabbed by a
    /// competing batch in the meantime is simply not updated, and the
    /// mismatch shows up in the returned count.
    pub async fn attach_batch(&self, ids: &[Uuid], batch_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE agent_performance_sync
            SET batch_id = $2
            WHERE id = ANY($1) AND batch_id IS NULL AND is_paid = FALSE
            "#,
        )
        .bind(ids)
        .bind(batch_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Clear the batch reference on every member record (batch cancel).
    pub async fn release_batch(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        batch_id: Uuid,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE agent_performance_sync SET batch_id = NULL WHERE batch_id = $1",
        )
        .bind(batch_id)
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected())
    }

    /// Flip every member record to paid (batch settlement).
    pub async fn mark_batch_paid(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        batch_id: Uuid,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE agent_performance_sync SET is_paid = TRUE WHERE batch_id = $1",
        )
        .bind(batch_id)
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected())
    }
}
