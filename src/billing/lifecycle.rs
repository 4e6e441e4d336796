//! Payment batch lifecycle: UNBATCHED -> PENDING_PAYMENT -> PAID, with
//! CANCEL returning a pending batch's records to the pool.
//!
//! Multi-step writes follow the portal's request/response model. Create is
//! two sequential writes with a claim guard: a failure after the batch
//! insert leaves an orphan batch, which is surfaced in the error rather
//! than rolled back. Settle and cancel each run their record/batch writes
//! inside one transaction; the settlement history append stays best-effort.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::models::PaymentBatch;
use super::repository::BillingRepository;
use crate::directory::{Candidate, DirectoryRepository};
use crate::error::{AppError, AppResult, BatchError};
use crate::performance::{PerformanceRepository, SyncRecord};
use crate::reconcile::engine::{candidate_index, record_earnings};

pub struct BillingEngine {
    billing: Arc<BillingRepository>,
    performance: Arc<PerformanceRepository>,
    directory: Arc<DirectoryRepository>,
}

impl BillingEngine {
    pub fn new(
        billing: Arc<BillingRepository>,
        performance: Arc<PerformanceRepository>,
        directory: Arc<DirectoryRepository>,
    ) -> Self {
        Self {
            billing,
            performance,
            directory,
        }
    }

    /// Group a selection of unbatched records into a new pending batch for
    /// one client. `total_amount` is the sum of each record's derived
    /// net-owed at creation time.
    pub async fn create_batch(
        &self,
        client_id: Uuid,
        record_ids: &[Uuid],
        batch_name: Option<String>,
    ) -> AppResult<PaymentBatch> {
        let mut record_ids = record_ids.to_vec();
        record_ids.sort_unstable();
        record_ids.dedup();
        if record_ids.is_empty() {
            return Err(BatchError::EmptySelection.into());
        }

        let client = self
            .directory
            .get_client(client_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Client not found: {}", client_id)))?;

        let records = self.performance.fetch_by_ids(&record_ids).await?;
        validate_selection(&record_ids, &records)?;

        let candidates = self.directory.list_candidates().await?;
        let total_amount = selection_total(&records, &candidates);

        let name = batch_name.unwrap_or_else(|| {
            format!(
                "Batch {} - {}",
                Utc::now().date_naive().format("%b %d, %Y"),
                client.name
            )
        });

        let batch = self
            .billing
            .insert_batch(client_id, &name, total_amount)
            .await?;
        info!(
            "Created batch {} for client {} ({} records, total {})",
            batch.id,
            client_id,
            record_ids.len(),
            total_amount
        );

        // Claim step. Records grabbed by a competing batch since the fetch
        // are skipped by the guard, leaving the new batch short.
        let attached = self.performance.attach_batch(&record_ids, batch.id).await?;
        if attached != record_ids.len() as u64 {
            error!(
                "Batch {} attached {} of {} records; batch left in place for review",
                batch.id,
                attached,
                record_ids.len()
            );
            return Err(BatchError::PartialAttach {
                batch_id: batch.id,
                selected: record_ids.len(),
                attached,
            }
            .into());
        }

        Ok(batch)
    }

    /// Client-side settlement: pending batch -> paid, member records ->
    /// paid, one history entry appended. Payment is authoritative; the
    /// history append is audit-only and never un-pays a batch.
    pub async fn settle_batch(&self, batch_id: Uuid, client_id: Uuid) -> AppResult<PaymentBatch> {
        let batch = self
            .billing
            .get_batch(batch_id)
            .await?
            .ok_or(BatchError::NotFound(batch_id))?;

        if batch.client_id != client_id {
            return Err(BatchError::WrongClient(batch_id).into());
        }
        if !batch.status.can_settle() {
            return Err(BatchError::AlreadySettled(batch_id).into());
        }

        let mut tx = self.billing.begin_tx().await?;
        let flipped = self.billing.mark_paid(&mut tx, batch_id).await?;
        if flipped == 0 {
            // Lost the compare-and-set to a concurrent settlement.
            return Err(BatchError::AlreadySettled(batch_id).into());
        }
        let paid_records = self.performance.mark_batch_paid(&mut tx, batch_id).await?;
        tx.commit().await?;

        info!(
            "Batch {} {} -> paid by client {} ({} records marked paid)",
            batch_id,
            batch.status.as_str(),
            client_id,
            paid_records
        );

        if let Err(err) = self
            .billing
            .insert_history(client_id, batch_id, batch.total_amount)
            .await
        {
            warn!(
                "History append failed for settled batch {}: {}",
                batch_id, err
            );
        }

        self.billing
            .get_batch(batch_id)
            .await?
            .ok_or_else(|| BatchError::NotFound(batch_id).into())
    }

    /// Payroll-side cancellation of a pending batch: release every member
    /// record, then delete the batch row. Both steps share a transaction,
    /// so a cancel either fully happens or not at all.
    pub async fn cancel_batch(&self, batch_id: Uuid) -> AppResult<u64> {
        let batch = self
            .billing
            .get_batch(batch_id)
            .await?
            .ok_or(BatchError::NotFound(batch_id))?;

        if !batch.status.can_cancel() {
            return Err(BatchError::AlreadySettled(batch_id).into());
        }

        let mut tx = self.billing.begin_tx().await?;
        let released = self.performance.release_batch(&mut tx, batch_id).await?;
        let deleted = self.billing.delete_pending(&mut tx, batch_id).await?;
        if deleted == 0 {
            // Settled between the status check and the delete; the dropped
            // transaction rolls the release back.
            return Err(BatchError::AlreadySettled(batch_id).into());
        }
        tx.commit().await?;

        info!("Batch {} canceled, {} records released", batch_id, released);
        Ok(released)
    }
}

/// Every requested id must resolve to an existing, unbatched, unpaid
/// record. Runs before any write.
fn validate_selection(requested: &[Uuid], records: &[SyncRecord]) -> Result<(), BatchError> {
    let found: HashSet<Uuid> = records.iter().map(|r| r.id).collect();
    for id in requested {
        if !found.contains(id) {
            return Err(BatchError::RecordNotFound(*id));
        }
    }

    for record in records {
        if record.is_paid {
            return Err(BatchError::RecordAlreadyPaid(record.id));
        }
        if record.batch_id.is_some() {
            return Err(BatchError::AlreadyBatched(record.id));
        }
    }

    Ok(())
}

/// Sum of derived net-owed across the selection, using each record's
/// resolved candidate rate.
fn selection_total(records: &[SyncRecord], candidates: &[Candidate]) -> Decimal {
    let index = candidate_index(candidates);
    records
        .iter()
        .map(|record| {
            let candidate = index.get(record.agent_id.as_str()).copied();
            record_earnings(record, candidate).net_owed
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn record(agent: &str, talk: &str, sets: i32) -> SyncRecord {
        SyncRecord {
            id: Uuid::new_v4(),
            agent_id: agent.to_string(),
            full_name: Some("Dana Reeve".to_string()),
            calls: Some(10),
            talk_time: Some(talk.to_string()),
            wait_time: None,
            sync_date: chrono::NaiveDate::from_ymd_opt(2026, 3, 5),
            created_at: Utc.with_ymd_and_hms(2026, 3, 5, 12, 0, 0).unwrap(),
            batch_id: None,
            is_paid: false,
            number_of_sets: Some(sets),
            meeting_hours: None,
            break_hours: None,
        }
    }

    fn candidate(agent_id: &str, rate: Decimal) -> Candidate {
        Candidate {
            id: Uuid::new_v4(),
            agent_id: Some(agent_id.to_string()),
            client_id: None,
            name: "Dana Reeve".to_string(),
            email: String::new(),
            role: String::new(),
            whatsapp_number: String::new(),
            resume_link: String::new(),
            recording_link: String::new(),
            status: "GOOD".to_string(),
            show_phone_to_client: false,
            rate_per_hour: rate,
            alias: None,
            username: None,
            password: None,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_selection_rejects_missing_record() {
        let records = vec![record("77", "1:00:00", 0)];
        let ghost = Uuid::new_v4();
        let err = validate_selection(&[records[0].id, ghost], &records).unwrap_err();
        assert!(matches!(err, BatchError::RecordNotFound(id) if id == ghost));
    }

    #[test]
    fn test_selection_rejects_batched_record() {
        let mut r = record("77", "1:00:00", 0);
        r.batch_id = Some(Uuid::new_v4());
        let err = validate_selection(&[r.id], &[r.clone()]).unwrap_err();
        assert!(matches!(err, BatchError::AlreadyBatched(id) if id == r.id));
    }

    #[test]
    fn test_selection_rejects_paid_record() {
        let mut r = record("77", "1:00:00", 0);
        r.is_paid = true;
        let err = validate_selection(&[r.id], &[r.clone()]).unwrap_err();
        assert!(matches!(err, BatchError::RecordAlreadyPaid(id) if id == r.id));
    }

    #[test]
    fn test_selection_accepts_clean_records() {
        let records = vec![record("77", "1:00:00", 0), record("77", "2:00:00", 1)];
        let ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();
        assert!(validate_selection(&ids, &records).is_ok());
    }

    #[test]
    fn test_total_is_sum_of_derived_net_owed() {
        let candidates = vec![candidate("77", dec!(10))];
        // 2h, 3 sets at rate 10 -> 99; 1h, 0 sets -> 1*10 + (1*2) = 12
        let records = vec![record("77", "2:00:00", 3), record("77", "1:00:00", 0)];
        assert_eq!(selection_total(&records, &candidates), dec!(111));
    }

    #[test]
    fn test_total_for_unknown_agent_uses_zero_rate() {
        // 1h, 1 set, no candidate: net = 0*1 + 20 + (1*2 + 5) = 27
        let records = vec![record("404", "1:00:00", 1)];
        assert_eq!(selection_total(&records, &[]), dec!(27));
    }
}
