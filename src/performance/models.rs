use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::reconcile::duration::to_seconds_opt;

/// One sync of an agent's activity for one date, ingested from the external
/// dialer export. The service edits only the adjustment fields and the
/// payment linkage; rows are never deleted here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SyncRecord {
    pub id: Uuid,
    /// External dialer identity, matched against `candidates.agent_id`
    /// (or the candidate id itself for manually provisioned reps).
    pub agent_id: String,
    pub full_name: Option<String>,
    pub calls: Option<i32>,
    /// Seconds-or-clock-string, normalized via `reconcile::duration`.
    pub talk_time: Option<String>,
    pub wait_time: Option<String>,
    pub sync_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub batch_id: Option<Uuid>,
    pub is_paid: bool,
    pub number_of_sets: Option<i32>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub meeting_hours: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub break_hours: Option<Decimal>,
}

/// Payment state derived from the linkage fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordPaymentState {
    Unbatched,
    Batched,
    Paid,
}

impl SyncRecord {
    /// Records synced without an explicit date fall back to the ingest day.
    pub fn effective_date(&self) -> NaiveDate {
        self.sync_date
            .unwrap_or_else(|| self.created_at.date_naive())
    }

    pub fn talk_seconds(&self) -> i64 {
        to_seconds_opt(self.talk_time.as_deref())
    }

    pub fn wait_seconds(&self) -> i64 {
        to_seconds_opt(self.wait_time.as_deref())
    }

    pub fn work_seconds(&self) -> i64 {
        self.talk_seconds() + self.wait_seconds()
    }

    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("System Agent")
    }

    pub fn sets(&self) -> i64 {
        self.number_of_sets.unwrap_or(0) as i64
    }

    pub fn meeting_hours(&self) -> Decimal {
        self.meeting_hours.unwrap_or(Decimal::ZERO)
    }

    pub fn break_hours(&self) -> Decimal {
        self.break_hours.unwrap_or(Decimal::ZERO)
    }

    pub fn payment_state(&self) -> RecordPaymentState {
        if self.is_paid {
            RecordPaymentState::Paid
        } else if self.batch_id.is_some() {
            RecordPaymentState::Batched
        } else {
            RecordPaymentState::Unbatched
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> SyncRecord {
        SyncRecord {
            id: Uuid::new_v4(),
            agent_id: "1001".to_string(),
            full_name: None,
            calls: Some(12),
            talk_time: Some("1:00:00".to_string()),
            wait_time: Some("1800".to_string()),
            sync_date: None,
            created_at: Utc.with_ymd_and_hms(2026, 3, 5, 14, 30, 0).unwrap(),
            batch_id: None,
            is_paid: false,
            number_of_sets: None,
            meeting_hours: None,
            break_hours: None,
        }
    }

    #[test]
    fn test_effective_date_falls_back_to_ingest_day() {
        let mut r = record();
        assert_eq!(
            r.effective_date(),
            NaiveDate::from_ymd_opt(2026, 3, 5).unwrap()
        );
        r.sync_date = NaiveDate::from_ymd_opt(2026, 3, 1);
        assert_eq!(
            r.effective_date(),
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_mixed_duration_formats_sum() {
        let r = record();
        assert_eq!(r.talk_seconds(), 3600);
        assert_eq!(r.wait_seconds(), 1800);
        assert_eq!(r.work_seconds(), 5400);
    }

    #[test]
    fn test_payment_state() {
        let mut r = record();
        assert_eq!(r.payment_state(), RecordPaymentState::Unbatched);
        r.batch_id = Some(Uuid::new_v4());
        assert_eq!(r.payment_state(), RecordPaymentState::Batched);
        r.is_paid = true;
        assert_eq!(r.payment_state(), RecordPaymentState::Paid);
    }

    #[test]
    fn test_display_name_fallback() {
        let mut r = record();
        assert_eq!(r.display_name(), "System Agent");
        r.full_name = Some("  ".to_string());
        assert_eq!(r.display_name(), "System Agent");
        r.full_name = Some("Dana Reeve".to_string());
        assert_eq!(r.display_name(), "Dana Reeve");
    }
}
