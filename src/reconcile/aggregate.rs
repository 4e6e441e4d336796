//! Grouping of sync records under an arbitrary key.
//!
//! Every role view reduces the same rows differently: the payroll ledger
//! groups by agent+date, the batcher pool keys by raw record id, the rep
//! dashboard by period bucket. Counter fields (calls, talk/wait seconds)
//! are always summed; the adjustment fields carry an explicit mode because
//! the views disagree on what a merged row means.

use std::collections::HashMap;
use std::hash::Hash;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::performance::SyncRecord;

/// How adjustment fields (sets, meeting hours, break hours) combine when a
/// key groups several raw records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustmentMode {
    /// Later-iterated records overwrite earlier ones. Matches the ledger
    /// view, where an agent+date group is expected to hold one logical
    /// adjustment set and re-syncs replace it.
    LastWins,
    /// Adjustments accumulate across the group. Used whenever a group spans
    /// dates (rep period buckets, client summary, running payroll totals).
    Sum,
}

/// One aggregate row per distinct key.
#[derive(Debug, Clone)]
pub struct WorkAggregate {
    /// Ids of the member records, in iteration order.
    pub record_ids: Vec<Uuid>,
    pub agent_id: String,
    pub full_name: String,
    pub calls: i64,
    pub talk_seconds: i64,
    pub wait_seconds: i64,
    pub sets: i64,
    pub meeting_hours: Decimal,
    pub break_hours: Decimal,
    pub records: usize,
    /// True iff every member record is paid.
    pub all_paid: bool,
    /// Batch linkage of the last member record.
    pub batch_id: Option<Uuid>,
}

impl WorkAggregate {
    pub fn work_seconds(&self) -> i64 {
        self.talk_seconds + self.wait_seconds
    }

    fn seed(record: &SyncRecord) -> Self {
        Self {
            record_ids: Vec::new(),
            agent_id: record.agent_id.clone(),
            full_name: record.display_name().to_string(),
            calls: 0,
            talk_seconds: 0,
            wait_seconds: 0,
            sets: 0,
            meeting_hours: Decimal::ZERO,
            break_hours: Decimal::ZERO,
            records: 0,
            all_paid: true,
            batch_id: None,
        }
    }

    fn fold(&mut self, record: &SyncRecord, mode: AdjustmentMode) {
        self.record_ids.push(record.id);
        self.calls += record.calls.unwrap_or(0) as i64;
        self.talk_seconds += record.talk_seconds();
        self.wait_seconds += record.wait_seconds();
        self.records += 1;
        self.all_paid &= record.is_paid;
        self.batch_id = record.batch_id;

        match mode {
            AdjustmentMode::LastWins => {
                self.sets = record.sets();
                self.meeting_hours = record.meeting_hours();
                self.break_hours = record.break_hours();
            }
            AdjustmentMode::Sum => {
                self.sets += record.sets();
                self.meeting_hours += record.meeting_hours();
                self.break_hours += record.break_hours();
            }
        }
    }
}

/// Reduce `records` to one `WorkAggregate` per distinct `key_fn` output.
///
/// Summed fields are permutation-invariant; `LastWins` adjustment fields
/// take the value of the last record iterated for that key, so callers
/// relying on input order must not reorder beforehand.
pub fn aggregate_by_key<'a, K, F, I>(
    records: I,
    key_fn: F,
    mode: AdjustmentMode,
) -> HashMap<K, WorkAggregate>
where
    K: Eq + Hash,
    F: Fn(&SyncRecord) -> K,
    I: IntoIterator<Item = &'a SyncRecord>,
{
    let mut groups: HashMap<K, WorkAggregate> = HashMap::new();

    for record in records {
        let entry = groups
            .entry(key_fn(record))
            .or_insert_with(|| WorkAggregate::seed(record));
        entry.fold(record, mode);
    }

    groups
}

/// True when `name` passes the free-text search and is not on the
/// excluded-names list. Both checks are case-insensitive; exclusion is an
/// exact match after trimming, search is a substring match.
pub fn name_passes_filters(name: &str, search: Option<&str>, excluded: &[String]) -> bool {
    let normalized = name.trim().to_lowercase();

    if let Some(term) = search {
        if !normalized.contains(&term.trim().to_lowercase()) {
            return false;
        }
    }

    !excluded
        .iter()
        .any(|ex| ex.trim().to_lowercase() == normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn record(agent: &str, talk: &str, sets: i32, meeting: Decimal) -> SyncRecord {
        SyncRecord {
            id: Uuid::new_v4(),
            agent_id: agent.to_string(),
            full_name: Some(format!("Agent {}", agent)),
            calls: Some(10),
            talk_time: Some(talk.to_string()),
            wait_time: Some("0:30".to_string()),
            sync_date: None,
            created_at: Utc.with_ymd_and_hms(2026, 3, 5, 12, 0, 0).unwrap(),
            batch_id: None,
            is_paid: false,
            number_of_sets: Some(sets),
            meeting_hours: Some(meeting),
            break_hours: None,
        }
    }

    #[test]
    fn test_counters_sum_across_group() {
        let records = vec![
            record("a", "10:00", 2, dec!(1)),
            record("a", "0:05:00", 3, dec!(2)),
        ];
        let groups =
            aggregate_by_key(&records, |r| r.agent_id.clone(), AdjustmentMode::Sum);

        let agg = &groups["a"];
        assert_eq!(agg.calls, 20);
        assert_eq!(agg.talk_seconds, 900);
        assert_eq!(agg.wait_seconds, 60);
        assert_eq!(agg.records, 2);
        assert_eq!(agg.sets, 5);
        assert_eq!(agg.meeting_hours, dec!(3));
    }

    #[test]
    fn test_last_wins_takes_final_record() {
        let records = vec![
            record("a", "10:00", 2, dec!(1)),
            record("a", "5:00", 3, dec!(2)),
        ];
        let groups =
            aggregate_by_key(&records, |r| r.agent_id.clone(), AdjustmentMode::LastWins);

        let agg = &groups["a"];
        assert_eq!(agg.sets, 3);
        assert_eq!(agg.meeting_hours, dec!(2));
        // Counters still sum even in LastWins mode
        assert_eq!(agg.talk_seconds, 900);
    }

    #[test]
    fn test_sums_are_permutation_invariant_last_wins_is_not() {
        let forward = vec![
            record("a", "10:00", 2, dec!(1)),
            record("a", "5:00", 7, dec!(4)),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let f_last =
            aggregate_by_key(&forward, |r| r.agent_id.clone(), AdjustmentMode::LastWins);
        let r_last =
            aggregate_by_key(&reversed, |r| r.agent_id.clone(), AdjustmentMode::LastWins);
        assert_eq!(f_last["a"].talk_seconds, r_last["a"].talk_seconds);
        assert_eq!(f_last["a"].calls, r_last["a"].calls);
        assert_ne!(f_last["a"].sets, r_last["a"].sets);

        let f_sum = aggregate_by_key(&forward, |r| r.agent_id.clone(), AdjustmentMode::Sum);
        let r_sum =
            aggregate_by_key(&reversed, |r| r.agent_id.clone(), AdjustmentMode::Sum);
        assert_eq!(f_sum["a"].sets, r_sum["a"].sets);
        assert_eq!(f_sum["a"].meeting_hours, r_sum["a"].meeting_hours);
    }

    #[test]
    fn test_all_paid_requires_every_member() {
        let mut paid = record("a", "1:00", 0, dec!(0));
        paid.is_paid = true;
        let unpaid = record("a", "1:00", 0, dec!(0));

        let mixed = vec![paid.clone(), unpaid];
        let groups = aggregate_by_key(&mixed, |r| r.agent_id.clone(), AdjustmentMode::Sum);
        assert!(!groups["a"].all_paid);

        let only_paid = vec![paid];
        let groups =
            aggregate_by_key(&only_paid, |r| r.agent_id.clone(), AdjustmentMode::Sum);
        assert!(groups["a"].all_paid);
    }

    #[test]
    fn test_name_filters() {
        let excluded = vec!["Sync Bot".to_string()];
        assert!(name_passes_filters("Dana Reeve", None, &excluded));
        assert!(!name_passes_filters("  sync bot ", None, &excluded));
        assert!(name_passes_filters("Dana Reeve", Some("dana"), &excluded));
        assert!(!name_passes_filters("Dana Reeve", Some("xyz"), &excluded));
        // Exclusion is exact match, not substring
        assert!(name_passes_filters("Sync Bot Two", None, &excluded));
    }
}
