use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::performance::SyncRecord;
use crate::reconcile::aggregate::{aggregate_by_key, name_passes_filters, AdjustmentMode};
use crate::reconcile::period::PeriodFilter;

/// One ranked row of the public board.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardRow {
    pub agent_name: String,
    pub calls: i64,
    pub sets: i64,
    pub ranking: i32,
}

/// A persisted snapshot of the board for one date.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SnapshotRow {
    pub id: Uuid,
    pub agent_name: String,
    pub synced_date: NaiveDate,
    pub calls: i32,
    pub sets: i32,
    pub ranking: i32,
    pub created_at: DateTime<Utc>,
}

/// Rank agents over a date window: calls and sets summed per agent, sorted
/// by sets then calls, both descending. Excluded sync names never place.
pub fn rank(
    records: &[SyncRecord],
    filter: PeriodFilter,
    excluded: &[String],
) -> Vec<LeaderboardRow> {
    let in_window: Vec<&SyncRecord> = records
        .iter()
        .filter(|r| filter.contains(r.effective_date()))
        .collect();

    let groups = aggregate_by_key(
        in_window.iter().copied(),
        |r| r.agent_id.clone(),
        AdjustmentMode::Sum,
    );

    let mut rows: Vec<LeaderboardRow> = groups
        .into_values()
        .filter(|agg| name_passes_filters(&agg.full_name, None, excluded))
        .map(|agg| LeaderboardRow {
            agent_name: agg.full_name,
            calls: agg.calls,
            sets: agg.sets,
            ranking: 0,
        })
        .collect();

    rows.sort_by(|a, b| b.sets.cmp(&a.sets).then_with(|| b.calls.cmp(&a.calls)));
    for (idx, row) in rows.iter_mut().enumerate() {
        row.ranking = idx as i32 + 1;
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(agent: &str, name: &str, calls: i32, sets: i32) -> SyncRecord {
        SyncRecord {
            id: Uuid::new_v4(),
            agent_id: agent.to_string(),
            full_name: Some(name.to_string()),
            calls: Some(calls),
            talk_time: None,
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

    #[test]
    fn test_rank_orders_by_sets_then_calls() {
        let records = vec![
            record("a", "Low Sets", 90, 1),
            record("b", "High Sets", 10, 5),
            record("c", "Tied Sets More Calls", 50, 1),
        ];
        let rows = rank(&records, PeriodFilter::All, &[]);

        assert_eq!(rows[0].agent_name, "High Sets");
        assert_eq!(rows[0].ranking, 1);
        assert_eq!(rows[1].agent_name, "Low Sets");
        assert_eq!(rows[2].agent_name, "Tied Sets More Calls");
    }

    #[test]
    fn test_rank_sums_across_days() {
        let mut day_two = record("a", "Dana Reeve", 30, 2);
        day_two.sync_date = chrono::NaiveDate::from_ymd_opt(2026, 3, 6);
        let records = vec![record("a", "Dana Reeve", 20, 1), day_two];

        let rows = rank(&records, PeriodFilter::All, &[]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].calls, 50);
        assert_eq!(rows[0].sets, 3);
    }

    #[test]
    fn test_rank_respects_window_and_exclusions() {
        let mut outside = record("a", "Dana Reeve", 100, 10);
        outside.sync_date = chrono::NaiveDate::from_ymd_opt(2026, 2, 1);
        let records = vec![
            outside,
            record("b", "Sync Bot", 50, 5),
            record("c", "Real Agent", 10, 1),
        ];

        let rows = rank(
            &records,
            PeriodFilter::Range {
                start: chrono::NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                end: chrono::NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
            },
            &["Sync Bot".to_string()],
        );

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].agent_name, "Real Agent");
    }

    #[test]
    fn test_rank_ties_order_but_sums_are_stable() {
        let forward = vec![record("a", "Dana Reeve", 20, 1), record("a", "Dana Reeve", 30, 2)];
        let mut reversed = forward.clone();
        reversed.reverse();

        let f = rank(&forward, PeriodFilter::All, &[]);
        let r = rank(&reversed, PeriodFilter::All, &[]);
        assert_eq!(f[0].calls, r[0].calls);
        assert_eq!(f[0].sets, r[0].sets);
    }
}
