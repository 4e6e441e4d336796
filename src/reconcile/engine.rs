//! The reconciliation engine: composes duration normalization, keyed
//! aggregation, and the earnings formulas into the concrete payloads the
//! role views render. All methods are pure over already-fetched rows.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::directory::Candidate;
use crate::performance::{RecordPaymentState, SyncRecord};
use crate::reconcile::aggregate::{aggregate_by_key, name_passes_filters, AdjustmentMode};
use crate::reconcile::duration::format_hms;
use crate::reconcile::earnings::{self, EarningsInput};
use crate::reconcile::period::{bucket_label, PeriodFilter, RepBucket};

#[derive(Debug, Clone, Default)]
pub struct ReconcileConfig {
    /// Non-agent names the sync feed injects; dropped after aggregation.
    pub excluded_names: Vec<String>,
}

pub struct Reconciler {
    config: ReconcileConfig,
}

/// One row of the payroll ledger or batcher pool.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerRow {
    /// Representative record id; in the batcher pool this is the
    /// selectable unit.
    pub record_id: Uuid,
    pub candidate_id: Option<Uuid>,
    pub agent_id: String,
    pub full_name: String,
    pub sync_date: NaiveDate,
    pub calls: i64,
    pub talk_seconds: i64,
    pub wait_seconds: i64,
    pub talk_hms: String,
    pub wait_hms: String,
    pub work_hms: String,
    pub sets: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub meeting_hours: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub break_hours: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub service_total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub net_owed: Decimal,
    pub is_paid: bool,
    pub batch_id: Option<Uuid>,
}

/// One bucketed row of the rep dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct RepRow {
    pub period: String,
    pub calls: i64,
    pub talk_seconds: i64,
    pub wait_seconds: i64,
    pub talk_hms: String,
    pub wait_hms: String,
    pub work_hms: String,
    pub sets: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub meeting_hours: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub break_hours: Decimal,
    pub is_paid: bool,
    #[serde(with = "rust_decimal::serde::float")]
    pub estimated_pay: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepStats {
    pub total_calls: i64,
    pub paid_calls: i64,
    pub pending_calls: i64,
    pub total_seconds: i64,
    pub paid_seconds: i64,
    pub pending_seconds: i64,
    pub pending_sets: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub pending_earnings: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepDashboard {
    pub rows: Vec<RepRow>,
    pub stats: RepStats,
}

/// One settled batch on the rep's disbursement history.
#[derive(Debug, Clone, Serialize)]
pub struct RepBatchSummary {
    pub batch_id: Uuid,
    pub work_seconds: i64,
    pub work_hms: String,
    pub sets: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Per-candidate recomputed totals for the client summary.
#[derive(Debug, Clone, Serialize)]
pub struct ClientSummaryRow {
    pub candidate_id: Uuid,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub service_total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub net_owed: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientSummary {
    pub rows: Vec<ClientSummaryRow>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_service: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_net_owed: Decimal,
}

/// One record line inside a batch composition view.
#[derive(Debug, Clone, Serialize)]
pub struct BatchLine {
    pub record_id: Uuid,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub billable_hours: Decimal,
    pub sets: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
}

/// Talk-vs-total hours for the admin analytics view. Carries no currency.
#[derive(Debug, Clone, Serialize)]
pub struct AgentHoursRow {
    pub candidate_id: Uuid,
    pub name: String,
    pub active_seconds: i64,
    pub total_seconds: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub efficiency_pct: Decimal,
}

/// Index candidates by every identity a sync record might carry: the
/// external agent id when present, and the candidate id itself.
pub fn candidate_index(candidates: &[Candidate]) -> HashMap<String, &Candidate> {
    let mut index = HashMap::new();
    for candidate in candidates {
        if let Some(agent_id) = candidate.agent_id.as_deref() {
            if !agent_id.trim().is_empty() {
                index.insert(agent_id.to_string(), candidate);
            }
        }
        index.insert(candidate.id.to_string(), candidate);
    }
    index
}

/// Earnings for a single record given its (possibly unresolved) candidate.
pub fn record_earnings(record: &SyncRecord, candidate: Option<&Candidate>) -> earnings::Earnings {
    let rate = earnings::effective_rate(
        candidate.map(|c| c.employment_status()),
        candidate.map(|c| c.rate_per_hour),
    );
    let input = EarningsInput {
        work_seconds: record.work_seconds(),
        meeting_hours: record.meeting_hours(),
        break_hours: record.break_hours(),
        sets: record.sets(),
    };
    earnings::compute(&input, rate)
}

impl Reconciler {
    pub fn new(config: ReconcileConfig) -> Self {
        Self { config }
    }

    /// Payroll ledger: one row per agent per date, adjustments last-wins.
    pub fn ledger(
        &self,
        records: &[SyncRecord],
        candidates: &[Candidate],
        filter: PeriodFilter,
        search: Option<&str>,
    ) -> Vec<LedgerRow> {
        let filtered: Vec<&SyncRecord> = records
            .iter()
            .filter(|r| filter.contains(r.effective_date()))
            .collect();

        let groups = aggregate_by_key(
            filtered.iter().copied(),
            |r| (r.agent_id.clone(), r.effective_date()),
            AdjustmentMode::LastWins,
        );

        let index = candidate_index(candidates);
        let mut rows: Vec<LedgerRow> = groups
            .into_iter()
            .filter(|(_, agg)| {
                name_passes_filters(&agg.full_name, search, &self.config.excluded_names)
            })
            .map(|((_, date), agg)| self.ledger_row(date, agg, &index))
            .collect();

        rows.sort_by(|a, b| {
            b.sync_date
                .cmp(&a.sync_date)
                .then_with(|| a.full_name.cmp(&b.full_name))
        });
        rows
    }

    /// Batcher pool: currently-unbatched records, one row each, keyed by
    /// record id so every row is individually selectable.
    pub fn batcher_pool(
        &self,
        records: &[SyncRecord],
        candidates: &[Candidate],
        filter: PeriodFilter,
        search: Option<&str>,
    ) -> Vec<LedgerRow> {
        let filtered: Vec<&SyncRecord> = records
            .iter()
            .filter(|r| r.payment_state() == RecordPaymentState::Unbatched)
            .filter(|r| filter.contains(r.effective_date()))
            .collect();

        let groups = aggregate_by_key(
            filtered.iter().copied(),
            |r| r.id,
            AdjustmentMode::LastWins,
        );

        let index = candidate_index(candidates);
        let mut rows: Vec<LedgerRow> = groups
            .into_iter()
            .filter(|(_, agg)| {
                name_passes_filters(&agg.full_name, search, &self.config.excluded_names)
            })
            .map(|(_, agg)| {
                let date = filtered
                    .iter()
                    .find(|r| Some(&r.id) == agg.record_ids.first())
                    .map(|r| r.effective_date())
                    .unwrap_or_default();
                self.ledger_row(date, agg, &index)
            })
            .collect();

        rows.sort_by(|a, b| {
            b.sync_date
                .cmp(&a.sync_date)
                .then_with(|| a.full_name.cmp(&b.full_name))
        });
        rows
    }

    fn ledger_row(
        &self,
        date: NaiveDate,
        agg: crate::reconcile::aggregate::WorkAggregate,
        index: &HashMap<String, &Candidate>,
    ) -> LedgerRow {
        let candidate = index.get(agg.agent_id.as_str()).copied();
        let rate = earnings::effective_rate(
            candidate.map(|c| c.employment_status()),
            candidate.map(|c| c.rate_per_hour),
        );
        let input = EarningsInput {
            work_seconds: agg.work_seconds(),
            meeting_hours: agg.meeting_hours,
            break_hours: agg.break_hours,
            sets: agg.sets,
        };
        let earned = earnings::compute(&input, rate);

        LedgerRow {
            record_id: agg.record_ids.first().copied().unwrap_or_default(),
            candidate_id: candidate.map(|c| c.id),
            agent_id: agg.agent_id,
            full_name: agg.full_name,
            sync_date: date,
            calls: agg.calls,
            talk_seconds: agg.talk_seconds,
            wait_seconds: agg.wait_seconds,
            talk_hms: format_hms(agg.talk_seconds),
            wait_hms: format_hms(agg.wait_seconds),
            work_hms: format_hms(agg.talk_seconds + agg.wait_seconds),
            sets: agg.sets,
            meeting_hours: agg.meeting_hours,
            break_hours: agg.break_hours,
            rate,
            service_total: earned.service_total,
            net_owed: earned.net_owed,
            is_paid: agg.all_paid && agg.records > 0,
            batch_id: agg.batch_id,
        }
    }

    /// Running net-payables figure across a filtered window: per-agent Sum
    /// aggregation (adjustments accumulate across dates), only agents that
    /// resolve to a candidate.
    pub fn net_payables(
        &self,
        records: &[SyncRecord],
        candidates: &[Candidate],
        filter: PeriodFilter,
        search: Option<&str>,
    ) -> Decimal {
        let filtered: Vec<&SyncRecord> = records
            .iter()
            .filter(|r| filter.contains(r.effective_date()))
            .collect();

        let groups = aggregate_by_key(
            filtered.iter().copied(),
            |r| r.agent_id.clone(),
            AdjustmentMode::Sum,
        );

        let index = candidate_index(candidates);
        groups
            .into_iter()
            .filter(|(_, agg)| {
                name_passes_filters(&agg.full_name, search, &self.config.excluded_names)
            })
            .filter_map(|(agent_id, agg)| {
                let candidate = index.get(agent_id.as_str()).copied()?;
                let rate = earnings::effective_rate(
                    Some(candidate.employment_status()),
                    Some(candidate.rate_per_hour),
                );
                let input = EarningsInput {
                    work_seconds: agg.work_seconds(),
                    meeting_hours: agg.meeting_hours,
                    break_hours: agg.break_hours,
                    sets: agg.sets,
                };
                Some(earnings::compute(&input, rate).net_owed)
            })
            .sum()
    }

    /// Rep dashboard: the agent's own records, bucketed by period,
    /// adjustments summed within each bucket.
    pub fn rep_dashboard(
        &self,
        records: &[SyncRecord],
        rep: &Candidate,
        bucket: RepBucket,
        filter: PeriodFilter,
    ) -> RepDashboard {
        let rate = earnings::effective_rate(
            Some(rep.employment_status()),
            Some(rep.rate_per_hour),
        );

        let filtered: Vec<&SyncRecord> = records
            .iter()
            .filter(|r| filter.contains(r.effective_date()))
            .collect();

        let groups = aggregate_by_key(
            filtered.iter().copied(),
            |r| bucket_label(r.effective_date(), bucket),
            AdjustmentMode::Sum,
        );

        let mut rows: Vec<RepRow> = groups
            .into_iter()
            .map(|(period, agg)| {
                let input = EarningsInput {
                    work_seconds: agg.work_seconds(),
                    meeting_hours: agg.meeting_hours,
                    break_hours: agg.break_hours,
                    sets: agg.sets,
                };
                RepRow {
                    period,
                    calls: agg.calls,
                    talk_seconds: agg.talk_seconds,
                    wait_seconds: agg.wait_seconds,
                    talk_hms: format_hms(agg.talk_seconds),
                    wait_hms: format_hms(agg.wait_seconds),
                    work_hms: format_hms(agg.talk_seconds + agg.wait_seconds),
                    sets: agg.sets,
                    meeting_hours: agg.meeting_hours,
                    break_hours: agg.break_hours,
                    is_paid: agg.all_paid && agg.records > 0,
                    estimated_pay: earnings::compute(&input, rate).agent_pay,
                }
            })
            .collect();
        rows.sort_by(|a, b| b.period.cmp(&a.period));

        let stats = self.rep_stats(&filtered, rate);
        RepDashboard { rows, stats }
    }

    fn rep_stats(&self, filtered: &[&SyncRecord], rate: Decimal) -> RepStats {
        let mut stats = RepStats {
            total_calls: 0,
            paid_calls: 0,
            pending_calls: 0,
            total_seconds: 0,
            paid_seconds: 0,
            pending_seconds: 0,
            pending_sets: 0,
            pending_earnings: Decimal::ZERO,
        };

        let mut pending = EarningsInput {
            work_seconds: 0,
            meeting_hours: Decimal::ZERO,
            break_hours: Decimal::ZERO,
            sets: 0,
        };

        for record in filtered {
            let calls = record.calls.unwrap_or(0) as i64;
            let seconds = record.work_seconds();
            stats.total_calls += calls;
            stats.total_seconds += seconds;
            if record.is_paid {
                stats.paid_calls += calls;
                stats.paid_seconds += seconds;
            } else {
                stats.pending_calls += calls;
                stats.pending_seconds += seconds;
                pending.work_seconds += seconds;
                pending.meeting_hours += record.meeting_hours();
                pending.break_hours += record.break_hours();
                pending.sets += record.sets();
            }
        }

        stats.pending_sets = pending.sets;
        stats.pending_earnings = earnings::agent_pay(&pending, rate);
        stats
    }

    /// Disbursement history: the rep's paid records grouped by batch.
    pub fn rep_paid_history(
        &self,
        records: &[SyncRecord],
        rep: &Candidate,
    ) -> Vec<RepBatchSummary> {
        let rate = earnings::effective_rate(
            Some(rep.employment_status()),
            Some(rep.rate_per_hour),
        );

        let paid: Vec<&SyncRecord> = records
            .iter()
            .filter(|r| r.is_paid && r.batch_id.is_some())
            .collect();

        let groups = aggregate_by_key(
            paid.iter().copied(),
            |r| r.batch_id.expect("filtered on batch_id"),
            AdjustmentMode::Sum,
        );

        let mut summaries: Vec<RepBatchSummary> = groups
            .into_iter()
            .map(|(batch_id, agg)| {
                let input = EarningsInput {
                    work_seconds: agg.work_seconds(),
                    meeting_hours: agg.meeting_hours,
                    break_hours: agg.break_hours,
                    sets: agg.sets,
                };
                RepBatchSummary {
                    batch_id,
                    work_seconds: agg.work_seconds(),
                    work_hms: format_hms(agg.work_seconds()),
                    sets: agg.sets,
                    amount: earnings::agent_pay(&input, rate),
                }
            })
            .collect();
        summaries.sort_by(|a, b| b.work_seconds.cmp(&a.work_seconds));
        summaries
    }

    /// Client workforce summary: per-candidate totals recomputed from the
    /// candidate's full sync history, adjustments summed.
    pub fn client_summary(
        &self,
        records: &[SyncRecord],
        candidates: &[Candidate],
    ) -> ClientSummary {
        let mut rows = Vec::with_capacity(candidates.len());
        let mut total_service = Decimal::ZERO;
        let mut total_net = Decimal::ZERO;

        for candidate in candidates {
            let identity = candidate.sync_identity();
            let own: Vec<&SyncRecord> = records
                .iter()
                .filter(|r| r.agent_id == identity || r.agent_id == candidate.id.to_string())
                .collect();

            let groups =
                aggregate_by_key(own.iter().copied(), |_| (), AdjustmentMode::Sum);
            let earned = match groups.into_iter().next() {
                Some((_, agg)) => {
                    let rate = earnings::effective_rate(
                        Some(candidate.employment_status()),
                        Some(candidate.rate_per_hour),
                    );
                    let input = EarningsInput {
                        work_seconds: agg.work_seconds(),
                        meeting_hours: agg.meeting_hours,
                        break_hours: agg.break_hours,
                        sets: agg.sets,
                    };
                    earnings::compute(&input, rate)
                }
                None => earnings::compute(
                    &EarningsInput {
                        work_seconds: 0,
                        meeting_hours: Decimal::ZERO,
                        break_hours: Decimal::ZERO,
                        sets: 0,
                    },
                    Decimal::ZERO,
                ),
            };

            total_service += earned.service_total;
            total_net += earned.net_owed;
            rows.push(ClientSummaryRow {
                candidate_id: candidate.id,
                name: candidate.name.clone(),
                service_total: earned.service_total,
                net_owed: earned.net_owed,
            });
        }

        ClientSummary {
            rows,
            total_service,
            total_net_owed: total_net,
        }
    }

    /// Per-record composition of a batch: what each line contributed.
    pub fn batch_composition(
        &self,
        records: &[SyncRecord],
        candidates: &[Candidate],
    ) -> Vec<BatchLine> {
        let index = candidate_index(candidates);
        records
            .iter()
            .map(|record| {
                let candidate = index.get(record.agent_id.as_str()).copied();
                let earned = record_earnings(record, candidate);
                let input = EarningsInput {
                    work_seconds: record.work_seconds(),
                    meeting_hours: record.meeting_hours(),
                    break_hours: record.break_hours(),
                    sets: record.sets(),
                };
                BatchLine {
                    record_id: record.id,
                    name: record.display_name().to_string(),
                    billable_hours: input.billable_hours().round_dp(2),
                    sets: record.sets(),
                    subtotal: earned.net_owed,
                }
            })
            .collect()
    }

    /// Admin analytics: talk vs talk+wait per candidate. Currency-free.
    pub fn hour_stats(
        &self,
        records: &[SyncRecord],
        candidates: &[Candidate],
    ) -> Vec<AgentHoursRow> {
        let mut by_agent: HashMap<&str, (i64, i64)> = HashMap::new();
        for record in records {
            let entry = by_agent.entry(record.agent_id.as_str()).or_default();
            entry.0 += record.talk_seconds();
            entry.1 += record.work_seconds();
        }

        let mut rows: Vec<AgentHoursRow> = candidates
            .iter()
            .filter_map(|candidate| {
                let identity = candidate.sync_identity();
                let (active, total) = by_agent
                    .get(identity.as_str())
                    .or_else(|| by_agent.get(candidate.id.to_string().as_str()))
                    .copied()?;
                if total == 0 {
                    return None;
                }
                let efficiency =
                    Decimal::from(active) * Decimal::from(100) / Decimal::from(total);
                Some(AgentHoursRow {
                    candidate_id: candidate.id,
                    name: candidate.name.clone(),
                    active_seconds: active,
                    total_seconds: total,
                    efficiency_pct: efficiency.round_dp(1),
                })
            })
            .collect();

        rows.sort_by(|a, b| b.total_seconds.cmp(&a.total_seconds));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn candidate(agent_id: &str, status: &str, rate: Decimal) -> Candidate {
        Candidate {
            id: Uuid::new_v4(),
            agent_id: Some(agent_id.to_string()),
            client_id: None,
            name: format!("Agent {}", agent_id),
            email: String::new(),
            role: "SDR".to_string(),
            whatsapp_number: String::new(),
            resume_link: String::new(),
            recording_link: String::new(),
            status: status.to_string(),
            show_phone_to_client: false,
            rate_per_hour: rate,
            alias: None,
            username: None,
            password: None,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn record(agent: &str, name: &str, date: (i32, u32, u32), talk: &str) -> SyncRecord {
        SyncRecord {
            id: Uuid::new_v4(),
            agent_id: agent.to_string(),
            full_name: Some(name.to_string()),
            calls: Some(20),
            talk_time: Some(talk.to_string()),
            wait_time: Some("30:00".to_string()),
            sync_date: chrono::NaiveDate::from_ymd_opt(date.0, date.1, date.2),
            created_at: Utc.with_ymd_and_hms(2026, 3, 5, 12, 0, 0).unwrap(),
            batch_id: None,
            is_paid: false,
            number_of_sets: Some(1),
            meeting_hours: Some(dec!(0)),
            break_hours: Some(dec!(0)),
        }
    }

    fn reconciler() -> Reconciler {
        Reconciler::new(ReconcileConfig {
            excluded_names: vec!["Sync Bot".to_string()],
        })
    }

    #[test]
    fn test_ledger_groups_agent_and_date() {
        let candidates = vec![candidate("77", "GOOD", dec!(10))];
        let records = vec![
            record("77", "Dana Reeve", (2026, 3, 4), "1:00:00"),
            record("77", "Dana Reeve", (2026, 3, 4), "0:30:00"),
            record("77", "Dana Reeve", (2026, 3, 5), "1:00:00"),
        ];

        let rows = reconciler().ledger(&records, &candidates, PeriodFilter::All, None);
        assert_eq!(rows.len(), 2);
        // Newest date first
        assert_eq!(
            rows[0].sync_date,
            chrono::NaiveDate::from_ymd_opt(2026, 3, 5).unwrap()
        );
        let merged = &rows[1];
        assert_eq!(merged.talk_seconds, 5400);
        assert_eq!(merged.wait_seconds, 3600);
        assert_eq!(merged.calls, 40);
        assert_eq!(merged.rate, dec!(10));
    }

    #[test]
    fn test_ledger_money_matches_formula() {
        let candidates = vec![candidate("77", "GOOD", dec!(10))];
        // 1.5h talk + 0.5h wait = 2h work, 3 sets
        let mut r = record("77", "Dana Reeve", (2026, 3, 5), "1:30:00");
        r.number_of_sets = Some(3);
        let records = vec![r];

        let rows = reconciler().ledger(&records, &candidates, PeriodFilter::All, None);
        assert_eq!(rows[0].service_total, dec!(19));
        assert_eq!(rows[0].net_owed, dec!(99));
    }

    #[test]
    fn test_money_is_pure_over_batch_linkage() {
        let candidates = vec![candidate("77", "GOOD", dec!(10))];
        let mut r = record("77", "Dana Reeve", (2026, 3, 5), "2:00:00");
        let before = reconciler().ledger(&[r.clone()], &candidates, PeriodFilter::All, None);

        r.batch_id = Some(Uuid::new_v4());
        let after = reconciler().ledger(&[r], &candidates, PeriodFilter::All, None);

        assert_eq!(before[0].net_owed, after[0].net_owed);
        assert_eq!(before[0].service_total, after[0].service_total);
    }

    #[test]
    fn test_excluded_names_dropped_after_aggregation() {
        let candidates = vec![candidate("77", "GOOD", dec!(10))];
        let records = vec![
            record("77", "Dana Reeve", (2026, 3, 5), "1:00:00"),
            record("99", "Sync Bot", (2026, 3, 5), "9:00:00"),
        ];

        let rows = reconciler().ledger(&records, &candidates, PeriodFilter::All, None);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].full_name, "Dana Reeve");
    }

    #[test]
    fn test_batcher_pool_excludes_linked_records() {
        let candidates = vec![candidate("77", "GOOD", dec!(10))];
        let mut linked = record("77", "Dana Reeve", (2026, 3, 5), "1:00:00");
        linked.batch_id = Some(Uuid::new_v4());
        let free = record("77", "Dana Reeve", (2026, 3, 5), "1:00:00");
        let records = vec![linked, free.clone()];

        let rows =
            reconciler().batcher_pool(&records, &candidates, PeriodFilter::All, None);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].record_id, free.id);
    }

    #[test]
    fn test_unknown_agent_rate_defaults_to_zero() {
        let rows = reconciler().ledger(
            &vec![record("404", "Ghost Agent", (2026, 3, 5), "1:00:00")],
            &[],
            PeriodFilter::All,
            None,
        );
        assert_eq!(rows[0].rate, Decimal::ZERO);
        // Service and set bonus still accrue
        assert!(rows[0].net_owed > Decimal::ZERO);
        assert_eq!(rows[0].candidate_id, None);
    }

    #[test]
    fn test_rep_dashboard_buckets_and_pending() {
        let rep = candidate("77", "WORKING", dec!(15));
        let mut paid = record("77", "Dana Reeve", (2026, 3, 2), "1:00:00");
        paid.is_paid = true;
        let pending = record("77", "Dana Reeve", (2026, 3, 3), "2:00:00");
        let records = vec![paid, pending];

        let dash = reconciler().rep_dashboard(
            &records,
            &rep,
            RepBucket::Weekly,
            PeriodFilter::All,
        );
        // Both dates fall in the same week
        assert_eq!(dash.rows.len(), 1);
        assert!(!dash.rows[0].is_paid);

        assert_eq!(dash.stats.total_calls, 40);
        assert_eq!(dash.stats.paid_seconds, 5400);
        assert_eq!(dash.stats.pending_seconds, 9000);
        assert_eq!(dash.stats.pending_sets, 1);
        // WORKING pins the rate to 6: 2.5h * 6 + 1 * 20
        assert_eq!(dash.stats.pending_earnings, dec!(35));
    }

    #[test]
    fn test_client_summary_recomputes_from_records() {
        let mut c = candidate("77", "GOOD", dec!(10));
        c.name = "Dana Reeve".to_string();
        let mut r = record("77", "Dana Reeve", (2026, 3, 5), "1:30:00");
        r.number_of_sets = Some(3);

        let summary = reconciler().client_summary(&vec![r], &vec![c]);
        assert_eq!(summary.rows.len(), 1);
        assert_eq!(summary.rows[0].service_total, dec!(19));
        assert_eq!(summary.rows[0].net_owed, dec!(99));
        assert_eq!(summary.total_net_owed, dec!(99));
    }

    #[test]
    fn test_hour_stats_efficiency() {
        let c = candidate("77", "GOOD", dec!(10));
        // 1h talk, 30m wait -> 66.7% efficiency
        let records = vec![record("77", "Dana Reeve", (2026, 3, 5), "1:00:00")];

        let rows = reconciler().hour_stats(&records, &[c]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].active_seconds, 3600);
        assert_eq!(rows[0].total_seconds, 5400);
        assert_eq!(rows[0].efficiency_pct, dec!(66.7));
    }
}
