//! Rate resolution and the owed-amount formulas.
//!
//! Every monetary figure in the portal is derived here from the same
//! inputs: billable hours (work + meetings + breaks), completed sets, and
//! the agent's effective hourly rate. Derived amounts are never persisted;
//! views recompute on every read.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::directory::CandidateStatus;

/// Flat hourly component of the service charge.
const SERVICE_HOURLY: Decimal = dec!(2);
/// Service charge per completed set.
const SERVICE_PER_SET: Decimal = dec!(5);
/// Agent bonus per completed set.
const SET_BONUS: Decimal = dec!(20);
/// Fixed rate while in training or on probation.
const TRAINING_RATE: Decimal = dec!(5);
/// Fixed rate for agents placed with a client.
const WORKING_RATE: Decimal = dec!(6);

const SECONDS_PER_HOUR: Decimal = dec!(3600);

/// Inputs to the earnings formulas for one aggregate row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EarningsInput {
    pub work_seconds: i64,
    pub meeting_hours: Decimal,
    pub break_hours: Decimal,
    pub sets: i64,
}

/// Derived amounts for one aggregate row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Earnings {
    /// The facilitation charge layered on top of agent hours and sets,
    /// independent of the agent's own rate.
    pub service_total: Decimal,
    /// The agent's own compensation: billable hours at the effective rate
    /// plus the per-set bonus.
    pub agent_pay: Decimal,
    /// What the client ultimately owes: agent pay plus the service charge.
    pub net_owed: Decimal,
}

impl EarningsInput {
    /// Billable hours: work time plus meeting and break adjustments.
    pub fn billable_hours(&self) -> Decimal {
        Decimal::from(self.work_seconds) / SECONDS_PER_HOUR
            + self.meeting_hours
            + self.break_hours
    }
}

/// Effective hourly rate from employment status.
///
/// TRAINING and PROBATION pin the rate regardless of the configured value;
/// WORKING uses the placed-agent rate; everything else falls back to the
/// candidate's configured `rate_per_hour`. An unresolvable candidate
/// yields a zero rate rather than an error.
pub fn effective_rate(status: Option<CandidateStatus>, rate_per_hour: Option<Decimal>) -> Decimal {
    match status {
        Some(CandidateStatus::Training) | Some(CandidateStatus::Probation) => TRAINING_RATE,
        Some(CandidateStatus::Working) => WORKING_RATE,
        _ => rate_per_hour.unwrap_or(Decimal::ZERO),
    }
}

/// `(hours) * 2 + sets * 5`
pub fn service_total(input: &EarningsInput) -> Decimal {
    input.billable_hours() * SERVICE_HOURLY + Decimal::from(input.sets) * SERVICE_PER_SET
}

/// `(hours) * rate + sets * 20`
pub fn agent_pay(input: &EarningsInput, rate: Decimal) -> Decimal {
    input.billable_hours() * rate + Decimal::from(input.sets) * SET_BONUS
}

/// Full derivation for one row. `net_owed = agent_pay + service_total`.
pub fn compute(input: &EarningsInput, rate: Decimal) -> Earnings {
    let service = service_total(input);
    let pay = agent_pay(input, rate);
    Earnings {
        service_total: service,
        agent_pay: pay,
        net_owed: pay + service,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rate_resolution() {
        // Pinned statuses ignore the configured rate
        assert_eq!(
            effective_rate(Some(CandidateStatus::Training), Some(dec!(12))),
            dec!(5)
        );
        assert_eq!(
            effective_rate(Some(CandidateStatus::Probation), Some(dec!(12))),
            dec!(5)
        );
        assert_eq!(
            effective_rate(Some(CandidateStatus::Working), Some(dec!(12))),
            dec!(6)
        );
        // Everyone else keeps theirs
        assert_eq!(
            effective_rate(Some(CandidateStatus::Good), Some(dec!(12))),
            dec!(12)
        );
        // Unknown candidate defaults to zero rather than failing
        assert_eq!(effective_rate(None, None), Decimal::ZERO);
    }

    #[test]
    fn test_formula_worked_example() {
        // H=2, Mt=0, Bk=0, S=3, R=10
        let input = EarningsInput {
            work_seconds: 7200,
            meeting_hours: dec!(0),
            break_hours: dec!(0),
            sets: 3,
        };
        let earned = compute(&input, dec!(10));

        // service = 2*2 + 3*5 = 19
        assert_eq!(earned.service_total, dec!(19));
        // net = 2*10 + 3*20 + 19 = 99
        assert_eq!(earned.agent_pay, dec!(80));
        assert_eq!(earned.net_owed, dec!(99));
    }

    #[test]
    fn test_adjustment_hours_count_as_billable() {
        let input = EarningsInput {
            work_seconds: 3600,
            meeting_hours: dec!(1.5),
            break_hours: dec!(0.5),
            sets: 0,
        };
        assert_eq!(input.billable_hours(), dec!(3));
        assert_eq!(service_total(&input), dec!(6));
        assert_eq!(agent_pay(&input, dec!(8)), dec!(24));
    }

    #[test]
    fn test_net_dominates_service_for_nonnegative_inputs() {
        let cases = [
            (0i64, dec!(0), dec!(0), 0i64, dec!(0)),
            (5400, dec!(1), dec!(0.5), 2, dec!(7.5)),
            (86_400, dec!(0), dec!(0), 10, dec!(6)),
        ];
        for (secs, mt, bk, sets, rate) in cases {
            let input = EarningsInput {
                work_seconds: secs,
                meeting_hours: mt,
                break_hours: bk,
                sets,
            };
            let earned = compute(&input, rate);
            assert!(earned.service_total >= Decimal::ZERO);
            assert!(earned.net_owed >= earned.service_total);
        }
    }

    #[test]
    fn test_zero_rate_still_accrues_service_and_bonus() {
        let input = EarningsInput {
            work_seconds: 3600,
            meeting_hours: dec!(0),
            break_hours: dec!(0),
            sets: 1,
        };
        let earned = compute(&input, Decimal::ZERO);
        assert_eq!(earned.service_total, dec!(7));
        assert_eq!(earned.agent_pay, dec!(20));
        assert_eq!(earned.net_owed, dec!(27));
    }
}
