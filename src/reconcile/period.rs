//! Date filtering and period bucketing for the dashboard views.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Date window applied before aggregation (payroll ledger, leaderboard).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodFilter {
    Day(NaiveDate),
    Range { start: NaiveDate, end: NaiveDate },
    All,
}

impl PeriodFilter {
    pub fn contains(&self, date: NaiveDate) -> bool {
        match self {
            PeriodFilter::Day(day) => date == *day,
            PeriodFilter::Range { start, end } => date >= *start && date <= *end,
            PeriodFilter::All => true,
        }
    }
}

/// Grouping granularity for the rep dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepBucket {
    Daily,
    Weekly,
    BiWeekly,
    Monthly,
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - chrono::Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

/// Human-readable bucket label for a record date. Labels are built to sort
/// lexicographically within a bucket family where it matters (daily uses
/// ISO dates, weekly embeds the ISO Monday).
pub fn bucket_label(date: NaiveDate, bucket: RepBucket) -> String {
    match bucket {
        RepBucket::Daily => date.format("%Y-%m-%d").to_string(),
        RepBucket::Weekly => format!("Week of {}", week_start(date).format("%Y-%m-%d")),
        RepBucket::BiWeekly => {
            let fortnight = date.day() / 14 + 1;
            format!("Fortnight {}, {}", fortnight, month_label(date))
        }
        RepBucket::Monthly => month_label(date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_period_filter() {
        let day = PeriodFilter::Day(d(2026, 3, 5));
        assert!(day.contains(d(2026, 3, 5)));
        assert!(!day.contains(d(2026, 3, 6)));

        let range = PeriodFilter::Range {
            start: d(2026, 3, 1),
            end: d(2026, 3, 31),
        };
        assert!(range.contains(d(2026, 3, 1)));
        assert!(range.contains(d(2026, 3, 31)));
        assert!(!range.contains(d(2026, 4, 1)));

        assert!(PeriodFilter::All.contains(d(1999, 1, 1)));
    }

    #[test]
    fn test_week_start_is_monday() {
        // 2026-03-05 is a Thursday
        assert_eq!(week_start(d(2026, 3, 5)), d(2026, 3, 2));
        // A Monday maps to itself
        assert_eq!(week_start(d(2026, 3, 2)), d(2026, 3, 2));
        // Sunday belongs to the week started six days earlier
        assert_eq!(week_start(d(2026, 3, 8)), d(2026, 3, 2));
    }

    #[test]
    fn test_bucket_labels() {
        assert_eq!(bucket_label(d(2026, 3, 5), RepBucket::Daily), "2026-03-05");
        assert_eq!(
            bucket_label(d(2026, 3, 5), RepBucket::Weekly),
            "Week of 2026-03-02"
        );
        assert_eq!(
            bucket_label(d(2026, 3, 5), RepBucket::Monthly),
            "March 2026"
        );
    }

    #[test]
    fn test_fortnight_boundaries() {
        assert_eq!(
            bucket_label(d(2026, 3, 1), RepBucket::BiWeekly),
            "Fortnight 1, March 2026"
        );
        assert_eq!(
            bucket_label(d(2026, 3, 13), RepBucket::BiWeekly),
            "Fortnight 1, March 2026"
        );
        assert_eq!(
            bucket_label(d(2026, 3, 14), RepBucket::BiWeekly),
            "Fortnight 2, March 2026"
        );
        assert_eq!(
            bucket_label(d(2026, 3, 31), RepBucket::BiWeekly),
            "Fortnight 3, March 2026"
        );
    }
}
