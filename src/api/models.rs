use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::auth::Role;
use crate::directory::{Candidate, Client};
use crate::error::{AppError, AppResult};
use crate::reconcile::PeriodFilter;

/// Credentials for any role. Admin/Payroll and Client send a passcode,
/// Rep sends username + password.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub role: Role,
    pub passcode: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoginProfile {
    Operator { id: Uuid, name: Option<String> },
    Client(Client),
    Rep(Candidate),
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub role: Role,
    pub profile: LoginProfile,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PasscodeUpdateRequest {
    #[validate(length(min = 4, message = "passcode must be at least 4 characters"))]
    pub passcode: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Date window selector shared by the ledger, batcher, rep dashboard and
/// leaderboard endpoints.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    Daily,
    Range,
    All,
}

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub mode: Option<FilterMode>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub search: Option<String>,
}

impl PeriodQuery {
    /// Resolve the query into a `PeriodFilter`. Explicit modes demand
    /// their dates; with no mode, supplied dates narrow the window and
    /// nothing means everything.
    pub fn period(&self) -> AppResult<PeriodFilter> {
        match self.mode {
            Some(FilterMode::Daily) => {
                let day = self.start_date.ok_or_else(|| {
                    AppError::BadRequest("start_date is required for daily mode".to_string())
                })?;
                Ok(PeriodFilter::Day(day))
            }
            Some(FilterMode::Range) => {
                let start = self.start_date.ok_or_else(|| {
                    AppError::BadRequest("start_date is required for range mode".to_string())
                })?;
                let end = self.end_date.ok_or_else(|| {
                    AppError::BadRequest("end_date is required for range mode".to_string())
                })?;
                if end < start {
                    return Err(AppError::BadRequest(
                        "end_date must not precede start_date".to_string(),
                    ));
                }
                Ok(PeriodFilter::Range { start, end })
            }
            Some(FilterMode::All) => Ok(PeriodFilter::All),
            None => match (self.start_date, self.end_date) {
                (Some(start), Some(end)) if end >= start => {
                    Ok(PeriodFilter::Range { start, end })
                }
                (Some(_), Some(_)) => Err(AppError::BadRequest(
                    "end_date must not precede start_date".to_string(),
                )),
                (Some(day), None) => Ok(PeriodFilter::Day(day)),
                _ => Ok(PeriodFilter::All),
            },
        }
    }

    pub fn search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_daily_mode_requires_start() {
        let q = PeriodQuery {
            mode: Some(FilterMode::Daily),
            start_date: None,
            end_date: None,
            search: None,
        };
        assert!(q.period().is_err());

        let q = PeriodQuery {
            mode: Some(FilterMode::Daily),
            start_date: Some(d(2026, 3, 5)),
            end_date: None,
            search: None,
        };
        assert_eq!(q.period().unwrap(), PeriodFilter::Day(d(2026, 3, 5)));
    }

    #[test]
    fn test_range_mode_validates_order() {
        let q = PeriodQuery {
            mode: Some(FilterMode::Range),
            start_date: Some(d(2026, 3, 10)),
            end_date: Some(d(2026, 3, 1)),
            search: None,
        };
        assert!(q.period().is_err());
    }

    #[test]
    fn test_no_mode_infers_from_dates() {
        let q = PeriodQuery {
            mode: None,
            start_date: None,
            end_date: None,
            search: None,
        };
        assert_eq!(q.period().unwrap(), PeriodFilter::All);

        let q = PeriodQuery {
            mode: None,
            start_date: Some(d(2026, 3, 5)),
            end_date: None,
            search: None,
        };
        assert_eq!(q.period().unwrap(), PeriodFilter::Day(d(2026, 3, 5)));
    }

    #[test]
    fn test_search_is_trimmed_to_none() {
        let q = PeriodQuery {
            mode: None,
            start_date: None,
            end_date: None,
            search: Some("   ".to_string()),
        };
        assert_eq!(q.search(), None);
    }
}
