use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// A staffing candidate / working rep. Owned by Admin; the reconciliation
/// engine reads only the status and rate fields.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Candidate {
    pub id: Uuid,
    /// External dialer identity. Sync records reference this when present,
    /// otherwise the candidate id itself.
    pub agent_id: Option<String>,
    pub client_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub role: String,
    pub whatsapp_number: String,
    pub resume_link: String,
    pub recording_link: String,
    /// Free-form in the store; interpreted through `CandidateStatus`.
    pub status: String,
    pub show_phone_to_client: bool,
    #[serde(with = "rust_decimal::serde::float")]
    pub rate_per_hour: Decimal,
    pub alias: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Employment pipeline status. Stored as text; unknown values read as
/// `Pending` so a stray status never breaks rate resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CandidateStatus {
    Pending,
    Good,
    Bad,
    Training,
    Shortlisted,
    Working,
    Preparation,
    Probation,
    Rejected,
}

impl CandidateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateStatus::Pending => "PENDING",
            CandidateStatus::Good => "GOOD",
            CandidateStatus::Bad => "BAD",
            CandidateStatus::Training => "TRAINING",
            CandidateStatus::Shortlisted => "SHORTLISTED",
            CandidateStatus::Working => "WORKING",
            CandidateStatus::Preparation => "PREPARATION",
            CandidateStatus::Probation => "PROBATION",
            CandidateStatus::Rejected => "REJECTED",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "GOOD" => CandidateStatus::Good,
            "BAD" => CandidateStatus::Bad,
            "TRAINING" => CandidateStatus::Training,
            "SHORTLISTED" => CandidateStatus::Shortlisted,
            "WORKING" => CandidateStatus::Working,
            "PREPARATION" => CandidateStatus::Preparation,
            "PROBATION" => CandidateStatus::Probation,
            "REJECTED" => CandidateStatus::Rejected,
            _ => CandidateStatus::Pending,
        }
    }
}

impl Candidate {
    pub fn employment_status(&self) -> CandidateStatus {
        CandidateStatus::from_str(&self.status)
    }

    /// The identity sync records carry for this candidate.
    pub fn sync_identity(&self) -> String {
        self.agent_id
            .clone()
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| self.id.to_string())
    }
}

/// A client account the portal invoices on behalf of.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub access_code: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for s in [
            CandidateStatus::Pending,
            CandidateStatus::Good,
            CandidateStatus::Working,
            CandidateStatus::Probation,
        ] {
            assert_eq!(CandidateStatus::from_str(s.as_str()), s);
        }
    }

    #[test]
    fn test_status_is_case_insensitive_with_fallback() {
        assert_eq!(CandidateStatus::from_str(" working "), CandidateStatus::Working);
        assert_eq!(CandidateStatus::from_str("good"), CandidateStatus::Good);
        assert_eq!(CandidateStatus::from_str("N/A"), CandidateStatus::Pending);
        assert_eq!(CandidateStatus::from_str(""), CandidateStatus::Pending);
    }
}
