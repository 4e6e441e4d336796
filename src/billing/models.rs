use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::Type;
use uuid::Uuid;

/// Batch status enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "batch_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    PendingPayment,
    Paid,
}

impl BatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::PendingPayment => "pending_payment",
            BatchStatus::Paid => "paid",
        }
    }

    /// Paid is terminal: no settlement, no cancellation.
    pub fn can_settle(&self) -> bool {
        matches!(self, BatchStatus::PendingPayment)
    }

    pub fn can_cancel(&self) -> bool {
        matches!(self, BatchStatus::PendingPayment)
    }
}

/// A payroll-to-client invoice grouping one or more sync records for
/// settlement. `total_amount` is fixed at creation time from the derived
/// net-owed of the selected records.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PaymentBatch {
    pub id: Uuid,
    pub client_id: Uuid,
    pub batch_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub status: BatchStatus,
    pub created_at: DateTime<Utc>,
}

/// Append-only settlement log entry. Informational; never read back into
/// engine state.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PaymentHistoryEntry {
    pub id: Uuid,
    pub client_id: Uuid,
    pub batch_id: Uuid,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub paid_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paid_is_terminal() {
        assert!(BatchStatus::PendingPayment.can_settle());
        assert!(BatchStatus::PendingPayment.can_cancel());
        assert!(!BatchStatus::Paid.can_settle());
        assert!(!BatchStatus::Paid.can_cancel());
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(BatchStatus::PendingPayment.as_str(), "pending_payment");
        assert_eq!(BatchStatus::Paid.as_str(), "paid");
    }
}
