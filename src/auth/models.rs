use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// Portal roles. Admin and Payroll share the operator passcode table;
/// Client and Rep authenticate against their own rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Payroll,
    Client,
    Rep,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Payroll => "PAYROLL",
            Role::Client => "CLIENT",
            Role::Rep => "REP",
        }
    }
}

/// Shared Admin/Payroll operator secret. Compared by equality; when no row
/// matches, login fails closed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AdminAccess {
    pub id: Uuid,
    pub name: Option<String>,
    #[serde(skip_serializing)]
    pub passcode: String,
    pub created_at: DateTime<Utc>,
}
