use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use super::models::{
    HealthResponse, LoginProfile, LoginRequest, LoginResponse, PasscodeUpdateRequest,
};
use crate::auth::{AccessRepository, Role};
use crate::billing::{BillingEngine, BillingRepository};
use crate::config::Config;
use crate::directory::DirectoryRepository;
use crate::error::{AppError, AppResult, AuthError};
use crate::leaderboard::LeaderboardRepository;
use crate::performance::PerformanceRepository;
use crate::reconcile::Reconciler;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub directory: Arc<DirectoryRepository>,
    pub performance: Arc<PerformanceRepository>,
    pub billing: Arc<BillingRepository>,
    pub access: Arc<AccessRepository>,
    pub leaderboard: Arc<LeaderboardRepository>,
    pub reconciler: Arc<Reconciler>,
    pub billing_engine: Arc<BillingEngine>,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// POST /auth/login
///
/// Fails closed for every role: no credential row, no access. Error
/// messages are role-specific but never say whether the identifier exists.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let role = request.role;

    let profile = match role {
        Role::Admin | Role::Payroll => {
            let passcode = required(request.passcode, "passcode")?;
            match state.access.find_by_passcode(&passcode).await? {
                Some(access) => LoginProfile::Operator {
                    id: access.id,
                    name: access.name,
                },
                None => {
                    warn!("Rejected {} login attempt", role.as_str());
                    return Err(AuthError::InvalidPasscode {
                        role: role.as_str().to_string(),
                    }
                    .into());
                }
            }
        }
        Role::Client => {
            let access_code = required(request.passcode, "passcode")?;
            match state.directory.find_client_by_access_code(&access_code).await? {
                Some(client) => LoginProfile::Client(client),
                None => {
                    warn!("Rejected client login attempt");
                    return Err(AuthError::InvalidAccessCode.into());
                }
            }
        }
        Role::Rep => {
            let username = required(request.username, "username")?;
            let password = required(request.password, "password")?;
            match state
                .directory
                .find_candidate_by_credentials(&username, &password)
                .await?
            {
                Some(candidate) => LoginProfile::Rep(candidate),
                None => {
                    warn!("Rejected rep login attempt");
                    return Err(AuthError::InvalidCredentials.into());
                }
            }
        }
    };

    info!("{} login succeeded", role.as_str());
    Ok(Json(LoginResponse { role, profile }))
}

/// PUT /admin/access/payroll: rotate the shared operator passcode.
pub async fn update_payroll_passcode(
    State(state): State<AppState>,
    Json(request): Json<PasscodeUpdateRequest>,
) -> AppResult<Json<serde_json::Value>> {
    request.validate()?;

    let access = state.access.upsert_passcode(&request.passcode).await?;
    info!("Operator passcode rotated ({})", access.id);

    Ok(Json(serde_json::json!({ "updated": true })))
}

fn required(value: Option<String>, field: &str) -> AppResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::InvalidInput(format!("{} is required", field)))
}
