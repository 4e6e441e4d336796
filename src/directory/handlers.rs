use axum::{
    extract::{Path, Query, State},
    Json,
};
use rand::{distr::Alphanumeric, Rng};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::models::{Candidate, CandidateStatus, Client};
use super::repository::CandidateDraft;
use crate::api::AppState;
use crate::error::{AppError, AppResult};
use crate::reconcile::engine::{AgentHoursRow, ClientSummary};

#[derive(Debug, Deserialize, Validate)]
pub struct CandidateRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub whatsapp_number: String,
    #[serde(default)]
    pub resume_link: String,
    #[serde(default)]
    pub recording_link: String,
    pub agent_id: Option<String>,
    pub client_id: Option<Uuid>,
    pub rate_per_hour: Option<Decimal>,
    pub alias: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CandidateRequest {
    fn draft(&self) -> AppResult<CandidateDraft> {
        let rate = self.rate_per_hour.unwrap_or(Decimal::ZERO);
        if rate < Decimal::ZERO {
            return Err(AppError::InvalidInput(
                "rate_per_hour cannot be negative".to_string(),
            ));
        }

        Ok(CandidateDraft {
            agent_id: self.agent_id.clone(),
            client_id: self.client_id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
            whatsapp_number: self.whatsapp_number.clone(),
            resume_link: self.resume_link.clone(),
            recording_link: self.recording_link.clone(),
            rate_per_hour: rate,
            alias: self.alias.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
        })
    }
}

/// GET /admin/candidates
pub async fn list_candidates(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Candidate>>> {
    let candidates = state.directory.list_candidates().await?;
    Ok(Json(candidates))
}

/// POST /admin/candidates
pub async fn create_candidate(
    State(state): State<AppState>,
    Json(request): Json<CandidateRequest>,
) -> AppResult<Json<Candidate>> {
    request.validate()?;
    let candidate = state.directory.create_candidate(&request.draft()?).await?;
    info!("Candidate created: {}", candidate.id);
    Ok(Json(candidate))
}

/// PUT /admin/candidates/:id
pub async fn update_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CandidateRequest>,
) -> AppResult<Json<Candidate>> {
    request.validate()?;
    let candidate = state
        .directory
        .update_candidate(id, &request.draft()?)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate not found: {}", id)))?;
    Ok(Json(candidate))
}

/// DELETE /admin/candidates/:id
pub async fn delete_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let deleted = state.directory.delete_candidate(id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound(format!("Candidate not found: {}", id)));
    }
    info!("Candidate deleted: {}", id);
    Ok(Json(serde_json::json!({ "deleted": true })))
}

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub alias: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// PUT /payroll/candidates/:id/credentials: rep portal access override.
pub async fn update_candidate_credentials(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CredentialsRequest>,
) -> AppResult<Json<Candidate>> {
    let candidate = state
        .directory
        .update_candidate_credentials(
            id,
            request.alias.as_deref(),
            request.username.as_deref(),
            request.password.as_deref(),
        )
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate not found: {}", id)))?;

    info!("Rep access updated for candidate {}", id);
    Ok(Json(candidate))
}

#[derive(Debug, Deserialize, Validate)]
pub struct ClientRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    /// Generated server-side when omitted.
    pub access_code: Option<String>,
}

/// GET /admin/clients
pub async fn list_clients(State(state): State<AppState>) -> AppResult<Json<Vec<Client>>> {
    let clients = state.directory.list_clients().await?;
    Ok(Json(clients))
}

/// POST /admin/clients
pub async fn create_client(
    State(state): State<AppState>,
    Json(request): Json<ClientRequest>,
) -> AppResult<Json<Client>> {
    request.validate()?;

    let access_code = request
        .access_code
        .clone()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(generate_access_code);

    let client = state
        .directory
        .create_client(
            &request.name,
            &request.email,
            &request.phone_number,
            &access_code,
        )
        .await?;
    info!("Client created: {}", client.id);
    Ok(Json(client))
}

/// PUT /admin/clients/:id
pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ClientRequest>,
) -> AppResult<Json<Client>> {
    request.validate()?;

    let access_code = request
        .access_code
        .clone()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(generate_access_code);

    let client = state
        .directory
        .update_client(
            id,
            &request.name,
            &request.email,
            &request.phone_number,
            &access_code,
        )
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Client not found: {}", id)))?;
    Ok(Json(client))
}

/// DELETE /admin/clients/:id: unassigns the client's candidates first.
pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let deleted = state.directory.delete_client(id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound(format!("Client not found: {}", id)));
    }
    info!("Client deleted: {}", id);
    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// GET /admin/hours: talk-vs-total analytics, no currency.
pub async fn admin_hours(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<AgentHoursRow>>> {
    let records = state.performance.list_all().await?;
    let candidates = state.directory.list_candidates().await?;
    Ok(Json(state.reconciler.hour_stats(&records, &candidates)))
}

#[derive(Debug, Deserialize)]
pub struct PipelineQuery {
    pub status: Option<String>,
    pub search: Option<String>,
}

/// GET /clients/:client_id/pipeline
pub async fn client_pipeline(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
    Query(query): Query<PipelineQuery>,
) -> AppResult<Json<Vec<Candidate>>> {
    let candidates = state.directory.list_candidates_for_client(client_id).await?;

    let status_filter = query
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("all"))
        .map(CandidateStatus::from_str);
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let filtered = candidates
        .into_iter()
        .filter(|c| match status_filter {
            Some(status) => c.employment_status() == status,
            None => true,
        })
        .filter(|c| match &search {
            Some(term) => c.name.to_lowercase().contains(term),
            None => true,
        })
        .collect();

    Ok(Json(filtered))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

/// Statuses a client may set from the pipeline view.
const CLIENT_SETTABLE: &[CandidateStatus] = &[
    CandidateStatus::Good,
    CandidateStatus::Rejected,
    CandidateStatus::Training,
    CandidateStatus::Probation,
    CandidateStatus::Working,
];

/// PUT /clients/:client_id/candidates/:id/status
pub async fn client_update_status(
    State(state): State<AppState>,
    Path((client_id, candidate_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<StatusUpdateRequest>,
) -> AppResult<Json<Candidate>> {
    let status = CandidateStatus::from_str(&request.status);
    if !CLIENT_SETTABLE.contains(&status) {
        return Err(AppError::InvalidInput(format!(
            "status {} cannot be set from the pipeline view",
            request.status
        )));
    }

    let candidate = state
        .directory
        .get_candidate(candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate not found: {}", candidate_id)))?;
    if candidate.client_id != Some(client_id) {
        return Err(AppError::BadRequest(
            "candidate is not assigned to this client".to_string(),
        ));
    }

    let updated = state
        .directory
        .update_candidate_status(candidate_id, status.as_str())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate not found: {}", candidate_id)))?;

    info!(
        "Candidate {} status set to {} by client {}",
        candidate_id,
        status.as_str(),
        client_id
    );
    Ok(Json(updated))
}

/// GET /clients/:client_id/summary: per-candidate totals recomputed from
/// the sync history on every read.
pub async fn client_summary(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> AppResult<Json<ClientSummary>> {
    let candidates = state.directory.list_candidates_for_client(client_id).await?;
    let records = state.performance.list_all().await?;

    Ok(Json(state.reconciler.client_summary(&records, &candidates)))
}

fn generate_access_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect::<String>()
        .to_uppercase()
}
