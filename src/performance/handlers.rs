use axum::{
    extract::{Path, Query, State},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::api::models::{FilterMode, PeriodQuery};
use crate::api::AppState;
use crate::error::{AppError, AppResult};
use crate::reconcile::engine::{LedgerRow, RepBatchSummary, RepDashboard};
use crate::reconcile::RepBucket;

/// Payroll ledger payload: aggregated rows plus the running net-payables
/// figure for the same window.
#[derive(Debug, Serialize)]
pub struct LedgerResponse {
    pub rows: Vec<LedgerRow>,
    #[serde(with = "rust_decimal::serde::float")]
    pub net_payables: Decimal,
}

/// GET /payroll/ledger
pub async fn payroll_ledger(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> AppResult<Json<LedgerResponse>> {
    let filter = query.period()?;
    let records = state.performance.list_all().await?;
    let candidates = state.directory.list_candidates().await?;

    let rows = state
        .reconciler
        .ledger(&records, &candidates, filter, query.search());
    let net_payables =
        state
            .reconciler
            .net_payables(&records, &candidates, filter, query.search());

    Ok(Json(LedgerResponse { rows, net_payables }))
}

/// GET /payroll/batcher: the unbatched selection pool, one row per record.
pub async fn payroll_batcher(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> AppResult<Json<Vec<LedgerRow>>> {
    let filter = query.period()?;
    let records = state.performance.list_all().await?;
    let candidates = state.directory.list_candidates().await?;

    let rows = state
        .reconciler
        .batcher_pool(&records, &candidates, filter, query.search());

    Ok(Json(rows))
}

#[derive(Debug, Deserialize, Validate)]
pub struct AdjustmentsRequest {
    #[validate(range(min = 0, message = "sets cannot be negative"))]
    pub number_of_sets: i32,
    pub meeting_hours: Decimal,
    pub break_hours: Decimal,
}

/// PUT /payroll/records/:id/adjustments
pub async fn update_adjustments(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
    Json(request): Json<AdjustmentsRequest>,
) -> AppResult<Json<serde_json::Value>> {
    request.validate()?;
    if request.meeting_hours < Decimal::ZERO || request.break_hours < Decimal::ZERO {
        return Err(AppError::InvalidInput(
            "adjustment hours cannot be negative".to_string(),
        ));
    }

    let updated = state
        .performance
        .update_adjustments(
            record_id,
            request.number_of_sets,
            request.meeting_hours,
            request.break_hours,
        )
        .await?;

    if updated == 0 {
        return Err(AppError::NotFound(format!(
            "Unpaid performance record not found: {}",
            record_id
        )));
    }

    info!("Adjustments updated for record {}", record_id);
    Ok(Json(serde_json::json!({ "updated": true })))
}

#[derive(Debug, Deserialize)]
pub struct RepDashboardQuery {
    pub bucket: Option<RepBucket>,
    pub mode: Option<FilterMode>,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
}

impl RepDashboardQuery {
    fn period_query(&self) -> PeriodQuery {
        PeriodQuery {
            mode: self.mode,
            start_date: self.start_date,
            end_date: self.end_date,
            search: None,
        }
    }
}

/// GET /reps/:agent_id/dashboard
pub async fn rep_dashboard(
    State(state): State<AppState>,
    Path(agent_id): Path<String>,
    Query(query): Query<RepDashboardQuery>,
) -> AppResult<Json<RepDashboard>> {
    let rep = state
        .directory
        .get_candidate_by_sync_identity(&agent_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Rep not found: {}", agent_id)))?;

    let records = state.performance.list_by_agent(&agent_id).await?;
    let dashboard = state.reconciler.rep_dashboard(
        &records,
        &rep,
        query.bucket.unwrap_or(RepBucket::Daily),
        query.period_query().period()?,
    );

    Ok(Json(dashboard))
}

/// GET /reps/:agent_id/history: settled disbursements grouped by batch.
pub async fn rep_history(
    State(state): State<AppState>,
    Path(agent_id): Path<String>,
) -> AppResult<Json<Vec<RepBatchSummary>>> {
    let rep = state
        .directory
        .get_candidate_by_sync_identity(&agent_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Rep not found: {}", agent_id)))?;

    let records = state.performance.list_by_agent(&agent_id).await?;
    let history = state.reconciler.rep_paid_history(&records, &rep);

    Ok(Json(history))
}
