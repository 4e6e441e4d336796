use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::models::{PaymentBatch, PaymentHistoryEntry};
use crate::api::AppState;
use crate::error::{AppResult, BatchError};
use crate::reconcile::engine::BatchLine;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBatchRequest {
    pub client_id: Uuid,
    #[validate(length(min = 1, message = "select at least one record"))]
    pub record_ids: Vec<Uuid>,
    pub batch_name: Option<String>,
}

/// POST /payroll/batches
pub async fn create_batch(
    State(state): State<AppState>,
    Json(request): Json<CreateBatchRequest>,
) -> AppResult<Json<PaymentBatch>> {
    request.validate()?;

    let batch = state
        .billing_engine
        .create_batch(request.client_id, &request.record_ids, request.batch_name)
        .await?;

    Ok(Json(batch))
}

/// GET /payroll/batches: batches still awaiting client settlement.
pub async fn pending_batches(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<PaymentBatch>>> {
    let batches = state.billing.list_pending().await?;
    Ok(Json(batches))
}

#[derive(Debug, Serialize)]
pub struct CancelBatchResponse {
    pub batch_id: Uuid,
    pub released_records: u64,
}

/// DELETE /payroll/batches/:id
pub async fn cancel_batch(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
) -> AppResult<Json<CancelBatchResponse>> {
    let released = state.billing_engine.cancel_batch(batch_id).await?;

    Ok(Json(CancelBatchResponse {
        batch_id,
        released_records: released,
    }))
}

/// GET /clients/:client_id/batches: pending and settled, newest first.
pub async fn client_batches(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> AppResult<Json<Vec<PaymentBatch>>> {
    let batches = state.billing.list_by_client(client_id).await?;
    Ok(Json(batches))
}

#[derive(Debug, Serialize)]
pub struct BatchDetailResponse {
    pub batch: PaymentBatch,
    pub lines: Vec<BatchLine>,
}

/// GET /clients/:client_id/batches/:batch_id: per-record composition.
pub async fn client_batch_detail(
    State(state): State<AppState>,
    Path((client_id, batch_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<BatchDetailResponse>> {
    let batch = state
        .billing
        .get_batch(batch_id)
        .await?
        .ok_or(BatchError::NotFound(batch_id))?;
    if batch.client_id != client_id {
        return Err(BatchError::WrongClient(batch_id).into());
    }

    let records = state.performance.list_by_batch(batch_id).await?;
    let candidates = state.directory.list_candidates().await?;
    let lines = state.reconciler.batch_composition(&records, &candidates);

    Ok(Json(BatchDetailResponse { batch, lines }))
}

/// POST /clients/:client_id/batches/:batch_id/settle
pub async fn settle_batch(
    State(state): State<AppState>,
    Path((client_id, batch_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<PaymentBatch>> {
    info!("Client {} settling batch {}", client_id, batch_id);
    let batch = state.billing_engine.settle_batch(batch_id, client_id).await?;
    Ok(Json(batch))
}

#[derive(Debug, Serialize)]
pub struct PaymentsResponse {
    pub history: Vec<PaymentHistoryEntry>,
    /// Settled batches are listed alongside the history log: the log is
    /// best-effort, so a batch can be paid without a matching entry.
    pub paid_batches: Vec<PaymentBatch>,
}

/// GET /clients/:client_id/payments
pub async fn client_payments(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> AppResult<Json<PaymentsResponse>> {
    let history = state.billing.list_history(client_id).await?;
    let paid_batches = state
        .billing
        .list_by_client(client_id)
        .await?
        .into_iter()
        .filter(|b| !b.status.can_settle())
        .collect();

    Ok(Json(PaymentsResponse {
        history,
        paid_batches,
    }))
}
