use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::models::{rank, LeaderboardRow, SnapshotRow};
use crate::api::models::PeriodQuery;
use crate::api::AppState;
use crate::error::AppResult;
use crate::reconcile::PeriodFilter;

/// GET /leaderboard: public, unauthenticated ranking of calls and sets.
pub async fn get_board(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> AppResult<Json<Vec<LeaderboardRow>>> {
    let filter = query.period()?;
    let records = state.performance.list_all().await?;

    Ok(Json(rank(
        &records,
        filter,
        &state.config.excluded_sync_names,
    )))
}

#[derive(Debug, Deserialize)]
pub struct SnapshotRequest {
    /// The board date to freeze; rankings are computed over that single day.
    pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub date: NaiveDate,
    pub rows_saved: u64,
}

/// POST /leaderboard/snapshot
pub async fn save_snapshot(
    State(state): State<AppState>,
    Json(request): Json<SnapshotRequest>,
) -> AppResult<Json<SnapshotResponse>> {
    let records = state.performance.list_all().await?;
    let board = rank(
        &records,
        PeriodFilter::Day(request.date),
        &state.config.excluded_sync_names,
    );

    let rows_saved = state
        .leaderboard
        .insert_snapshot(request.date, &board)
        .await?;

    info!(
        "Leaderboard snapshot saved for {} ({} rows)",
        request.date, rows_saved
    );
    Ok(Json(SnapshotResponse {
        date: request.date,
        rows_saved,
    }))
}

/// GET /leaderboard/history
pub async fn history(State(state): State<AppState>) -> AppResult<Json<Vec<SnapshotRow>>> {
    let rows = state.leaderboard.list_history().await?;
    Ok(Json(rows))
}
