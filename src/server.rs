use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing::info;

use crate::{
    api::handlers::{health_check, login, update_payroll_passcode, AppState},
    billing::handlers::{
        cancel_batch, client_batch_detail, client_batches, client_payments, create_batch,
        pending_batches, settle_batch,
    },
    directory::handlers::{
        admin_hours, client_pipeline, client_summary, client_update_status, create_candidate,
        create_client, delete_candidate, delete_client, list_candidates, list_clients,
        update_candidate, update_candidate_credentials, update_client,
    },
    leaderboard::handlers::{get_board, history as leaderboard_history, save_snapshot},
    middleware::create_cors_layer,
    performance::handlers::{
        payroll_batcher, payroll_ledger, rep_dashboard, rep_history, update_adjustments,
    },
};

pub async fn create_app(state: AppState) -> Router {
    info!("Setting up HTTP routes...");

    let cors = create_cors_layer(&state.config.allowed_origins);

    let app = Router::new()
        // Public health check endpoint
        .route("/health", get(health_check))
        // Public leaderboard, served without authentication
        .route("/leaderboard", get(get_board))
        .route("/leaderboard/snapshot", post(save_snapshot))
        .route("/leaderboard/history", get(leaderboard_history))
        .nest(
            "/api/v1",
            Router::new()
                // Authentication
                .route("/auth/login", post(login))
                // Admin: directory management
                .route("/admin/candidates", get(list_candidates).post(create_candidate))
                .route(
                    "/admin/candidates/:id",
                    put(update_candidate).delete(delete_candidate),
                )
                .route("/admin/clients", get(list_clients).post(create_client))
                .route("/admin/clients/:id", put(update_client).delete(delete_client))
                .route("/admin/hours", get(admin_hours))
                .route("/admin/access/payroll", put(update_payroll_passcode))
                // Payroll: reconciliation and batching
                .route("/payroll/ledger", get(payroll_ledger))
                .route("/payroll/batcher", get(payroll_batcher))
                .route("/payroll/records/:id/adjustments", put(update_adjustments))
                .route(
                    "/payroll/candidates/:id/credentials",
                    put(update_candidate_credentials),
                )
                .route("/payroll/batches", get(pending_batches).post(create_batch))
                .route("/payroll/batches/:id", delete(cancel_batch))
                // Client: pipeline, summary, settlements
                .route("/clients/:client_id/pipeline", get(client_pipeline))
                .route(
                    "/clients/:client_id/candidates/:id/status",
                    put(client_update_status),
                )
                .route("/clients/:client_id/summary", get(client_summary))
                .route("/clients/:client_id/batches", get(client_batches))
                .route(
                    "/clients/:client_id/batches/:batch_id",
                    get(client_batch_detail),
                )
                .route(
                    "/clients/:client_id/batches/:batch_id/settle",
                    post(settle_batch),
                )
                .route("/clients/:client_id/payments", get(client_payments))
                // Rep: own dashboard and disbursement history
                .route("/reps/:agent_id/dashboard", get(rep_dashboard))
                .route("/reps/:agent_id/history", get(rep_history)),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        )
        .with_state(state);

    info!("HTTP routes configured");
    app
}

pub async fn run_server(app: Router, bind_address: &str) -> Result<(), Box<dyn std::error::Error>> {
    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    info!("Server listening on: {}", bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}
