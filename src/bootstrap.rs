use std::{sync::Arc, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::{
    api::AppState,
    auth::AccessRepository,
    billing::{BillingEngine, BillingRepository},
    config::Config,
    directory::DirectoryRepository,
    error::AppResult,
    leaderboard::LeaderboardRepository,
    performance::PerformanceRepository,
    reconcile::{ReconcileConfig, Reconciler},
};

pub async fn initialize_app_state(config: Config) -> AppResult<AppState> {
    info!("Initializing application components ...");

    let pool = initialize_database(&config.database_url).await?;

    // Repositories
    let directory = Arc::new(DirectoryRepository::new(pool.clone()));
    let performance = Arc::new(PerformanceRepository::new(pool.clone()));
    let billing = Arc::new(BillingRepository::new(pool.clone()));
    let access = Arc::new(AccessRepository::new(pool.clone()));
    let leaderboard = Arc::new(LeaderboardRepository::new(pool.clone()));
    info!("Repositories initialized");

    // Reconciliation engine
    let reconciler = Arc::new(Reconciler::new(ReconcileConfig {
        excluded_names: config.excluded_sync_names.clone(),
    }));
    if !config.excluded_sync_names.is_empty() {
        info!(
            "Excluding {} non-agent sync names from aggregation",
            config.excluded_sync_names.len()
        );
    }

    // Batch lifecycle engine
    let billing_engine = Arc::new(BillingEngine::new(
        billing.clone(),
        performance.clone(),
        directory.clone(),
    ));
    info!("Reconciliation and billing engines initialized");

    Ok(AppState {
        config: Arc::new(config),
        directory,
        performance,
        billing,
        access,
        leaderboard,
        reconciler,
        billing_engine,
    })
}

async fn initialize_database(database_url: &str) -> AppResult<PgPool> {
    info!("Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(50)
        .min_connections(5)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(database_url)
        .await?;

    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    info!("Database initialized");
    Ok(pool)
}
