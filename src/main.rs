mod api;
mod auth;
mod billing;
mod bootstrap;
mod config;
mod directory;
mod error;
mod leaderboard;
mod middleware;
mod performance;
mod reconcile;
mod server;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Initialize logging and tracing
fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,tower_http=debug,staffline_backend=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting staffing portal backend");

    dotenv::dotenv().ok();
    let config = config::Config::from_env()?;
    let bind_address = config.bind_address.clone();

    let state = bootstrap::initialize_app_state(config).await?;

    let app = server::create_app(state).await;
    server::run_server(app, &bind_address).await?;

    Ok(())
}
