//! Dermtrack - skin analysis history with derived progress statistics.
//!
//! # API Endpoints
//!
//! - `GET /analyses` - List analyses, newest first
//! - `POST /analyses` - Add an analysis
//! - `GET /analyses/:id` - Fetch one analysis
//! - `DELETE /analyses/:id` - Delete an analysis
//! - `POST /analyses/reload` - Re-read the history from storage
//! - `POST /scans` - Run the mock analyzer and store the result
//! - `GET /stats` - Summary statistics
//! - `GET /stats/history` - Severity history for the dashboard
//! - `GET /health` - Health check

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use dermtrack::api::{AppState, router};
use dermtrack::config::Config;
use dermtrack::repository::AnalysisRepository;
use dermtrack::storage::Storage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("dermtrack=info".parse()?))
        .init();

    let config = Config::from_env();

    info!(
        port = config.port,
        db_url = %config.database_url,
        scope = %config.storage_scope,
        "Starting Dermtrack"
    );

    let storage = Storage::connect(
        &config.database_url,
        &config.storage_scope,
        config.max_connections,
    )
    .await?;
    info!("Database initialized");

    // Load before serving so the first request sees a settled history
    let mut repository = AnalysisRepository::new(storage);
    repository.load().await;
    info!(
        analyses = repository.analyses().len(),
        "Analysis history ready"
    );

    let app = router(AppState::new(repository));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    info!(%addr, "Dermtrack is listening");

    axum::serve(listener, app).await?;

    Ok(())
}
