//! HTTP API handlers for Dermtrack.
//!
//! The API is the presentation surface of the analysis history:
//!
//! - **GET /analyses**: newest-first history, optionally limited
//! - **GET /analyses/:id**: one analysis
//! - **POST /analyses**: add an analysis produced elsewhere
//! - **POST /scans**: run the mock analyzer on an image reference and add the result
//! - **DELETE /analyses/:id**: delete an analysis (unknown ids succeed)
//! - **POST /analyses/reload**: re-read the history from storage
//! - **GET /stats**: summary statistics
//! - **GET /stats/history**: dashboard severity history
//! - **GET /stats/recent**: newest analyses with a relative age
//!
//! Storage failures are absorbed by the repository, so none of these
//! handlers report them as errors.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

use crate::analysis::generate_mock_analysis;
use crate::model::{
    AnalysisRecord, HistoryResponse, LimitQuery, RecentAnalysis, ScanRequest, SeverityPoint,
    StatsResponse,
};
use crate::repository::AnalysisRepository;
use crate::stats::{
    DEFAULT_HISTORY_POINTS, DEFAULT_RECENT_ANALYSES, recent_summaries, severity_history,
};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<Mutex<AnalysisRepository>>,
}

impl AppState {
    pub fn new(repository: AnalysisRepository) -> Self {
        Self {
            repository: Arc::new(Mutex::new(repository)),
        }
    }
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/analyses", get(list_analyses).post(post_analysis))
        .route("/analyses/reload", post(reload_analyses))
        .route("/analyses/:id", get(get_analysis).delete(delete_analysis))
        .route("/scans", post(post_scan))
        .route("/stats", get(get_stats))
        .route("/stats/history", get(get_severity_history))
        .route("/stats/recent", get(get_recent_analyses))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /analyses - List analyses, newest first.
///
/// # Query Parameters
///
/// - `limit` (optional): Return only the newest `limit` analyses
#[instrument(skip(state))]
pub async fn list_analyses(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<AnalysisRecord>> {
    let repository = state.repository.lock().await;

    let analyses = match query.limit {
        Some(limit) => repository.recent(limit).to_vec(),
        None => repository.analyses().to_vec(),
    };

    Json(analyses)
}

/// GET /analyses/:id - Fetch a single analysis.
///
/// Returns `404 Not Found` for unknown ids.
#[instrument(skip(state))]
pub async fn get_analysis(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AnalysisRecord>, StatusCode> {
    let repository = state.repository.lock().await;

    repository
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// POST /analyses - Add a completed analysis.
///
/// # Request Body
///
/// A full analysis record:
///
/// ```json
/// {
///     "id": "scan-42",
///     "timestamp": "2025-11-19T09:30:00Z",
///     "skinType": "combination",
///     "overallHealth": "good",
///     "conditions": [],
///     "recommendations": ["Use SPF 30 daily"]
/// }
/// ```
///
/// # Response
///
/// Returns `201 Created` with the stored record. Repeated recommendations
/// are stored once. Returns `422 Unprocessable Entity` when a condition's
/// confidence is not a number in `0..=100`.
#[instrument(skip_all, fields(id = %record.id))]
pub async fn post_analysis(
    State(state): State<AppState>,
    Json(record): Json<AnalysisRecord>,
) -> Result<(StatusCode, Json<AnalysisRecord>), StatusCode> {
    let record = record.normalized().map_err(|e| {
        warn!(error = %e, "Rejected analysis");
        StatusCode::UNPROCESSABLE_ENTITY
    })?;

    let mut repository = state.repository.lock().await;
    repository.add(record.clone()).await;

    Ok((StatusCode::CREATED, Json(record)))
}

/// POST /scans - Analyze an image with the mock analyzer and store the result.
///
/// # Request Body
///
/// ```json
/// { "imageUri": "file:///captures/1.jpg" }
/// ```
///
/// `imageUri` is optional.
#[instrument(skip(state))]
pub async fn post_scan(
    State(state): State<AppState>,
    Json(request): Json<ScanRequest>,
) -> impl IntoResponse {
    let record = generate_mock_analysis(request.image_uri, Utc::now());
    info!(id = %record.id, skin_type = ?record.skin_type, "Mock analysis generated");

    let mut repository = state.repository.lock().await;
    repository.add(record.clone()).await;

    (StatusCode::CREATED, Json(record))
}

/// DELETE /analyses/:id - Delete an analysis.
///
/// Always returns `204 No Content`; deleting an unknown id is a no-op.
#[instrument(skip(state))]
pub async fn delete_analysis(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> StatusCode {
    let mut repository = state.repository.lock().await;
    repository.delete(&id).await;

    StatusCode::NO_CONTENT
}

/// POST /analyses/reload - Re-read the history from storage.
#[instrument(skip(state))]
pub async fn reload_analyses(State(state): State<AppState>) -> Json<HistoryResponse> {
    let mut repository = state.repository.lock().await;
    repository.load().await;

    Json(HistoryResponse {
        analyses: repository.analyses().to_vec(),
        user_stats: repository.user_stats().clone(),
    })
}

/// GET /stats - Summary statistics for the dashboard.
///
/// # Response
///
/// ```json
/// {
///     "totalScans": 10,
///     "latestScanDate": "2025-11-19T00:00:00Z",
///     "conditionsTracked": ["Seasonal Dryness", "Minor Irritation"],
///     "improvementTrend": "improving",
///     "trendLabel": "Improving"
/// }
/// ```
#[instrument(skip(state))]
pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let repository = state.repository.lock().await;
    let stats = repository.user_stats().clone();

    info!(
        total_scans = stats.total_scans,
        trend = ?stats.improvement_trend,
        "Stats queried"
    );

    Json(StatsResponse {
        trend_label: stats.improvement_trend.label(),
        stats,
    })
}

/// GET /stats/history - Severity of the most recent analyses, oldest first.
///
/// # Query Parameters
///
/// - `limit` (optional): Number of analyses to include (default: 6)
#[instrument(skip(state))]
pub async fn get_severity_history(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<SeverityPoint>> {
    let repository = state.repository.lock().await;
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_POINTS);

    Json(severity_history(repository.analyses(), limit))
}

/// GET /stats/recent - Newest analyses with how long ago each was taken.
///
/// # Query Parameters
///
/// - `limit` (optional): Number of analyses to include (default: 3)
///
/// # Response
///
/// Each entry is the full analysis plus a `timeAgo` label such as
/// `"Yesterday"` or `"3 weeks ago"`.
#[instrument(skip(state))]
pub async fn get_recent_analyses(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<RecentAnalysis>> {
    let repository = state.repository.lock().await;
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_ANALYSES);

    Json(recent_summaries(repository.analyses(), limit, Utc::now()))
}

/// GET /health - Simple health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}
