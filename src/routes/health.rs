//! Health check endpoints

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::executor::ExecutorStats;
use crate::health::{HealthStatus, ProbeReport};
use crate::state::AppState;
use crate::{SERVICE_NAME, VERSION};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub service: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    /// Last render engine self-test, if one has run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<ProbeReport>,
    pub pool: ExecutorStats,
}

fn snapshot(state: &AppState) -> HealthResponse {
    HealthResponse {
        status: state.probe().status(),
        service: SERVICE_NAME,
        version: VERSION,
        timestamp: chrono::Utc::now().to_rfc3339(),
        engine: state.probe().last_report(),
        pool: state.executor().stats(),
    }
}

/// Report cached engine health; never re-runs the self-test
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(snapshot(&state))
}

/// Operator-triggered engine re-check
pub async fn recheck(State(state): State<AppState>) -> Json<HealthResponse> {
    tracing::info!("Re-running render engine self-test on request");
    state.probe().self_test().await;
    Json(snapshot(&state))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/check", post(recheck))
}
