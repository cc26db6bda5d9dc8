//! Service discovery endpoint

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;
use crate::{SERVICE_TITLE, VERSION};

#[derive(Serialize)]
pub struct IndexResponse {
    pub service: &'static str,
    pub status: &'static str,
    pub version: &'static str,
    pub endpoints: Endpoints,
}

#[derive(Serialize)]
pub struct Endpoints {
    pub health: &'static str,
    pub health_check: &'static str,
    pub convert: &'static str,
}

pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        service: SERVICE_TITLE,
        status: "running",
        version: VERSION,
        endpoints: Endpoints {
            health: "GET /health",
            health_check: "POST /health/check",
            convert: "POST /convert",
        },
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}
