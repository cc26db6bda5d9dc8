//! HTML to PDF conversion endpoint
//!
//! `POST /convert` returns either the JSON envelope (PDF as base64) or the
//! raw PDF as an attachment. Failures are always JSON envelopes.

use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, QueryRejection},
        DefaultBodyLimit, Query, State,
    },
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::post,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

use super::RequestStart;
use crate::config::ResponseMode;
use crate::error::ValidationError;
use crate::outcome::RenderOutcome;
use crate::pipeline::Conversion;
use crate::request::{generate_request_id, ConvertBody};
use crate::response;
use crate::state::AppState;

/// Query parameters for conversion
#[derive(Debug, Default, Deserialize)]
pub struct ConvertQuery {
    /// `json` or `pdf`; overrides the configured default
    pub format: Option<String>,
}

/// Preflight response body
#[derive(Serialize)]
pub struct PreflightResponse {
    pub status: &'static str,
}

/// Convert an HTML document to PDF
///
/// Query and body rejections are answered with the JSON envelope rather than
/// axum's plain-text rejection bodies.
pub async fn convert(
    State(state): State<AppState>,
    query: Result<Query<ConvertQuery>, QueryRejection>,
    start: Option<Extension<RequestStart>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let started = start.map(|Extension(RequestStart(at))| at).unwrap_or_else(Instant::now);
    let request_id = request_id_from(&headers);
    let pipeline = state.pipeline();

    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected query string");
            return envelope(pipeline.reject(&request_id, ValidationError::InvalidQuery), started);
        }
    };

    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected request body");
            let error = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ValidationError::PayloadTooLarge {
                    limit: state.config().server.max_body_bytes,
                }
            } else {
                ValidationError::UnreadableBody
            };
            return envelope(pipeline.reject(&request_id, error), started);
        }
    };

    let mode = match query.format.as_deref().filter(|f| !f.trim().is_empty()) {
        None => state.config().server.response_mode,
        Some(format) => match format.parse::<ResponseMode>() {
            Ok(mode) => mode,
            Err(_) => {
                let rejected =
                    pipeline.reject(&request_id, ValidationError::UnsupportedFormat(format.to_string()));
                return envelope(rejected, started);
            }
        },
    };

    let conversion = match ConvertBody::parse(&body) {
        Ok(body) => pipeline.run(body.html, &request_id).await,
        Err(e) => pipeline.reject(&request_id, e),
    };

    let Conversion {
        request_id,
        outcome,
        processing_time,
    } = conversion;

    match outcome {
        RenderOutcome::Success { bytes } if mode == ResponseMode::Pdf => {
            response::pdf_attachment(bytes, processing_time.as_secs_f64() * 1000.0)
        }
        outcome => envelope(
            Conversion {
                request_id,
                outcome,
                processing_time,
            },
            started,
        ),
    }
}

/// CORS preflight for `/convert`; no body processing
pub async fn preflight() -> Json<PreflightResponse> {
    Json(PreflightResponse { status: "ok" })
}

fn envelope(conversion: Conversion, started: Instant) -> Response {
    let (body, status) = conversion.into_response();
    let body = body.with_api_time(started.elapsed().as_secs_f64() * 1000.0);
    (status, Json(body)).into_response()
}

fn request_id_from(headers: &HeaderMap) -> String {
    headers
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(generate_request_id)
}

/// Permissive cross-origin headers on every `/convert` response, including
/// extractor rejections
async fn with_cors_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}

pub fn router(max_body_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/convert", post(convert).options(preflight))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(middleware::map_response(with_cors_headers))
}
