//! Response construction
//!
//! Maps render outcomes onto the uniform JSON envelope, or onto a raw PDF
//! attachment in PDF mode.

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::Serialize;

use crate::outcome::{RenderOutcome, KIND_OVERLOADED, KIND_PAYLOAD_TOO_LARGE, KIND_TIMEOUT};

/// Header carrying processing time on raw PDF responses
pub const PROCESSING_TIME_HEADER: &str = "x-processing-time-ms";

/// File name offered for downloaded PDFs
const ATTACHMENT_NAME: &str = "document.pdf";

/// Envelope returned by `/convert`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    pub request_id: String,
    pub processing_time_ms: f64,
    pub api_response_time_ms: f64,
}

impl ConversionResponse {
    /// Stamp the boundary-measured response time
    pub fn with_api_time(mut self, api_response_time_ms: f64) -> Self {
        self.api_response_time_ms = round_ms(api_response_time_ms.max(self.processing_time_ms));
        self
    }
}

/// HTTP status for an outcome
pub fn status_for(outcome: &RenderOutcome) -> StatusCode {
    match outcome {
        RenderOutcome::Success { .. } => StatusCode::OK,
        RenderOutcome::ValidationFailure { kind, .. } if kind == KIND_PAYLOAD_TOO_LARGE => {
            StatusCode::PAYLOAD_TOO_LARGE
        }
        RenderOutcome::ValidationFailure { .. } => StatusCode::BAD_REQUEST,
        RenderOutcome::EngineFailure { kind, .. } if kind == KIND_OVERLOADED => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        RenderOutcome::EngineFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        RenderOutcome::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
    }
}

/// Build the JSON envelope and status code for an outcome.
///
/// `api_response_time_ms` starts equal to the processing time; the HTTP
/// boundary overwrites it with [`ConversionResponse::with_api_time`].
pub fn build(
    outcome: RenderOutcome,
    request_id: &str,
    processing_time_ms: f64,
) -> (ConversionResponse, StatusCode) {
    let status = status_for(&outcome);
    let processing_time_ms = round_ms(processing_time_ms);

    let mut response = ConversionResponse {
        success: false,
        pdf_base64: None,
        size_bytes: None,
        error: None,
        error_type: None,
        request_id: request_id.to_string(),
        processing_time_ms,
        api_response_time_ms: processing_time_ms,
    };

    match outcome {
        RenderOutcome::Success { bytes } => {
            response.success = true;
            response.size_bytes = Some(bytes.len());
            response.pdf_base64 = Some(BASE64.encode(&bytes));
        }
        RenderOutcome::ValidationFailure { reason, kind } => {
            response.error = Some(reason);
            response.error_type = Some(kind);
        }
        RenderOutcome::EngineFailure { message, kind } => {
            response.error = Some(message);
            response.error_type = Some(kind);
        }
        RenderOutcome::Timeout { after } => {
            response.error = Some(format!("render timed out after {}ms", after.as_millis()));
            response.error_type = Some(KIND_TIMEOUT.to_string());
        }
    }

    (response, status)
}

/// Raw PDF download response
pub fn pdf_attachment(bytes: Vec<u8>, processing_time_ms: f64) -> Response {
    let mut response = (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", ATTACHMENT_NAME),
            ),
        ],
        Body::from(bytes),
    )
        .into_response();

    if let Ok(value) = HeaderValue::from_str(&format!("{:.2}", round_ms(processing_time_ms))) {
        response.headers_mut().insert(PROCESSING_TIME_HEADER, value);
    }
    response
}

fn round_ms(ms: f64) -> f64 {
    (ms * 100.0).round() / 100.0
}
