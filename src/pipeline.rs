//! Conversion pipeline
//!
//! validate → normalize → render (bounded, with timeout) → outcome.
//! Every branch reports processing time measured from pipeline entry.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::StatusCode;

use crate::engine::SharedEngine;
use crate::error::ValidationError;
use crate::executor::BoundedExecutor;
use crate::html::normalize;
use crate::outcome::RenderOutcome;
use crate::request::{generate_request_id, ConversionRequest};
use crate::response::{self, ConversionResponse};

/// Result of one pipeline run
#[derive(Debug)]
pub struct Conversion {
    pub request_id: String,
    pub outcome: RenderOutcome,
    pub processing_time: Duration,
}

impl Conversion {
    pub fn processing_time_ms(&self) -> f64 {
        self.processing_time.as_secs_f64() * 1000.0
    }

    /// Build the JSON envelope for this conversion
    pub fn into_response(self) -> (ConversionResponse, StatusCode) {
        let processing_time_ms = self.processing_time_ms();
        response::build(self.outcome, &self.request_id, processing_time_ms)
    }
}

/// Orchestrates a single conversion from raw input to outcome
#[derive(Clone)]
pub struct ConversionPipeline {
    executor: Arc<BoundedExecutor>,
    engine: SharedEngine,
    timeout: Duration,
}

impl ConversionPipeline {
    pub fn new(executor: Arc<BoundedExecutor>, engine: SharedEngine, timeout: Duration) -> Self {
        Self {
            executor,
            engine,
            timeout,
        }
    }

    pub fn executor(&self) -> &Arc<BoundedExecutor> {
        &self.executor
    }

    pub fn engine(&self) -> &SharedEngine {
        &self.engine
    }

    /// Validate, normalize and render `raw`.
    #[tracing::instrument(name = "convert", skip_all, fields(request_id = %request_id))]
    pub async fn run(&self, raw: Option<String>, request_id: &str) -> Conversion {
        let started = Instant::now();

        let request = match ConversionRequest::new(request_id, raw) {
            Ok(request) => request,
            Err(e) => return self.reject_since(started, request_id, e),
        };

        tracing::info!(html_bytes = request.html().len(), "Processing request");

        let document = normalize(request.html());
        tracing::debug!(document_bytes = document.len(), "Normalized document");

        let engine = Arc::clone(&self.engine);
        let outcome = self
            .executor
            .submit(move || engine.render(document.as_str()), self.timeout)
            .await;
        let processing_time = started.elapsed();

        match &outcome {
            RenderOutcome::Success { bytes } => tracing::info!(
                size_bytes = bytes.len(),
                processing_ms = processing_time.as_millis() as u64,
                "Conversion succeeded"
            ),
            other => tracing::warn!(
                outcome = other.label(),
                processing_ms = processing_time.as_millis() as u64,
                "Conversion failed"
            ),
        }

        Conversion {
            request_id: request.request_id().to_string(),
            outcome,
            processing_time,
        }
    }

    /// Run the pipeline and build the JSON envelope
    pub async fn convert(&self, raw: Option<String>, request_id: &str) -> (ConversionResponse, StatusCode) {
        self.run(raw, request_id).await.into_response()
    }

    /// Short-circuit a request whose body could not be parsed
    pub fn reject(&self, request_id: &str, error: ValidationError) -> Conversion {
        self.reject_since(Instant::now(), request_id, error)
    }

    fn reject_since(&self, started: Instant, request_id: &str, error: ValidationError) -> Conversion {
        let request_id = if request_id.trim().is_empty() {
            generate_request_id()
        } else {
            request_id.to_string()
        };
        tracing::info!(request_id = %request_id, reason = %error, "Rejected request");
        Conversion {
            request_id,
            outcome: error.into(),
            processing_time: started.elapsed(),
        }
    }
}
