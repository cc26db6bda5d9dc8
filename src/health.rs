//! Render engine self-test
//!
//! Runs a fixed document through normalize → executor → engine and caches the
//! result. The probe runs once at startup and again only when an operator asks
//! for it; health queries read the cached report.

use std::time::Instant;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use crate::outcome::RenderOutcome;
use crate::pipeline::ConversionPipeline;

/// Document rendered by the self-test
pub const PROBE_HTML: &str = "<html><body><p>Test</p></body></html>";

/// Request id attached to self-test log lines
const PROBE_REQUEST_ID: &str = "self-test";

/// Result of one self-test run
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub healthy: bool,
    pub checked_at: DateTime<Utc>,
    pub duration_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_size_bytes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Overall service health derived from the last probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    /// No probe has completed yet
    Unknown,
}

/// Engine health probe with a cached last result
pub struct HealthProbe {
    pipeline: ConversionPipeline,
    last: RwLock<Option<ProbeReport>>,
}

impl HealthProbe {
    pub fn new(pipeline: ConversionPipeline) -> Self {
        Self {
            pipeline,
            last: RwLock::new(None),
        }
    }

    /// Render the probe document once and cache the result.
    ///
    /// Never fails: an engine failure is recorded as an unhealthy report.
    pub async fn self_test(&self) -> bool {
        let started = Instant::now();
        let conversion = self
            .pipeline
            .run(Some(PROBE_HTML.to_string()), PROBE_REQUEST_ID)
            .await;
        let duration_ms = started.elapsed().as_secs_f64() * 1000.0;

        let result = match conversion.outcome {
            RenderOutcome::Success { bytes } => Ok(bytes.len()),
            RenderOutcome::ValidationFailure { reason, .. } => Err(reason),
            RenderOutcome::EngineFailure { message, kind } => Err(format!("{}: {}", kind, message)),
            RenderOutcome::Timeout { after } => {
                Err(format!("timed out after {}ms", after.as_millis()))
            }
        };

        let report = match result {
            Ok(size) => {
                tracing::info!(
                    engine = self.pipeline.engine().name(),
                    size_bytes = size,
                    "Render engine self-test passed"
                );
                ProbeReport {
                    healthy: true,
                    checked_at: Utc::now(),
                    duration_ms,
                    pdf_size_bytes: Some(size),
                    error: None,
                }
            }
            Err(error) => {
                tracing::error!(
                    engine = self.pipeline.engine().name(),
                    error = %error,
                    "Render engine self-test failed, service is degraded"
                );
                ProbeReport {
                    healthy: false,
                    checked_at: Utc::now(),
                    duration_ms,
                    pdf_size_bytes: None,
                    error: Some(error),
                }
            }
        };

        let healthy = report.healthy;
        *self.last.write() = Some(report);
        healthy
    }

    /// Last cached report, if a probe has run
    pub fn last_report(&self) -> Option<ProbeReport> {
        self.last.read().clone()
    }

    pub fn status(&self) -> HealthStatus {
        match self.last.read().as_ref() {
            Some(report) if report.healthy => HealthStatus::Healthy,
            Some(_) => HealthStatus::Degraded,
            None => HealthStatus::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::engine::fake::{FailingEngine, FixedEngine};
    use crate::executor::BoundedExecutor;

    fn probe_with(engine: crate::engine::SharedEngine) -> HealthProbe {
        let executor = Arc::new(BoundedExecutor::new(1, 0));
        HealthProbe::new(ConversionPipeline::new(executor, engine, Duration::from_secs(5)))
    }

    #[tokio::test]
    async fn test_unknown_before_first_probe() {
        let probe = probe_with(Arc::new(FixedEngine::new(b"%PDF-")));
        assert_eq!(probe.status(), HealthStatus::Unknown);
        assert!(probe.last_report().is_none());
    }

    #[tokio::test]
    async fn test_passing_probe() {
        let engine = Arc::new(FixedEngine::new(b"%PDF-1.7"));
        let probe = probe_with(engine.clone());

        assert!(probe.self_test().await);
        assert_eq!(probe.status(), HealthStatus::Healthy);
        let report = probe.last_report().unwrap();
        assert_eq!(report.pdf_size_bytes, Some(8));
        assert!(report.error.is_none());
        assert_eq!(engine.calls(), 1);

        // Reading the status does not re-run the probe
        let _ = probe.status();
        let _ = probe.last_report();
        assert_eq!(engine.calls(), 1);
    }

    #[tokio::test]
    async fn test_failing_probe_is_cached_as_degraded() {
        let probe = probe_with(Arc::new(FailingEngine {
            kind: "engine_unavailable",
            message: "Failed to start converter `weasyprint`",
        }));

        assert!(!probe.self_test().await);
        assert_eq!(probe.status(), HealthStatus::Degraded);
        let report = probe.last_report().unwrap();
        assert!(report.error.unwrap().starts_with("engine_unavailable"));
    }
}
