//! Result of one conversion attempt

use std::time::Duration;

use crate::engine::RenderError;
use crate::error::ValidationError;

/// Failure kind reported when the worker pool is saturated
pub const KIND_OVERLOADED: &str = "overloaded";
/// Failure kind reported when a render job panics
pub const KIND_PANIC: &str = "panic";
/// Failure kind reported for timeouts
pub const KIND_TIMEOUT: &str = "timeout";
/// Failure kind reported for malformed requests
pub const KIND_INVALID_REQUEST: &str = "invalid_request";
/// Failure kind reported when the body exceeds the configured limit
pub const KIND_PAYLOAD_TOO_LARGE: &str = "payload_too_large";

/// Tagged outcome of a render attempt. Produced once per request and consumed
/// once by the response builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Success { bytes: Vec<u8> },
    ValidationFailure { reason: String, kind: String },
    EngineFailure { message: String, kind: String },
    Timeout { after: Duration },
}

impl RenderOutcome {
    pub fn engine_failure(kind: impl Into<String>, message: impl Into<String>) -> Self {
        RenderOutcome::EngineFailure {
            message: message.into(),
            kind: kind.into(),
        }
    }

    pub fn overloaded() -> Self {
        Self::engine_failure(
            KIND_OVERLOADED,
            "Render capacity exhausted, retry with backoff",
        )
    }

    pub fn validation_failure(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        RenderOutcome::ValidationFailure {
            reason: reason.into(),
            kind: kind.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RenderOutcome::Success { .. })
    }

    /// Size of the rendered PDF, if any
    pub fn size_bytes(&self) -> Option<usize> {
        match self {
            RenderOutcome::Success { bytes } => Some(bytes.len()),
            _ => None,
        }
    }

    /// Short label for logs
    pub fn label(&self) -> &str {
        match self {
            RenderOutcome::Success { .. } => "success",
            RenderOutcome::ValidationFailure { .. } => "validation_failure",
            RenderOutcome::EngineFailure { kind, .. } => kind,
            RenderOutcome::Timeout { .. } => KIND_TIMEOUT,
        }
    }
}

impl From<ValidationError> for RenderOutcome {
    fn from(err: ValidationError) -> Self {
        RenderOutcome::validation_failure(err.kind(), err.to_string())
    }
}

impl From<RenderError> for RenderOutcome {
    fn from(err: RenderError) -> Self {
        RenderOutcome::EngineFailure {
            message: err.summary(),
            kind: err.kind().to_string(),
        }
    }
}
