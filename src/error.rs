//! Error types for the PDF API

use thiserror::Error;

use crate::outcome::{KIND_INVALID_REQUEST, KIND_PAYLOAD_TOO_LARGE};

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Request validation errors
///
/// Always recoverable; surfaced to the client as a 400 response, or 413 for
/// an oversized body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No JSON data provided")]
    MissingBody,

    #[error("Invalid JSON body: {0}")]
    InvalidJson(String),

    #[error("Missing HTML content: request body must include an \"html\" field")]
    MissingHtml,

    #[error("Missing HTML content: \"html\" field is empty")]
    EmptyHtml,

    #[error("Unsupported response format: {0:?} (expected \"json\" or \"pdf\")")]
    UnsupportedFormat(String),

    #[error("Invalid query string: expected at most one \"format\" parameter")]
    InvalidQuery,

    #[error("Request body exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    #[error("Request body could not be read")]
    UnreadableBody,
}

impl ValidationError {
    /// Failure kind reported as `error_type`
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::PayloadTooLarge { .. } => KIND_PAYLOAD_TOO_LARGE,
            _ => KIND_INVALID_REQUEST,
        }
    }
}
