//! PDF API Library
//!
//! HTML to PDF conversion service. The binary in main.rs wires these modules
//! into an axum server; tests build the same router against fake engines.
//!
//! # Modules
//!
//! - `html`: Fragment wrapping and default style injection
//! - `engine`: Render engine boundary and the subprocess engine
//! - `executor`: Bounded worker pool with per-job timeout
//! - `pipeline`: Validate → normalize → render orchestration
//! - `response`: Outcome to HTTP envelope mapping
//! - `health`: Cached render engine self-test
//! - `routes`: HTTP surface

pub mod config;
pub mod engine;
pub mod error;
pub mod executor;
pub mod health;
pub mod html;
pub mod outcome;
pub mod pipeline;
pub mod request;
pub mod response;
pub mod routes;
pub mod state;

/// Service identifier reported by `/health`
pub const SERVICE_NAME: &str = "pdf-api";
/// Display name reported by `/`
pub const SERVICE_TITLE: &str = "Clean PDF API";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
