//! Render engine boundary
//!
//! The engine turns a complete HTML document into PDF bytes. It is treated as
//! synchronous and CPU-bound: callers must run it off the async runtime (see
//! [`crate::executor::BoundedExecutor`]).
//!
//! - `command`: subprocess-backed engine (WeasyPrint by default)
//! - `fake`: deterministic engines for tests (`test-util` feature)

mod command;
mod error;

#[cfg(any(test, feature = "test-util"))]
pub mod fake;

pub use command::CommandEngine;
pub use error::RenderError;

use std::sync::Arc;

/// HTML to PDF renderer
pub trait RenderEngine: Send + Sync {
    /// Short engine identifier used in logs
    fn name(&self) -> &str;

    /// Render a complete HTML document to PDF bytes
    fn render(&self, html: &str) -> Result<Vec<u8>, RenderError>;
}

/// Shared engine handle
pub type SharedEngine = Arc<dyn RenderEngine>;
