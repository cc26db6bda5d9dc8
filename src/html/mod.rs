//! HTML processing module
//!
//! Prepares submitted HTML for rendering:
//! - Fragment detection and document wrapping
//! - Default style injection
//!
//! Uses lol_html for streaming head rewriting.

mod normalize;

pub use normalize::{has_styling, is_complete_document, normalize, NormalizedDocument, DEFAULT_STYLE};
