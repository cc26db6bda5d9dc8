//! Turns raw HTML (full document or body fragment) into a complete, styled
//! document ready for rendering.

use std::cell::Cell;

use lol_html::html_content::ContentType;
use lol_html::{element, rewrite_str, RewriteStrSettings};

/// Styles applied when the input carries none of its own
pub const DEFAULT_STYLE: &str = r#"<style>
    @page {
        size: A4;
        margin: 2cm;
        @bottom-center {
            content: "Page " counter(page) " of " counter(pages);
            font-size: 9pt;
            color: #7f8c8d;
        }
    }
    body { font-family: Arial, Helvetica, sans-serif; font-size: 11pt; line-height: 1.6; color: #333; margin: 20px; }
    h1, h2, h3, h4, h5, h6 { color: #2c3e50; line-height: 1.25; }
    h1 { border-bottom: 2px solid #2c3e50; padding-bottom: 4px; }
    h2 { color: #34495e; }
    table { border-collapse: collapse; width: 100%; margin: 1em 0; }
    th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
    th { background-color: #f8f9fa; font-weight: bold; }
    tr:nth-child(even) td { background-color: #fafafa; }
    blockquote { margin: 1em 0; padding: 0.5em 1em; border-left: 4px solid #bdc3c7; color: #555; background: #f9f9f9; }
    img { max-width: 100%; height: auto; }
    pre, code { font-family: "Courier New", monospace; background: #f4f4f4; }
    pre { padding: 8px; white-space: pre-wrap; }
</style>"#;

/// A complete, styled HTML document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDocument {
    pub html: String,
}

impl NormalizedDocument {
    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn len(&self) -> usize {
        self.html.len()
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }
}

/// Normalize raw HTML into a complete document.
///
/// Fragments are wrapped in a document template. The default style block is
/// injected into the head unless the input already has a `<style>` block or a
/// stylesheet `<link>`. Normalizing a normalized document is a no-op.
pub fn normalize(raw: &str) -> NormalizedDocument {
    let trimmed = raw.trim();
    let lower = trimmed.to_ascii_lowercase();
    let style = if has_styling(&lower) { "" } else { DEFAULT_STYLE };

    let html = if is_complete_document(&lower) {
        if style.is_empty() {
            trimmed.to_string()
        } else {
            inject_head_style(trimmed, &lower, style)
        }
    } else {
        wrap_fragment(trimmed, style)
    };

    NormalizedDocument { html }
}

/// Whether the input already starts like a full document
pub fn is_complete_document(lower: &str) -> bool {
    lower.starts_with("<!doctype") || has_tag_at(lower, 0, "html")
}

/// Whether the input carries an inline style block or an external stylesheet
pub fn has_styling(lower: &str) -> bool {
    if find_tag(lower, "style").is_some() {
        return true;
    }

    let mut from = 0;
    while let Some(start) = find_tag(&lower[from..], "link").map(|i| i + from) {
        let end = lower[start..].find('>').map_or(lower.len(), |i| start + i);
        if lower[start..end].contains("stylesheet") {
            return true;
        }
        from = end;
    }
    false
}

fn wrap_fragment(body: &str, style: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<title>PDF Document</title>\n{}\n</head>\n<body>\n{}\n</body>\n</html>",
        style, body
    )
}

fn inject_head_style(doc: &str, lower: &str, style: &str) -> String {
    let has_head = find_tag(lower, "head").is_some();
    let has_root = find_tag(lower, "html").is_some();

    if has_head || has_root {
        if let Some(html) = rewrite_head(doc, style, has_head) {
            return html;
        }
        tracing::debug!("Head rewrite did not apply, splicing style block");
    }

    splice_head(doc, lower, style, has_head, has_root)
}

/// Streaming injection: append to an existing head, or prepend a synthesized
/// head to the root element.
fn rewrite_head(doc: &str, style: &str, has_head: bool) -> Option<String> {
    let injected = Cell::new(false);
    let head_block = format!("<head>{}</head>", style);

    let handler = if has_head {
        element!("head", |el| {
            if !injected.get() {
                el.append(style, ContentType::Html);
                injected.set(true);
            }
            Ok(())
        })
    } else {
        element!("html", |el| {
            if !injected.get() {
                el.prepend(&head_block, ContentType::Html);
                injected.set(true);
            }
            Ok(())
        })
    };

    let result = rewrite_str(
        doc,
        RewriteStrSettings {
            element_content_handlers: vec![handler],
            ..RewriteStrSettings::default()
        },
    );

    match result {
        Ok(html) if injected.get() => Some(html),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(error = %e, "HTML rewriter failed");
            None
        }
    }
}

/// String-level fallback for inputs the rewriter could not handle
fn splice_head(doc: &str, lower: &str, style: &str, has_head: bool, has_root: bool) -> String {
    if has_head {
        if let Some(close) = find_tag(lower, "/head") {
            return format!("{}{}\n{}", &doc[..close], style, &doc[close..]);
        }
        if let Some(open_end) = find_tag(lower, "head").and_then(|i| tag_end(lower, i)) {
            return format!("{}\n{}{}", &doc[..open_end], style, &doc[open_end..]);
        }
    }

    if has_root {
        if let Some(open_end) = find_tag(lower, "html").and_then(|i| tag_end(lower, i)) {
            return format!("{}\n<head>{}</head>{}", &doc[..open_end], style, &doc[open_end..]);
        }
    }

    // Doctype with neither root nor head: rebuild the skeleton around the rest
    let rest_start = if lower.starts_with("<!doctype") {
        tag_end(lower, 0).unwrap_or(lower.len())
    } else {
        0
    };
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n{}\n</head>\n<body>\n{}\n</body>\n</html>",
        style,
        doc[rest_start..].trim()
    )
}

/// Byte offset of the first `<name` tag (not a longer tag name) outside
/// HTML comments
fn find_tag(lower: &str, name: &str) -> Option<usize> {
    let needle = format!("<{}", name);
    let mut from = 0;
    while let Some(pos) = lower[from..].find(&needle) {
        let at = from + pos;
        if let Some(comment_end) = enclosing_comment_end(lower, from, at) {
            from = comment_end;
            continue;
        }
        if has_tag_at(lower, at, name) {
            return Some(at);
        }
        from = at + needle.len();
    }
    None
}

/// End of a comment opened in `lower[from..at]` that is still open at `at`.
/// An unterminated comment runs to the end of input.
fn enclosing_comment_end(lower: &str, from: usize, at: usize) -> Option<usize> {
    let mut scan = from;
    while let Some(open) = lower[scan..at].find("<!--").map(|i| scan + i) {
        match lower[open + 4..].find("-->").map(|i| open + 4 + i + 3) {
            Some(end) if end > at => return Some(end),
            Some(end) => scan = end,
            None => return Some(lower.len()),
        }
    }
    None
}

fn has_tag_at(lower: &str, at: usize, name: &str) -> bool {
    let rest = &lower[at..];
    if !rest.starts_with('<') || !rest[1..].starts_with(name) {
        return false;
    }
    matches!(
        rest.as_bytes().get(1 + name.len()),
        Some(b'>') | Some(b'/') | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r')
    )
}

/// Offset just past the `>` closing the tag that starts at `start`
fn tag_end(lower: &str, start: usize) -> Option<usize> {
    lower[start..].find('>').map(|i| start + i + 1)
}
