//! Conversion request parsing and validation

use serde::Deserialize;

use crate::error::ValidationError;

/// Prefix for generated request identifiers
const REQUEST_ID_PREFIX: &str = "req-";

/// JSON body accepted by `POST /convert`
#[derive(Debug, Default, Deserialize)]
pub struct ConvertBody {
    #[serde(default)]
    pub html: Option<String>,
}

impl ConvertBody {
    /// Parse a raw request body.
    ///
    /// An empty or `null` body is reported as missing; anything that is not a
    /// JSON object with an optional string `html` field is invalid.
    pub fn parse(body: &[u8]) -> Result<Self, ValidationError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(ValidationError::MissingBody);
        }

        let parsed: Option<ConvertBody> = serde_json::from_slice(body)
            .map_err(|e| ValidationError::InvalidJson(e.to_string()))?;
        parsed.ok_or(ValidationError::MissingBody)
    }
}

/// A validated conversion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    request_id: String,
    html: String,
}

impl ConversionRequest {
    /// Validate raw input. `html` must be present and non-blank.
    pub fn new(request_id: impl Into<String>, html: Option<String>) -> Result<Self, ValidationError> {
        let html = html.ok_or(ValidationError::MissingHtml)?;
        if html.trim().is_empty() {
            return Err(ValidationError::EmptyHtml);
        }

        let request_id = request_id.into();
        let request_id = if request_id.trim().is_empty() {
            generate_request_id()
        } else {
            request_id
        };

        Ok(Self { request_id, html })
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

/// Generate a fresh request identifier
pub fn generate_request_id() -> String {
    format!("{}{}", REQUEST_ID_PREFIX, uuid::Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_body() {
        let body = ConvertBody::parse(br#"{"html": "<p>x</p>"}"#).unwrap();
        assert_eq!(body.html.as_deref(), Some("<p>x</p>"));

        let body = ConvertBody::parse(b"{}").unwrap();
        assert!(body.html.is_none());

        let body = ConvertBody::parse(br#"{"html": "<p>x</p>", "extra": 1}"#).unwrap();
        assert!(body.html.is_some());
    }

    #[test]
    fn test_parse_missing_body() {
        assert_eq!(ConvertBody::parse(b"").unwrap_err(), ValidationError::MissingBody);
        assert_eq!(ConvertBody::parse(b"  \n").unwrap_err(), ValidationError::MissingBody);
        assert_eq!(ConvertBody::parse(b"null").unwrap_err(), ValidationError::MissingBody);
    }

    #[test]
    fn test_parse_invalid_body() {
        assert!(matches!(
            ConvertBody::parse(b"<p>not json</p>"),
            Err(ValidationError::InvalidJson(_))
        ));
        assert!(matches!(
            ConvertBody::parse(br#"{"html": 42}"#),
            Err(ValidationError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_request_validation() {
        assert_eq!(
            ConversionRequest::new("req-1", None).unwrap_err(),
            ValidationError::MissingHtml
        );
        assert_eq!(
            ConversionRequest::new("req-1", Some(" \t\n".to_string())).unwrap_err(),
            ValidationError::EmptyHtml
        );

        let request = ConversionRequest::new("req-1", Some("<p>x</p>".to_string())).unwrap();
        assert_eq!(request.request_id(), "req-1");
        assert_eq!(request.html(), "<p>x</p>");
    }

    #[test]
    fn test_blank_request_id_is_generated() {
        let request = ConversionRequest::new("", Some("<p>x</p>".to_string())).unwrap();
        assert!(request.request_id().starts_with(REQUEST_ID_PREFIX));
        assert!(request.request_id().len() > REQUEST_ID_PREFIX.len());
    }

    #[test]
    fn test_validation_messages_mention_html_content() {
        assert!(ValidationError::MissingHtml.to_string().contains("HTML content"));
        assert!(ValidationError::EmptyHtml.to_string().contains("HTML content"));
    }
}
