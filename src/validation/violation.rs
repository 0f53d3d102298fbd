//! Validation failure types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Part of the request a violation was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestPart {
    Headers,
    Path,
    Querystring,
    Body,
}

impl RequestPart {
    /// Validation order.
    pub const ORDER: [RequestPart; 4] = [Self::Headers, Self::Path, Self::Querystring, Self::Body];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Headers => "HEADERS",
            Self::Path => "PATH",
            Self::Querystring => "QUERYSTRING",
            Self::Body => "BODY",
        }
    }
}

impl fmt::Display for RequestPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First schema violation found in a request.
///
/// `message` is the wire message as sent to the caller.
/// `property_path` is a JSON pointer (`/fromAsset/assetId`); `None` means the
/// failure is not attributable to a single property.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationViolation {
    pub request_part: RequestPart,
    pub property_path: Option<String>,
    pub keyword: String,
    pub message: String,
}

impl ValidationViolation {
    pub fn new(
        request_part: RequestPart,
        property_path: Option<String>,
        keyword: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            request_part,
            property_path,
            keyword: keyword.into(),
            message: message.into(),
        }
    }

    /// Wrong `Content-Type` for an operation that declares a JSON body.
    pub fn content_type(content_type: &str) -> Self {
        Self::new(
            RequestPart::Headers,
            None,
            "contentType",
            format!("Wrong content type: {}", content_type),
        )
    }

    /// Body is not parseable JSON.
    pub fn malformed_body(reason: impl fmt::Display) -> Self {
        Self::new(
            RequestPart::Body,
            None,
            "json",
            format!("Body is not valid JSON: {}", reason),
        )
    }
}

/// A handler produced a payload that does not match its declared schema.
///
/// Always a server-side defect.
#[derive(Debug, Clone, Error)]
#[error("Response schema validation failed for {method} {url} ({status}): {message}")]
pub struct ResponseSchemaViolation {
    pub method: String,
    pub url: String,
    pub status: u16,
    pub property_path: Option<String>,
    pub message: String,
    pub payload: Value,
}

/// A contract schema could not be compiled.
#[derive(Debug, Clone, Error)]
#[error("Schema compilation failed for {method} {url} ({part}): {message}")]
pub struct SchemaCompilationError {
    pub method: String,
    pub url: String,
    pub part: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_part_wire_names() {
        assert_eq!(
            serde_json::to_value(RequestPart::Querystring).unwrap(),
            serde_json::json!("QUERYSTRING")
        );
        assert_eq!(RequestPart::Headers.to_string(), "HEADERS");
    }

    #[test]
    fn test_content_type_violation() {
        let v = ValidationViolation::content_type("text/plain");
        assert_eq!(v.request_part, RequestPart::Headers);
        assert!(v.property_path.is_none());
        assert_eq!(v.to_string(), "Wrong content type: text/plain");
    }
}
