//! Content negotiation between JSON and plain text responses.

use axum::{
    body::Bytes,
    extract::FromRequestParts,
    http::{HeaderMap, HeaderValue, StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use super::error::ApiError;

/// MIME type for JSON.
pub const MIME_JSON: &str = "application/json";

/// Content-Type for plain text responses.
pub const MIME_TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Response representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentFormat {
    /// Plain text (default).
    #[default]
    Text,
    Json,
}

impl ContentFormat {
    /// Parse content format from Accept header value.
    pub fn from_accept(accept: &str) -> Self {
        let wants_json = accept.split(',').any(|range| {
            let mime = range.split(';').next().unwrap_or(range).trim();
            mime.eq_ignore_ascii_case(MIME_JSON)
        });

        if wants_json {
            ContentFormat::Json
        } else {
            ContentFormat::Text
        }
    }

    /// Get the Content-Type header value for this format.
    pub fn content_type_header(&self) -> HeaderValue {
        match self {
            ContentFormat::Text => HeaderValue::from_static(MIME_TEXT_PLAIN),
            ContentFormat::Json => HeaderValue::from_static(MIME_JSON),
        }
    }
}

/// Extractor for the desired response format from Accept header.
pub struct AcceptFormat(pub ContentFormat);

impl<S> FromRequestParts<S> for AcceptFormat
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let format = parts
            .headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .map(ContentFormat::from_accept)
            .unwrap_or_default();

        Ok(AcceptFormat(format))
    }
}

/// Response wrapper that sets the correct Content-Type header.
pub struct FormatResponse {
    format: ContentFormat,
    body: Bytes,
}

impl FormatResponse {
    pub fn new(format: ContentFormat, body: impl Into<Bytes>) -> Self {
        Self {
            format,
            body: body.into(),
        }
    }

    /// Create a plain text response.
    pub fn text(body: impl Into<Bytes>) -> Self {
        Self::new(ContentFormat::Text, body)
    }

    /// Serialize `value` into a JSON response.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, ApiError> {
        let body = serde_json::to_vec(value).map_err(|e| ApiError::internal(e.to_string()))?;
        Ok(Self::new(ContentFormat::Json, body))
    }
}

impl IntoResponse for FormatResponse {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, self.format.content_type_header());
        (StatusCode::OK, headers, self.body).into_response()
    }
}
