//! JSON response envelope.
//!
//! Every response from the API, including errors and 405s, goes through
//! [`json_response`] so it carries the same static CORS and content-type
//! headers.

use axum::body::Body;
use axum::response::{IntoResponse, Response};
use http::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
};
use http::StatusCode;
use serde::Serialize;
use tracing::error;

/// `Access-Control-Allow-Origin` value.
pub const ALLOW_ORIGIN: &str = "*";

/// `Access-Control-Allow-Headers` value.
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// `Access-Control-Allow-Methods` value.
pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";

/// Body sent with status 405.
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method Not Allowed.";

/// Pre-encoded body sent when a payload cannot be serialized.
pub const ENCODE_FAILURE_BODY: &str = r#"{"error":"Failed to encode response body"}"#;

/// JSON error body: `{"error": "<message>"}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Serialize `body` and wrap it with the static headers.
///
/// A payload that fails to serialize is logged and replaced by a 500 with
/// [`ENCODE_FAILURE_BODY`].
pub fn json_response<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => envelope(status, bytes),
        Err(e) => {
            error!(
                status = status.as_u16(),
                "Failed to encode response body: {}", e
            );
            envelope(
                StatusCode::INTERNAL_SERVER_ERROR,
                ENCODE_FAILURE_BODY.as_bytes().to_vec(),
            )
        }
    }
}

/// Insert the static CORS and content-type headers.
pub fn apply_static_headers(headers: &mut HeaderMap) {
    headers.insert(
        ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
}

fn envelope(status: StatusCode, body: Vec<u8>) -> Response {
    let mut response = (status, Body::from(body)).into_response();
    apply_static_headers(response.headers_mut());
    response
}
