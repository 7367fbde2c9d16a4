//! HTTP request handlers for the blog posts API.
//!
//! # Endpoints
//!
//! - `POST /posts` - Create a post
//! - `GET /posts` - List post overviews
//! - `GET /posts/{id}` - Get a post with resolved image links
//! - `DELETE /posts/{id}` - Delete a post
//! - `GET /health` - Health check endpoint
//!
//! Both `/posts` paths accept any method; the [`Route`] decision picks the
//! operation or answers 405.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{BytesRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use http::{header, HeaderValue, Method, StatusCode, Uri};
use serde::Serialize;
use tracing::{debug, error, warn};

use super::response::{json_response, ErrorBody, METHOD_NOT_ALLOWED_MESSAGE};
use super::routes::Route;
use crate::blob::LinkSigner;
use crate::error::{BlobError, PostError, StoreError};
use crate::post::{NewPost, Post, PostService};
use crate::store::PostStore;

/// Query parameter carrying the optional creation date on get-by-id.
pub const CREATED_DATE_PARAM: &str = "createdDate";

/// Confirmation message for a successful create.
pub const CREATED_MESSAGE: &str = "Post created successfully.";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the post service.
///
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<S, L> {
    /// The post operations, shared across requests
    pub service: Arc<PostService<S, L>>,
}

impl<S, L> AppState<S, L> {
    /// Create a new application state with the given service.
    pub fn new(service: PostService<S, L>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

impl<S, L> Clone for AppState<S, L> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// Body returned by a successful create.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCreatedResponse {
    pub message: String,

    /// Server-generated id of the new post
    pub id: String,

    pub created_date: String,
}

/// Body carrying a human-readable confirmation.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

impl PostError {
    /// HTTP status and a short machine-readable error type.
    ///
    /// Client input problems are 4xx; failures of the store or blob service
    /// are 502, and faults on our side are 500.
    pub fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            PostError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            PostError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            PostError::Store(store_err) => match store_err {
                StoreError::Connection(_) => (StatusCode::BAD_GATEWAY, "store_unavailable"),
                StoreError::Service(_) => (StatusCode::BAD_GATEWAY, "store_error"),
                StoreError::Decode(_) => (StatusCode::INTERNAL_SERVER_ERROR, "malformed_item"),
                StoreError::Conflict(_) => (StatusCode::INTERNAL_SERVER_ERROR, "id_conflict"),
            },
            PostError::BlobLink(blob_err) => match blob_err {
                BlobError::Presign { .. } => (StatusCode::BAD_GATEWAY, "blob_link_error"),
                BlobError::InvalidExpiry(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "invalid_link_expiry")
                }
            },
        }
    }
}

/// Convert PostError to HTTP response.
///
/// The body is always `{"error": "<message>"}`. Logging follows severity:
/// - 5xx errors are logged at ERROR level
/// - 404s are logged at DEBUG level
/// - other 4xx errors are logged at WARN level
impl IntoResponse for PostError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.classify();
        let message = self.to_string();

        if status.is_server_error() {
            error!(
                error_type = error_type,
                status = status.as_u16(),
                "Server error: {}",
                message
            );
        } else if status == StatusCode::NOT_FOUND {
            debug!(
                error_type = error_type,
                status = status.as_u16(),
                "Resource not found: {}",
                message
            );
        } else {
            warn!(
                error_type = error_type,
                status = status.as_u16(),
                "Client error: {}",
                message
            );
        }

        json_response(status, &ErrorBody::new(message))
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle requests on the collection path.
///
/// # Endpoint
///
/// `ANY /posts`
///
/// - `GET` lists overviews: `200 OK` with a JSON array of
///   `{id, title, author, summary, tags}`
/// - `POST` creates a post from the JSON body: `201 Created` with
///   `{message, id, createdDate}` and a `Location` header
/// - `DELETE` has no id to act on: `400 Bad Request`
/// - anything else: `405 Method Not Allowed`
pub async fn collection_handler<S, L>(
    State(state): State<AppState<S, L>>,
    method: Method,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Response
where
    S: PostStore + 'static,
    L: LinkSigner + 'static,
{
    dispatch(&state, &method, None, query, body).await
}

/// Handle requests on the item path.
///
/// # Endpoint
///
/// `ANY /posts/{id}`
///
/// # Query Parameters
///
/// - `createdDate`: must match the stored creation date when given (GET only)
///
/// # Response
///
/// - `GET`: `200 OK` with the full post; `images` holds presigned links
/// - `DELETE`: `200 OK` with `{"message": "Delete the post with ID: <id>"}`
/// - `POST`: same as `POST /posts`, the id is ignored
/// - anything else: `405 Method Not Allowed`
///
/// # Errors
///
/// - `400 Bad Request`: Invalid input, including an undecodable id
/// - `404 Not Found`: No post under the id (or createdDate mismatch)
/// - `413 Payload Too Large`: Create body over the request limit
/// - `500 Internal Server Error`: Malformed stored item
/// - `502 Bad Gateway`: Store or blob service failure
pub async fn item_handler<S, L>(
    State(state): State<AppState<S, L>>,
    method: Method,
    id: Result<Path<String>, PathRejection>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Response
where
    S: PostStore + 'static,
    L: LinkSigner + 'static,
{
    let id = match id {
        Ok(Path(id)) => id,
        // The id only matters to get and delete
        Err(rejection) => match Route::resolve(&method, None) {
            Route::MethodNotAllowed => return method_not_allowed(&method),
            Route::Create => String::new(),
            _ => return rejection_response(rejection.status(), rejection.body_text()),
        },
    };

    dispatch(&state, &method, Some(&id), query, body).await
}

/// Run the operation selected by the route decision.
///
/// Extractor rejections are only reported by the operations that read the
/// rejected part, so an unsupported method is always a 405.
async fn dispatch<S: PostStore, L: LinkSigner>(
    state: &AppState<S, L>,
    method: &Method,
    id: Option<&str>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let service = &state.service;

    let result = match Route::resolve(method, id) {
        Route::GetById(id) => {
            let Query(query) = match query {
                Ok(query) => query,
                Err(rejection) => {
                    return rejection_response(rejection.status(), rejection.body_text())
                }
            };
            let created_date = query.get(CREATED_DATE_PARAM).map(String::as_str);
            service
                .get_by_id(id, created_date)
                .await
                .map(|post| json_response(StatusCode::OK, &post))
        }
        Route::ListOverview => service
            .list_overview()
            .await
            .map(|overviews| json_response(StatusCode::OK, &overviews)),
        Route::Create => {
            let body = match body {
                Ok(body) => body,
                Err(rejection) => {
                    return rejection_response(rejection.status(), rejection.body_text())
                }
            };
            match NewPost::from_json(&body) {
                Ok(input) => service.create(input).await.map(|post| created_response(&post)),
                Err(e) => Err(e),
            }
        }
        Route::Delete(id) => {
            let id = id.unwrap_or_default();
            service.delete(id).await.map(|()| {
                json_response(
                    StatusCode::OK,
                    &MessageResponse {
                        message: format!("Delete the post with ID: {}", id),
                    },
                )
            })
        }
        Route::MethodNotAllowed => Ok(method_not_allowed(method)),
    };

    result.unwrap_or_else(IntoResponse::into_response)
}

fn method_not_allowed(method: &Method) -> Response {
    debug!(method = %method, "Method not allowed");
    json_response(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_MESSAGE)
}

/// Answer an extractor rejection inside the JSON envelope.
fn rejection_response(status: StatusCode, message: String) -> Response {
    warn!(status = status.as_u16(), "Rejected request: {}", message);
    json_response(status, &ErrorBody::new(message))
}

fn created_response(post: &Post) -> Response {
    let mut response = json_response(
        StatusCode::CREATED,
        &PostCreatedResponse {
            message: CREATED_MESSAGE.to_string(),
            id: post.id.clone(),
            created_date: post.created_date.clone(),
        },
    );

    if let Ok(location) = HeaderValue::from_str(&format!("/posts/{}", post.id)) {
        response.headers_mut().insert(header::LOCATION, location);
    }

    response
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Response {
    json_response(
        StatusCode::OK,
        &HealthResponse {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    )
}

/// Handle requests for paths outside the API.
pub async fn fallback_handler(uri: Uri) -> Response {
    json_response(
        StatusCode::NOT_FOUND,
        &ErrorBody::new(format!("Route not found: {}", uri.path())),
    )
}
