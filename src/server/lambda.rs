//! Adapter between API Gateway events and the router.
//!
//! `lambda_http` prefixes the URI path of REST API proxy events with the
//! stage name (`/prod/posts`), while the router matches `/posts`. Requests
//! are rewritten to the raw resource path before they reach the router.
//!
//! # Example
//!
//! ```ignore
//! let router = create_router(service, RouterConfig::new());
//! lambda_http::run(lambda_app(router)).await?;
//! ```

use axum::Router;
use http::uri::{PathAndQuery, Uri};
use lambda_http::RequestExt;
use tower::util::MapRequest;
use tower::ServiceExt;
use tracing::{debug, warn};

/// Request rewrite applied in front of the router.
pub type StageRewrite = fn(lambda_http::Request) -> lambda_http::Request;

/// The router as served by the Lambda runtime.
pub type LambdaApp = MapRequest<Router, StageRewrite>;

/// Wrap the router so it sees the path without the stage prefix.
pub fn lambda_app(router: Router) -> LambdaApp {
    ServiceExt::<lambda_http::Request>::map_request(router, strip_stage_prefix as StageRewrite)
}

/// Replace the request path with the raw path recorded by `lambda_http`.
///
/// Requests without a raw path (local servers, tests) pass through
/// unchanged. The query string is kept.
pub fn strip_stage_prefix(mut request: lambda_http::Request) -> lambda_http::Request {
    let raw_path = request.raw_http_path();
    if raw_path.is_empty() || raw_path == request.uri().path() {
        return request;
    }

    let path_and_query = match request.uri().query() {
        Some(query) => format!("{}?{}", raw_path, query),
        None => raw_path.to_string(),
    };

    let path_and_query = match PathAndQuery::try_from(path_and_query) {
        Ok(path_and_query) => path_and_query,
        Err(e) => {
            warn!(uri = %request.uri(), "Keeping request path, raw path is invalid: {}", e);
            return request;
        }
    };

    let mut parts = request.uri().clone().into_parts();
    parts.path_and_query = Some(path_and_query);

    match Uri::from_parts(parts) {
        Ok(uri) => {
            debug!(from = %request.uri(), to = %uri, "Stripped stage prefix");
            *request.uri_mut() = uri;
        }
        Err(e) => warn!(uri = %request.uri(), "Failed to rebuild request URI: {}", e),
    }

    request
}
