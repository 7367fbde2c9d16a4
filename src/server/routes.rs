//! Router configuration for the blog posts API.
//!
//! # Route Structure
//!
//! ```text
//! /health          - Health check
//! /posts           - List (GET) and create (POST)
//! /posts/{id}      - Get (GET) and delete (DELETE)
//! ```
//!
//! Both `/posts` routes accept every method. [`Route::resolve`] makes the
//! four-way choice, and everything else is answered with 405.
//!
//! # Example
//!
//! ```ignore
//! use blog_posts_api::server::routes::{create_router, RouterConfig};
//! use blog_posts_api::post::PostService;
//!
//! let service = PostService::new(store, signer);
//! let router = create_router(service, RouterConfig::new());
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

use axum::{
    routing::{any, get},
    Router,
};
use http::Method;
use tower_http::trace::TraceLayer;

use super::handlers::{
    collection_handler, fallback_handler, health_handler, item_handler, AppState,
};
use crate::blob::LinkSigner;
use crate::post::PostService;
use crate::store::PostStore;

// =============================================================================
// Route Decision
// =============================================================================

/// The operation selected for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    /// `GET` with a non-empty id
    GetById(&'a str),
    /// `GET` without an id
    ListOverview,
    /// `POST`, with or without an id
    Create,
    /// `DELETE`; the id may be missing and is checked by the operation
    Delete(Option<&'a str>),
    /// Any other method
    MethodNotAllowed,
}

impl<'a> Route<'a> {
    /// Pick the operation from the method and the optional `id` path
    /// parameter. No other validation happens here.
    pub fn resolve(method: &Method, id: Option<&'a str>) -> Self {
        match *method {
            Method::GET => match id.filter(|id| !id.is_empty()) {
                Some(id) => Route::GetById(id),
                None => Route::ListOverview,
            },
            Method::POST => Route::Create,
            Method::DELETE => Route::Delete(id),
            _ => Route::MethodNotAllowed,
        }
    }
}

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a router configuration with tracing enabled.
    pub fn new() -> Self {
        Self {
            enable_tracing: true,
        }
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the application router.
///
/// The same router serves the local HTTP server and the Lambda runtime.
pub fn create_router<S, L>(service: PostService<S, L>, config: RouterConfig) -> Router
where
    S: PostStore + 'static,
    L: LinkSigner + 'static,
{
    let app_state = AppState::new(service);

    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/posts", any(collection_handler::<S, L>))
        .route("/posts/{id}", any(item_handler::<S, L>))
        .fallback(fallback_handler)
        .with_state(app_state);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}
