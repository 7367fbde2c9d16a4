//! HTTP layer for the blog posts API.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │             /posts              /posts/{id}                     │
//! │                                                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────────┐  │
//! │  │   routes    │  │  handlers   │  │       response          │  │
//! │  │ (dispatch)  │  │ (operations)│  │  (JSON + CORS headers)  │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod lambda;
pub mod response;
pub mod routes;

pub use handlers::{
    collection_handler, health_handler, item_handler, AppState, HealthResponse, MessageResponse,
    PostCreatedResponse,
};
pub use lambda::{lambda_app, strip_stage_prefix, LambdaApp};
pub use response::{json_response, ErrorBody};
pub use routes::{create_router, Route, RouterConfig};
