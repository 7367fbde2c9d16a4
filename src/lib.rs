//! # Blog Posts API
//!
//! A serverless HTTP API for blog posts. Posts are stored in DynamoDB;
//! images live in S3 and are handed out as time-limited presigned links.
//!
//! ## Operations
//!
//! - **Create** (`POST /posts`): stores a post under a server-generated id
//! - **List overview** (`GET /posts`): id, title, author, summary and tags
//!   of every post
//! - **Get by id** (`GET /posts/{id}`): the full post with image links
//! - **Delete** (`DELETE /posts/{id}`)
//!
//! ## Architecture
//!
//! - [`post`] - Post records and the operations over them
//! - [`store`] - Document store trait and the DynamoDB implementation
//! - [`blob`] - Link signer trait and the S3 presigning implementation
//! - [`server`] - Axum router, handlers and the JSON response envelope
//! - [`config`] - CLI and configuration types
//!
//! The router is a plain [`axum::Router`], so the binary can hand it to the
//! Lambda runtime or serve it locally.
//!
//! ## Example
//!
//! ```rust,no_run
//! use blog_posts_api::{
//!     create_dynamodb_client, create_router, create_s3_client, DynamoPostStore, PostService,
//!     RouterConfig, S3LinkSigner,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
//!
//!     let store = DynamoPostStore::new(create_dynamodb_client(&sdk_config, None), "blog-db");
//!     let signer = S3LinkSigner::new(create_s3_client(&sdk_config, None), "blog-api-s3-bucket");
//!     let router = create_router(PostService::new(store, signer), RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod blob;
pub mod config;
pub mod error;
pub mod post;
pub mod server;
pub mod store;

// Re-export commonly used types
pub use blob::{create_s3_client, LinkSigner, S3LinkSigner, DEFAULT_LINK_TTL, MAX_LINK_TTL};
pub use config::{
    AwsConfig, CheckConfig, Cli, Command, LambdaConfig, PresignConfig, ServeConfig,
    DEFAULT_BUCKET_NAME, DEFAULT_TABLE_NAME,
};
pub use error::{BlobError, PostError, StoreError};
pub use post::{NewPost, Post, PostOverview, PostService};
pub use server::{create_router, lambda_app, AppState, ErrorBody, Route, RouterConfig};
pub use store::{create_dynamodb_client, DynamoPostStore, PostStore};
