//! Document store for post records.
//!
//! Operations talk to the store through the [`PostStore`] trait so they can
//! run against DynamoDB in production and an in-memory map in tests.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              PostService                │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │           PostStore Trait               │
//! │  put / get / delete / scan_overviews    │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │          DynamoPostStore                │
//! │   (one table, partition key "id")       │
//! └─────────────────────────────────────────┘
//! ```

mod dynamodb;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::post::{Post, PostOverview};

pub use dynamodb::{
    create_dynamodb_client, item_to_overview, item_to_post, post_to_item, DynamoPostStore, Item,
    OVERVIEW_ATTRIBUTES,
};

/// Key-addressed storage for posts, keyed by `id`.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Write a new post.
    ///
    /// Fails with [`StoreError::Conflict`] if a post with the same id exists.
    async fn put(&self, post: &Post) -> Result<(), StoreError>;

    /// Point lookup. `Ok(None)` when nothing is stored under `id`.
    async fn get(&self, id: &str) -> Result<Option<Post>, StoreError>;

    /// Remove the post stored under `id`. Removing a missing id succeeds.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Every stored post, projected to the overview fields.
    async fn scan_overviews(&self) -> Result<Vec<PostOverview>, StoreError>;
}
