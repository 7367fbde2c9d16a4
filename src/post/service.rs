//! Post operations.
//!
//! `PostService` owns the document store, the link signer and the link
//! validity window. It is built once at startup and shared by every request.

use std::time::Duration;

use tracing::{debug, info};
use uuid::Uuid;

use super::model::{today, NewPost, Post, PostOverview};
use crate::blob::{LinkSigner, DEFAULT_LINK_TTL};
use crate::error::PostError;
use crate::store::PostStore;

/// The four post operations over a store and a link signer.
pub struct PostService<S, L> {
    store: S,
    signer: L,
    link_ttl: Duration,
}

impl<S: PostStore, L: LinkSigner> PostService<S, L> {
    /// Create a service with the default link validity window.
    pub fn new(store: S, signer: L) -> Self {
        Self::with_link_ttl(store, signer, DEFAULT_LINK_TTL)
    }

    /// Create a service with a custom link validity window.
    pub fn with_link_ttl(store: S, signer: L, link_ttl: Duration) -> Self {
        Self {
            store,
            signer,
            link_ttl,
        }
    }

    /// Get the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the link validity window.
    pub fn link_ttl(&self) -> Duration {
        self.link_ttl
    }

    /// Store a new post under a fresh id, stamped with today's date.
    ///
    /// Returns the stored record (with raw image keys).
    pub async fn create(&self, input: NewPost) -> Result<Post, PostError> {
        input.validate()?;

        let post = input.into_post(Uuid::new_v4().to_string(), today());
        self.store.put(&post).await?;

        info!(id = %post.id, created_date = %post.created_date, "Created post");
        Ok(post)
    }

    /// Overview of every stored post.
    pub async fn list_overview(&self) -> Result<Vec<PostOverview>, PostError> {
        let overviews = self.store.scan_overviews().await?;
        debug!(count = overviews.len(), "Listed post overviews");
        Ok(overviews)
    }

    /// Fetch one post, with every image key replaced by a time-limited link.
    ///
    /// When `created_date` is given it must match the stored date, otherwise
    /// the post counts as not found.
    pub async fn get_by_id(
        &self,
        id: &str,
        created_date: Option<&str>,
    ) -> Result<Post, PostError> {
        let id = require_id(id)?;

        let mut post = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| PostError::NotFound { id: id.to_string() })?;

        if let Some(date) = created_date.filter(|d| !d.is_empty()) {
            if date != post.created_date {
                debug!(id, requested = date, stored = %post.created_date, "createdDate mismatch");
                return Err(PostError::NotFound { id: id.to_string() });
            }
        }

        for image in post.images.iter_mut() {
            *image = self.signer.presign_get(image, self.link_ttl).await?;
        }

        Ok(post)
    }

    /// Delete a post by id. Deleting a missing id succeeds.
    pub async fn delete(&self, id: &str) -> Result<(), PostError> {
        let id = require_id(id)?;
        self.store.delete(id).await?;

        info!(id, "Deleted post");
        Ok(())
    }
}

fn require_id(id: &str) -> Result<&str, PostError> {
    if id.trim().is_empty() {
        return Err(PostError::Validation("post id is required".to_string()));
    }
    Ok(id)
}
