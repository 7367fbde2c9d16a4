//! Time-limited access links for post images.
//!
//! Posts store blob-store object keys. On read each key is exchanged for a
//! presigned GET link through a [`LinkSigner`].

mod s3_signer;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::BlobError;

pub use s3_signer::{create_s3_client, S3LinkSigner};

/// Default link validity window (72 hours).
pub const DEFAULT_LINK_TTL: Duration = Duration::from_secs(72 * 60 * 60);

/// Longest window presigned links accept (7 days).
pub const MAX_LINK_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Issues time-limited read links for objects in one bucket.
#[async_trait]
pub trait LinkSigner: Send + Sync {
    /// Link granting read access to `key` for `expires_in`.
    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, BlobError>;
}
