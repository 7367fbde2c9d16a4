use thiserror::Error;

/// Errors from the document store holding post records
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The store answered with an error (throttling, missing table, bad request)
    #[error("Store service error: {0}")]
    Service(String),

    /// The request never got an answer (DNS, TLS, timeout)
    #[error("Connection error: {0}")]
    Connection(String),

    /// A stored item does not have the expected shape
    #[error("Malformed item: {0}")]
    Decode(String),

    /// A conditional write found an item already stored under the key
    #[error("Post already exists: {0}")]
    Conflict(String),
}

/// Errors from the blob store while issuing time-limited links
#[derive(Debug, Clone, Error)]
pub enum BlobError {
    /// The presigning call failed for an object key
    #[error("Failed to presign link for {key}: {message}")]
    Presign { key: String, message: String },

    /// The link validity window is outside what presigning accepts
    #[error("Invalid link expiry: {0}")]
    InvalidExpiry(String),
}

/// Errors returned by the post operations
#[derive(Debug, Clone, Error)]
pub enum PostError {
    /// Malformed client input (bad create body, missing id)
    #[error("Validation error: {0}")]
    Validation(String),

    /// No post stored under the requested key
    #[error("Post not found: {id}")]
    NotFound { id: String },

    /// Document store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Blob store link failure
    #[error(transparent)]
    BlobLink(#[from] BlobError),
}
