//! Post records and the shapes they take on the wire.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::PostError;

/// Format of the `createdDate` attribute (UTC calendar date).
pub const CREATED_DATE_FORMAT: &str = "%Y-%m-%d";

/// A blog post as stored in the document store.
///
/// `images` holds blob-store object keys. Read responses swap them for
/// time-limited links; the stored record always keeps the raw keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Server-generated identifier, immutable once assigned
    pub id: String,
    pub title: String,
    pub author: String,
    pub summary: String,
    pub content: String,
    /// Object keys in the image bucket
    pub images: Vec<String>,
    pub tags: Vec<String>,
    /// Creation date, `YYYY-MM-DD`
    pub created_date: String,
}

impl Post {
    /// Field subset returned by the list endpoint.
    pub fn overview(&self) -> PostOverview {
        PostOverview {
            id: self.id.clone(),
            title: self.title.clone(),
            author: self.author.clone(),
            summary: self.summary.clone(),
            tags: self.tags.clone(),
        }
    }
}

/// Read-time projection of a post: no content, images or creation date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostOverview {
    pub id: String,
    pub title: String,
    pub author: String,
    pub summary: String,
    pub tags: Vec<String>,
}

/// Client input for creating a post.
///
/// Any `id` or `createdDate` in the body is ignored; both are assigned
/// server-side.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub author: String,
    pub summary: String,
    pub content: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewPost {
    /// Parse and validate a JSON request body.
    pub fn from_json(body: &[u8]) -> Result<Self, PostError> {
        let post: NewPost = serde_json::from_slice(body)
            .map_err(|e| PostError::Validation(format!("invalid post body: {}", e)))?;
        post.validate()?;
        Ok(post)
    }

    /// Check the fields serde cannot check on its own.
    pub fn validate(&self) -> Result<(), PostError> {
        if self.title.trim().is_empty() {
            return Err(PostError::Validation("title must not be empty".to_string()));
        }
        if self.images.iter().any(|key| key.trim().is_empty()) {
            return Err(PostError::Validation(
                "image keys must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Turn the input into a full record under the assigned id and date.
    pub fn into_post(self, id: String, created_date: String) -> Post {
        Post {
            id,
            title: self.title,
            author: self.author,
            summary: self.summary,
            content: self.content,
            images: self.images,
            tags: self.tags,
            created_date,
        }
    }
}

/// Today's date in UTC, formatted for `createdDate`.
pub fn today() -> String {
    Utc::now().format(CREATED_DATE_FORMAT).to_string()
}
