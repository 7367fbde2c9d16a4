//! DynamoDB-backed implementation of `PostStore`.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use tracing::debug;

use super::PostStore;
use crate::error::StoreError;
use crate::post::{Post, PostOverview};

/// A raw DynamoDB item.
pub type Item = HashMap<String, AttributeValue>;

/// Attributes fetched by the overview scan.
pub const OVERVIEW_ATTRIBUTES: [&str; 5] = ["id", "title", "author", "summary", "tags"];

/// DynamoDB-backed implementation of `PostStore`.
///
/// Posts live in a single table whose partition key is the string
/// attribute `id`.
#[derive(Clone)]
pub struct DynamoPostStore {
    client: Client,
    table: String,
}

impl DynamoPostStore {
    /// Create a store over the given table.
    pub fn new(client: Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    /// Get the table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    fn id_key(id: &str) -> AttributeValue {
        AttributeValue::S(id.to_string())
    }
}

#[async_trait]
impl PostStore for DynamoPostStore {
    async fn put(&self, post: &Post) -> Result<(), StoreError> {
        debug!(table = %self.table, id = %post.id, "Putting post");

        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(post_to_item(post)))
            .condition_expression("attribute_not_exists(#id)")
            .expression_attribute_names("#id", "id")
            .send()
            .await
            .map_err(|e| {
                let conflict = e
                    .as_service_error()
                    .map(|se| se.is_conditional_check_failed_exception())
                    .unwrap_or(false);

                if conflict {
                    StoreError::Conflict(post.id.clone())
                } else {
                    sdk_error(e)
                }
            })?;

        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Post>, StoreError> {
        debug!(table = %self.table, id, "Getting post");

        let output = self
            .client
            .get_item()
            .table_name(&self.table)
            .key("id", Self::id_key(id))
            .send()
            .await
            .map_err(sdk_error)?;

        output.item().map(item_to_post).transpose()
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        debug!(table = %self.table, id, "Deleting post");

        self.client
            .delete_item()
            .table_name(&self.table)
            .key("id", Self::id_key(id))
            .send()
            .await
            .map_err(sdk_error)?;

        Ok(())
    }

    async fn scan_overviews(&self) -> Result<Vec<PostOverview>, StoreError> {
        let projection = OVERVIEW_ATTRIBUTES
            .iter()
            .map(|name| format!("#{}", name))
            .collect::<Vec<_>>()
            .join(", ");
        let names: HashMap<String, String> = OVERVIEW_ATTRIBUTES
            .iter()
            .map(|name| (format!("#{}", name), name.to_string()))
            .collect();

        let mut overviews = Vec::new();
        let mut start_key: Option<Item> = None;
        let mut pages = 0usize;

        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table)
                .projection_expression(&projection)
                .set_expression_attribute_names(Some(names.clone()))
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(sdk_error)?;
            pages += 1;

            for item in output.items() {
                overviews.push(item_to_overview(item)?);
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        debug!(
            table = %self.table,
            pages,
            count = overviews.len(),
            "Scanned post overviews"
        );

        Ok(overviews)
    }
}

// =============================================================================
// Item Mapping
// =============================================================================

/// Encode a post as a DynamoDB item. Sequences become lists of strings.
pub fn post_to_item(post: &Post) -> Item {
    HashMap::from([
        ("id".to_string(), AttributeValue::S(post.id.clone())),
        ("title".to_string(), AttributeValue::S(post.title.clone())),
        ("author".to_string(), AttributeValue::S(post.author.clone())),
        ("summary".to_string(), AttributeValue::S(post.summary.clone())),
        ("content".to_string(), AttributeValue::S(post.content.clone())),
        ("images".to_string(), string_list(&post.images)),
        ("tags".to_string(), string_list(&post.tags)),
        (
            "createdDate".to_string(),
            AttributeValue::S(post.created_date.clone()),
        ),
    ])
}

/// Decode a full post item.
///
/// Only `id` is mandatory. Text attributes that are absent or `NULL` decode
/// as empty strings and list attributes as empty lists, which is how older
/// writers stored empty values.
pub fn item_to_post(item: &Item) -> Result<Post, StoreError> {
    Ok(Post {
        id: required_string(item, "id")?,
        title: optional_string(item, "title")?,
        author: optional_string(item, "author")?,
        summary: optional_string(item, "summary")?,
        content: optional_string(item, "content")?,
        images: string_list_attr(item, "images")?,
        tags: string_list_attr(item, "tags")?,
        created_date: optional_string(item, "createdDate")?,
    })
}

/// Decode a projected overview item.
pub fn item_to_overview(item: &Item) -> Result<PostOverview, StoreError> {
    Ok(PostOverview {
        id: required_string(item, "id")?,
        title: optional_string(item, "title")?,
        author: optional_string(item, "author")?,
        summary: optional_string(item, "summary")?,
        tags: string_list_attr(item, "tags")?,
    })
}

fn string_list(values: &[String]) -> AttributeValue {
    AttributeValue::L(values.iter().cloned().map(AttributeValue::S).collect())
}

fn required_string(item: &Item, name: &str) -> Result<String, StoreError> {
    match item.get(name) {
        Some(AttributeValue::S(value)) => Ok(value.clone()),
        Some(other) => Err(type_error(name, other)),
        None => Err(StoreError::Decode(format!("missing attribute '{}'", name))),
    }
}

fn optional_string(item: &Item, name: &str) -> Result<String, StoreError> {
    match item.get(name) {
        Some(AttributeValue::S(value)) => Ok(value.clone()),
        None | Some(AttributeValue::Null(_)) => Ok(String::new()),
        Some(other) => Err(type_error(name, other)),
    }
}

fn string_list_attr(item: &Item, name: &str) -> Result<Vec<String>, StoreError> {
    match item.get(name) {
        Some(AttributeValue::L(values)) => values
            .iter()
            .map(|value| match value {
                AttributeValue::S(s) => Ok(s.clone()),
                other => Err(type_error(name, other)),
            })
            .collect(),
        Some(AttributeValue::Ss(values)) => Ok(values.clone()),
        None | Some(AttributeValue::Null(_)) => Ok(Vec::new()),
        Some(other) => Err(type_error(name, other)),
    }
}

fn type_error(name: &str, value: &AttributeValue) -> StoreError {
    StoreError::Decode(format!(
        "attribute '{}' has unexpected value {:?}",
        name, value
    ))
}

/// Classify an SDK failure: no response at all is a connection error,
/// anything else came from the service.
fn sdk_error<E, R>(err: SdkError<E, R>) -> StoreError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(&err).to_string();
    match err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
            StoreError::Connection(message)
        }
        _ => StoreError::Service(message),
    }
}

/// Create a DynamoDB client from the shared SDK configuration.
///
/// Pass an endpoint to target DynamoDB Local or another emulator:
/// ```ignore
/// let client = create_dynamodb_client(&sdk_config, Some("http://localhost:8000"));
/// ```
pub fn create_dynamodb_client(sdk_config: &SdkConfig, endpoint_url: Option<&str>) -> Client {
    let mut builder = aws_sdk_dynamodb::config::Builder::from(sdk_config);

    if let Some(endpoint) = endpoint_url {
        builder = builder.endpoint_url(endpoint);
    }

    Client::from_conf(builder.build())
}
