//! API integration tests for routing, the response envelope and errors.
//!
//! Tests verify:
//! - Each method/path pair reaches the right operation
//! - Unsupported methods get 405 whatever the parameters
//! - Every response carries the static CORS and content-type headers
//! - Error classes map to the right status with an `{"error"}` body

use blog_posts_api::error::StoreError;
use blog_posts_api::post::today;

use super::test_utils::{
    assert_envelope_headers, create_body, sample_post, send, test_router, FailingLinkSigner,
    FailingPostStore, FakeLinkSigner, MemoryPostStore,
};

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_returns_201_with_id() {
    let store = MemoryPostStore::new();
    let router = test_router(store.clone(), FakeLinkSigner::new());

    let response = send(
        &router,
        "POST",
        "/posts",
        Some(create_body("A", &[], &["x"])),
    )
    .await;

    assert_eq!(response.status, 201);
    assert_envelope_headers(&response.headers);
    assert_eq!(response.json["message"], "Post created successfully.");

    let id = response.json["id"].as_str().unwrap();
    assert!(!id.is_empty());
    assert_eq!(response.json["createdDate"], today());
    assert_eq!(
        response.headers.get("location").unwrap(),
        format!("/posts/{}", id).as_str()
    );

    let stored = store.stored(id).await.unwrap();
    assert_eq!(stored.title, "A");
    assert_eq!(stored.created_date, today());
}

#[tokio::test]
async fn test_create_malformed_body_is_400() {
    let store = MemoryPostStore::new();
    let router = test_router(store.clone(), FakeLinkSigner::new());

    for body in [None, Some("{".to_string()), Some(r#"{"title":"A"}"#.to_string())] {
        let response = send(&router, "POST", "/posts", body).await;
        assert_eq!(response.status, 400);
        assert_envelope_headers(&response.headers);
        assert!(response.json["error"]
            .as_str()
            .unwrap()
            .starts_with("Validation error"));
    }

    assert_eq!(store.len().await, 0);
}

#[tokio::test]
async fn test_post_on_item_path_creates() {
    let store = MemoryPostStore::new();
    let router = test_router(store.clone(), FakeLinkSigner::new());

    let response = send(
        &router,
        "POST",
        "/posts/ignored",
        Some(create_body("A", &[], &[])),
    )
    .await;

    assert_eq!(response.status, 201);
    assert_ne!(response.json["id"], "ignored");
    assert_eq!(store.len().await, 1);
}

// =============================================================================
// Create Then Get (the documented example)
// =============================================================================

#[tokio::test]
async fn test_create_then_get_example() {
    let router = test_router(MemoryPostStore::new(), FakeLinkSigner::new());

    let created = send(
        &router,
        "POST",
        "/posts",
        Some(
            r#"{"title":"A","author":"B","summary":"C","content":"D","images":[],"tags":["x"]}"#
                .to_string(),
        ),
    )
    .await;
    assert_eq!(created.status, 201);
    let id = created.json["id"].as_str().unwrap().to_string();

    let fetched = send(&router, "GET", &format!("/posts/{}", id), None).await;
    assert_eq!(fetched.status, 200);
    assert_envelope_headers(&fetched.headers);
    assert_eq!(fetched.json["title"], "A");
    assert_eq!(fetched.json["id"], id.as_str());
    assert_eq!(fetched.json["tags"], serde_json::json!(["x"]));
}

// =============================================================================
// List Overview
// =============================================================================

#[tokio::test]
async fn test_list_empty_store_is_empty_array() {
    let router = test_router(MemoryPostStore::new(), FakeLinkSigner::new());

    let response = send(&router, "GET", "/posts", None).await;
    assert_eq!(response.status, 200);
    assert_envelope_headers(&response.headers);
    assert_eq!(response.json, serde_json::json!([]));
}

#[tokio::test]
async fn test_list_returns_projection() {
    let store = MemoryPostStore::new();
    store.insert(sample_post("a", &["images/a.png"])).await;
    store.insert(sample_post("b", &[])).await;
    let signer = FakeLinkSigner::new();
    let router = test_router(store.clone(), signer.clone());

    let response = send(&router, "GET", "/posts", None).await;
    assert_eq!(response.status, 200);

    let entries = response.json.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    for entry in entries {
        let object = entry.as_object().unwrap();
        assert!(!object.contains_key("content"));
        assert!(!object.contains_key("images"));
        assert!(!object.contains_key("createdDate"));
        assert_eq!(object["author"], "Ada");
    }

    // Listing never signs links
    assert_eq!(signer.call_count(), 0);
    assert_eq!(store.scan_count(), 1);
}

// =============================================================================
// Get By Id
// =============================================================================

#[tokio::test]
async fn test_get_resolves_image_links() {
    let store = MemoryPostStore::new();
    store
        .insert(sample_post("p1", &["images/a.png", "images/b.png"]))
        .await;
    let signer = FakeLinkSigner::new();
    let router = test_router(store.clone(), signer.clone());

    let response = send(&router, "GET", "/posts/p1", None).await;
    assert_eq!(response.status, 200);
    assert_eq!(response.json["content"], "The full body of the post");

    let images = response.json["images"].as_array().unwrap();
    assert_eq!(images.len(), 2);
    assert_eq!(
        images[0],
        "https://images.test/images/a.png?X-Amz-Expires=259200"
    );
    assert_eq!(
        images[1],
        "https://images.test/images/b.png?X-Amz-Expires=259200"
    );
    assert_eq!(signer.call_count(), 2);

    // The stored record keeps the raw keys
    let stored = store.stored("p1").await.unwrap();
    assert_eq!(stored.images, vec!["images/a.png", "images/b.png"]);
}

#[tokio::test]
async fn test_get_missing_post_is_404() {
    let router = test_router(MemoryPostStore::new(), FakeLinkSigner::new());

    let response = send(&router, "GET", "/posts/nope", None).await;
    assert_eq!(response.status, 404);
    assert_envelope_headers(&response.headers);
    assert_eq!(response.json["error"], "Post not found: nope");
}

#[tokio::test]
async fn test_get_with_created_date() {
    let store = MemoryPostStore::new();
    store.insert(sample_post("p1", &[])).await;
    let router = test_router(store, FakeLinkSigner::new());

    let response = send(&router, "GET", "/posts/p1?createdDate=2024-05-01", None).await;
    assert_eq!(response.status, 200);
    assert_eq!(response.json["createdDate"], "2024-05-01");

    let response = send(&router, "GET", "/posts/p1?createdDate=2023-01-01", None).await;
    assert_eq!(response.status, 404);

    // An empty value is the same as no value
    let response = send(&router, "GET", "/posts/p1?createdDate=", None).await;
    assert_eq!(response.status, 200);
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_existing_post() {
    let store = MemoryPostStore::new();
    store.insert(sample_post("p1", &[])).await;
    let router = test_router(store.clone(), FakeLinkSigner::new());

    let response = send(&router, "DELETE", "/posts/p1", None).await;
    assert_eq!(response.status, 200);
    assert_envelope_headers(&response.headers);
    assert_eq!(response.json["message"], "Delete the post with ID: p1");

    assert!(store.stored("p1").await.is_none());
    assert_eq!(send(&router, "GET", "/posts/p1", None).await.status, 404);
    assert_eq!(
        send(&router, "GET", "/posts", None).await.json,
        serde_json::json!([])
    );
}

#[tokio::test]
async fn test_delete_missing_post_is_ok() {
    let router = test_router(MemoryPostStore::new(), FakeLinkSigner::new());

    let response = send(&router, "DELETE", "/posts/never-existed", None).await;
    assert_eq!(response.status, 200);
    assert_eq!(
        response.json["message"],
        "Delete the post with ID: never-existed"
    );
}

#[tokio::test]
async fn test_delete_without_id_is_400() {
    let router = test_router(MemoryPostStore::new(), FakeLinkSigner::new());

    let response = send(&router, "DELETE", "/posts", None).await;
    assert_eq!(response.status, 400);
    assert_eq!(
        response.json["error"],
        "Validation error: post id is required"
    );
}

// =============================================================================
// Method Not Allowed
// =============================================================================

#[tokio::test]
async fn test_unsupported_methods_are_405() {
    let store = MemoryPostStore::new();
    store.insert(sample_post("p1", &[])).await;
    let router = test_router(store.clone(), FakeLinkSigner::new());

    for method in ["PATCH", "PUT", "OPTIONS"] {
        for uri in ["/posts", "/posts/p1", "/posts/p1?createdDate=2024-05-01"] {
            let response = send(
                &router,
                method,
                uri,
                Some(create_body("A", &[], &[])),
            )
            .await;
            assert_eq!(response.status, 405, "{} {}", method, uri);
            assert_envelope_headers(&response.headers);
            assert_eq!(response.json, "Method Not Allowed.");
        }
    }

    // Nothing was touched
    assert_eq!(store.len().await, 1);
    assert_eq!(store.stored("p1").await.unwrap().title, "Title p1");
}

#[tokio::test]
async fn test_undecodable_id_is_405_for_unsupported_methods() {
    let router = test_router(MemoryPostStore::new(), FakeLinkSigner::new());

    for method in ["PATCH", "PUT", "OPTIONS"] {
        let response = send(&router, method, "/posts/%FF", None).await;
        assert_eq!(response.status, 405, "{}", method);
        assert_envelope_headers(&response.headers);
        assert_eq!(response.json, "Method Not Allowed.");
    }
}

// =============================================================================
// Rejected Requests
// =============================================================================

#[tokio::test]
async fn test_undecodable_id_is_json_400() {
    let store = MemoryPostStore::new();
    let router = test_router(store.clone(), FakeLinkSigner::new());

    for method in ["GET", "DELETE"] {
        let response = send(&router, method, "/posts/%FF", None).await;
        assert_eq!(response.status, 400, "{}", method);
        assert_envelope_headers(&response.headers);
        assert!(response.json["error"].is_string());
    }

    // Create ignores the id, so it still succeeds
    let response = send(
        &router,
        "POST",
        "/posts/%FF",
        Some(create_body("A", &[], &[])),
    )
    .await;
    assert_eq!(response.status, 201);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_oversized_create_body_is_json_413() {
    let store = MemoryPostStore::new();
    let router = test_router(store.clone(), FakeLinkSigner::new());

    let content = "x".repeat(3 * 1024 * 1024);
    let body = serde_json::json!({ "title": "Big", "content": content }).to_string();

    let response = send(&router, "POST", "/posts", Some(body.clone())).await;
    assert_eq!(response.status, 413);
    assert_envelope_headers(&response.headers);
    assert!(response.json["error"].is_string());
    assert_eq!(store.len().await, 0);

    // Other methods never read the body
    let response = send(&router, "PATCH", "/posts", Some(body)).await;
    assert_eq!(response.status, 405);
}

// =============================================================================
// Dependency Failures
// =============================================================================

#[tokio::test]
async fn test_store_outage_is_502() {
    let router = test_router(
        FailingPostStore::new(StoreError::Connection("connection refused".to_string())),
        FakeLinkSigner::new(),
    );

    for (method, uri, body) in [
        ("GET", "/posts", None),
        ("GET", "/posts/p1", None),
        ("DELETE", "/posts/p1", None),
        ("POST", "/posts", Some(create_body("A", &[], &[]))),
    ] {
        let response = send(&router, method, uri, body).await;
        assert_eq!(response.status, 502, "{} {}", method, uri);
        assert_envelope_headers(&response.headers);
        assert_eq!(
            response.json["error"],
            "Connection error: connection refused"
        );
    }
}

#[tokio::test]
async fn test_malformed_item_is_500() {
    let router = test_router(
        FailingPostStore::new(StoreError::Decode("missing attribute 'id'".to_string())),
        FakeLinkSigner::new(),
    );

    let response = send(&router, "GET", "/posts", None).await;
    assert_eq!(response.status, 500);
    assert!(response.json["error"]
        .as_str()
        .unwrap()
        .contains("missing attribute"));
}

#[tokio::test]
async fn test_link_failure_is_502() {
    let store = MemoryPostStore::new();
    store.insert(sample_post("p1", &["images/a.png"])).await;
    store.insert(sample_post("p2", &[])).await;
    let router = test_router(store, FailingLinkSigner);

    let response = send(&router, "GET", "/posts/p1", None).await;
    assert_eq!(response.status, 502);
    assert!(response.json["error"]
        .as_str()
        .unwrap()
        .contains("images/a.png"));

    // A post without images never calls the signer
    let response = send(&router, "GET", "/posts/p2", None).await;
    assert_eq!(response.status, 200);
}

// =============================================================================
// Health And Fallback
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let router = test_router(MemoryPostStore::new(), FakeLinkSigner::new());

    let response = send(&router, "GET", "/health", None).await;
    assert_eq!(response.status, 200);
    assert_envelope_headers(&response.headers);
    assert_eq!(response.json["status"], "healthy");
    assert_eq!(response.json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_unknown_path_is_json_404() {
    let router = test_router(MemoryPostStore::new(), FakeLinkSigner::new());

    let response = send(&router, "GET", "/articles", None).await;
    assert_eq!(response.status, 404);
    assert_envelope_headers(&response.headers);
    assert_eq!(response.json["error"], "Route not found: /articles");
}
