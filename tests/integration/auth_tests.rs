//! Authentication integration tests.
//!
//! Tests verify:
//! - Unknown or missing API keys are rejected on both protected endpoints
//! - The valid key yields well-formed signatures
//! - Signatures are reusable within their TTL
//! - Expired signatures are rejected once, then reported as invalid
//! - Fields of the wrong JSON type do not change the check order

use axum::body::Body;
use axum::http::{header, Request, StatusCode};

use super::test_utils::{
    assert_error, body_json, is_valid_signature, TestApp, START_MILLIS, TEST_API_KEY,
};

// =============================================================================
// API Keys
// =============================================================================

#[tokio::test]
async fn test_auth_without_key_rejected() {
    let app = TestApp::new();
    let response = app.post_auth(None).await;
    assert_error(
        response,
        StatusCode::UNAUTHORIZED,
        "Unauthorized: Invalid API key",
    )
    .await;
}

#[tokio::test]
async fn test_auth_with_unknown_keys_rejected() {
    let app = TestApp::new();
    let upper = TEST_API_KEY.to_uppercase();
    for key in ["", "nope", "test-api-key", upper.as_str()] {
        let response = app.post_auth(Some(key)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "key {:?}", key);
    }
    assert!(app.registry.is_empty().await);
}

#[tokio::test]
async fn test_generate_without_key_rejected() {
    let app = TestApp::new();
    let signature = app.issue_signature().await;
    let body = serde_json::json!({ "signature": signature, "prompt": "a cat" });

    let response = app.post_generate(Some("wrong"), body.to_string()).await;
    assert_error(
        response,
        StatusCode::UNAUTHORIZED,
        "Unauthorized: Invalid API key",
    )
    .await;
}

// =============================================================================
// Issuance
// =============================================================================

#[tokio::test]
async fn test_valid_key_issues_signature() {
    let app = TestApp::new();

    for _ in 0..20 {
        let response = app.post_auth(Some(TEST_API_KEY)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let signature = json["signature"].as_str().unwrap();
        assert!(is_valid_signature(signature), "bad signature {}", signature);
    }

    assert_eq!(app.registry.len().await, 20);
}

#[tokio::test]
async fn test_issued_signature_expires_after_ten_seconds() {
    let app = TestApp::new();
    let signature = app.issue_signature().await;

    let record = app.registry.get(&signature).await.unwrap();
    assert_eq!(record.created_at, START_MILLIS);
    assert_eq!(record.expires_at, START_MILLIS + 10_000);
}

// =============================================================================
// Redemption
// =============================================================================

#[tokio::test]
async fn test_signature_reusable_within_ttl() {
    let app = TestApp::new();
    let signature = app.issue_signature().await;

    let first = app.generate(&signature, "a cat").await;
    assert_eq!(first.status(), StatusCode::OK);

    app.clock.advance(5_000);
    let second = app.generate(&signature, "a dog").await;
    assert_eq!(second.status(), StatusCode::OK);

    assert!(app.registry.get(&signature).await.is_some());
}

#[tokio::test]
async fn test_signature_accepted_at_exact_expiry() {
    let app = TestApp::new();
    let signature = app.issue_signature().await;

    app.clock.advance(10_000);
    let response = app.generate(&signature, "edge").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_expired_signature_rejected_then_invalid() {
    let app = TestApp::new();
    let signature = app.issue_signature().await;

    app.clock.advance(11_000);
    let response = app.generate(&signature, "a red fox").await;
    assert_error(response, StatusCode::UNAUTHORIZED, "Signature expired").await;

    // Evicted on detection
    assert!(app.registry.get(&signature).await.is_none());

    let response = app.generate(&signature, "a red fox").await;
    assert_error(response, StatusCode::UNAUTHORIZED, "Invalid signature").await;
}

#[tokio::test]
async fn test_unknown_signature_rejected() {
    let app = TestApp::new();
    let response = app.generate(&"A".repeat(79), "a cat").await;
    assert_error(response, StatusCode::UNAUTHORIZED, "Invalid signature").await;
}

#[tokio::test]
async fn test_missing_signature_rejected() {
    let app = TestApp::new();

    let body = serde_json::json!({ "prompt": "a cat" });
    let response = app.post_generate(Some(TEST_API_KEY), body.to_string()).await;
    assert_error(response, StatusCode::UNAUTHORIZED, "Invalid signature").await;

    let body = serde_json::json!({ "signature": "", "prompt": "a cat" });
    let response = app.post_generate(Some(TEST_API_KEY), body.to_string()).await;
    assert_error(response, StatusCode::UNAUTHORIZED, "Invalid signature").await;

    let response = app.post_generate(Some(TEST_API_KEY), "").await;
    assert_error(response, StatusCode::UNAUTHORIZED, "Invalid signature").await;
}

#[tokio::test]
async fn test_signature_checked_before_prompt() {
    let app = TestApp::new();
    let signature = app.issue_signature().await;
    app.clock.advance(20_000);

    // Expired signature wins over the missing prompt
    let body = serde_json::json!({ "signature": signature });
    let response = app.post_generate(Some(TEST_API_KEY), body.to_string()).await;
    assert_error(response, StatusCode::UNAUTHORIZED, "Signature expired").await;
}

#[tokio::test]
async fn test_expired_signature_with_non_string_prompt() {
    let app = TestApp::new();
    let signature = app.issue_signature().await;
    app.clock.advance(11_000);

    let body = serde_json::json!({ "signature": signature, "prompt": 42 });
    let response = app.post_generate(Some(TEST_API_KEY), body.to_string()).await;
    assert_error(response, StatusCode::UNAUTHORIZED, "Signature expired").await;
    assert!(app.registry.get(&signature).await.is_none());
}

#[tokio::test]
async fn test_non_string_fields() {
    let app = TestApp::new();

    let body = serde_json::json!({ "signature": 12345, "prompt": "a cat" });
    let response = app.post_generate(Some(TEST_API_KEY), body.to_string()).await;
    assert_error(response, StatusCode::UNAUTHORIZED, "Invalid signature").await;

    // A live signature with a non-string prompt is a missing prompt
    let signature = app.issue_signature().await;
    let body = serde_json::json!({ "signature": signature, "prompt": ["a", "cat"] });
    let response = app.post_generate(Some(TEST_API_KEY), body.to_string()).await;
    assert_error(response, StatusCode::BAD_REQUEST, "Prompt is required").await;
}

#[tokio::test]
async fn test_body_without_json_content_type_ignored() {
    let app = TestApp::new();
    let signature = app.issue_signature().await;
    let body = serde_json::json!({ "signature": signature, "prompt": "a cat" });

    let request = Request::builder()
        .method("POST")
        .uri("/generate_image")
        .header(header::AUTHORIZATION, TEST_API_KEY)
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.send(request).await;
    assert_error(response, StatusCode::UNAUTHORIZED, "Invalid signature").await;

    // Garbage is not parsed either
    let request = Request::builder()
        .method("POST")
        .uri("/generate_image")
        .header(header::AUTHORIZATION, TEST_API_KEY)
        .body(Body::from("{broken"))
        .unwrap();
    let response = app.send(request).await;
    assert_error(response, StatusCode::UNAUTHORIZED, "Invalid signature").await;
}
