//! API integration tests.
//!
//! Tests verify:
//! - The end-to-end auth → generate → fetch flow
//! - Response shape of `/generate_image` (bare JSON string)
//! - Prompt and body validation
//! - Health check and static asset serving

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};

use pixel_gateway::PLACEHOLDER_PNG;

use super::test_utils::{
    assert_error, body_bytes, body_json, get_request, image_file, is_valid_image_path, TestApp,
    START_MILLIS, TEST_API_KEY,
};

// =============================================================================
// End-to-end Flow
// =============================================================================

#[tokio::test]
async fn test_red_fox_scenario() {
    let app = TestApp::new();
    let signature = app.issue_signature().await;

    app.clock.advance(2_000);
    let response = app.generate(&signature, "a red fox").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let path = json.as_str().expect("response is a bare string");
    assert_eq!(path, format!("/images/{}_a_red_fox.png", START_MILLIS + 2_000));
    assert!(is_valid_image_path(path));

    app.clock.advance(11_000);
    let response = app.generate(&signature, "a red fox").await;
    assert_error(response, StatusCode::UNAUTHORIZED, "Signature expired").await;
}

#[tokio::test]
async fn test_generated_image_is_served() {
    let app = TestApp::new();
    let signature = app.issue_signature().await;

    let response = app.generate(&signature, "a cat").await;
    let json = body_json(response).await;
    let path = json.as_str().unwrap().to_string();

    assert_eq!(
        std::fs::read(image_file(&app.images_dir(), &path)).unwrap(),
        PLACEHOLDER_PNG
    );

    let response = app.send(get_request(&path)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/png"
    );
    assert_eq!(body_bytes(response).await, PLACEHOLDER_PNG);
}

#[tokio::test]
async fn test_path_shape_for_awkward_prompts() {
    let app = TestApp::new();
    let signature = app.issue_signature().await;

    let long = "z".repeat(200);
    for prompt in ["../../etc/passwd", "🦊 fox", long.as_str(), "?*<>|"] {
        let response = app.generate(&signature, prompt).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let path = json.as_str().unwrap();
        assert!(is_valid_image_path(path), "bad path {}", path);
        assert!(!path.contains(".."));
    }
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_missing_prompt_rejected() {
    let app = TestApp::new();
    let signature = app.issue_signature().await;

    let body = serde_json::json!({ "signature": signature });
    let response = app.post_generate(Some(TEST_API_KEY), body.to_string()).await;
    assert_error(response, StatusCode::BAD_REQUEST, "Prompt is required").await;

    let response = app.generate(&signature, "").await;
    assert_error(response, StatusCode::BAD_REQUEST, "Prompt is required").await;

    // Nothing written
    assert_eq!(std::fs::read_dir(app.images_dir()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let app = TestApp::new();
    let response = app.post_generate(Some(TEST_API_KEY), "{broken").await;
    assert_error(response, StatusCode::BAD_REQUEST, "Malformed JSON body").await;
}

#[tokio::test]
async fn test_wrong_method_not_allowed() {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/auth")
        .header(header::AUTHORIZATION, TEST_API_KEY)
        .body(Body::empty())
        .unwrap();

    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// =============================================================================
// Public Routes
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.send(get_request("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_public_assets_served() {
    let app = TestApp::new();
    std::fs::write(app.public_dir().join("hello.txt"), "hi there").unwrap();

    let response = app.send(get_request("/hello.txt")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"hi there");
}

#[tokio::test]
async fn test_unknown_path_not_found() {
    let app = TestApp::new();
    let response = app.send(get_request("/does-not-exist")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.send(get_request("/images/missing.png")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_to_static_paths_not_found() {
    let app = TestApp::new();
    std::fs::write(app.public_dir().join("hello.txt"), "hi there").unwrap();
    let signature = app.issue_signature().await;
    let path = body_json(app.generate(&signature, "a cat").await).await;
    let path = path.as_str().unwrap().to_string();

    for uri in ["/does-not-exist", "/hello.txt", path.as_str()] {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.send(request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "POST {}", uri);
    }
}

#[tokio::test]
async fn test_cors_preflight() {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/auth")
        .header(header::ORIGIN, "https://example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}
