//! Janitor integration tests.
//!
//! Tests verify the periodic sweep removes signatures issued through the API
//! once the clock passes their expiry, and leaves live signatures alone.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;

use pixel_gateway::Janitor;

use super::test_utils::{assert_error, TestApp};

#[tokio::test]
async fn test_sweep_removes_only_expired_signatures() {
    let app = TestApp::new();
    let stale = app.issue_signature().await;
    app.clock.advance(6_000);
    let fresh = app.issue_signature().await;

    app.clock.advance(5_000);
    let janitor = Janitor::new(Arc::clone(&app.registry));
    assert_eq!(janitor.sweep().await, 1);

    // Swept tokens are simply unknown
    let response = app.generate(&stale, "late").await;
    assert_error(response, StatusCode::UNAUTHORIZED, "Invalid signature").await;

    let response = app.generate(&fresh, "on time").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_background_janitor_runs_until_shutdown() {
    let app = TestApp::new();
    for _ in 0..3 {
        app.issue_signature().await;
    }
    app.clock.advance(30_000);

    let handle = Janitor::with_interval(Arc::clone(&app.registry), Duration::from_millis(5)).spawn();

    let mut attempts = 0;
    while !app.registry.is_empty().await && attempts < 200 {
        tokio::time::sleep(Duration::from_millis(5)).await;
        attempts += 1;
    }
    assert!(app.registry.is_empty().await);

    handle.shutdown().await;

    // No sweeps after shutdown
    app.issue_signature().await;
    app.clock.advance(30_000);
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(app.registry.len().await, 1);
}
