//! Health Check API Tests

use axum::http::StatusCode;

use crate::common::TestApp;

/// Test basic health check endpoint returns 200 OK
#[tokio::test]
async fn test_health_check_returns_ok() {
    let app = TestApp::new();

    let response = app.server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

/// Test health check returns JSON with status field
#[tokio::test]
async fn test_health_check_returns_json() {
    let app = TestApp::new();

    let response = app.server.get("/health").await;
    let json: serde_json::Value = response.json();

    assert_eq!(json.get("status").and_then(|v| v.as_str()), Some("healthy"));
    assert!(json.get("version").is_some());
}

/// Test liveness probe endpoint
#[tokio::test]
async fn test_liveness_probe() {
    // Liveness must return 200 even when dependencies are unhealthy
    let app = TestApp::new();

    let response = app.server.get("/health/live").await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

/// Test readiness probe reports 503 while the database is unreachable
#[tokio::test]
async fn test_readiness_probe_unreachable_database() {
    let app = TestApp::new();

    let response = app.server.get("/health/ready").await;

    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);

    let json: serde_json::Value = response.json();
    assert_eq!(
        json.pointer("/checks/database/status").and_then(|v| v.as_str()),
        Some("unhealthy")
    );
    assert_eq!(
        json.pointer("/checks/websocket/active_connections")
            .and_then(|v| v.as_u64()),
        Some(0)
    );
}

/// Test Prometheus metrics endpoint exposes the relay counters
#[tokio::test]
async fn test_metrics_endpoint() {
    let app = TestApp::new();

    let response = app.server.get("/metrics").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    // The connection gauge is a plain gauge, so it is always exported
    assert!(response
        .text()
        .contains("feeds_websocket_connections_active"));
}

/// Test security headers are attached to responses
#[tokio::test]
async fn test_security_headers_present() {
    let app = TestApp::new();

    let response = app.server.get("/health").await;

    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
}
