//! Authentication API Tests
//!
//! Cookie-token auth on the protected HTTP surface. These paths reject
//! before any database access, so they run against the unreachable test
//! pool without issue.

use axum::http::{header, HeaderValue, StatusCode};

use crate::common::{unique_username, TestApp};

/// Requests without a cookie are rejected
#[tokio::test]
async fn test_chat_history_requires_cookie() {
    let app = TestApp::new();

    let response = app.server.get("/chat/somebody").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

/// Requests without a cookie are rejected on the usage endpoint too
#[tokio::test]
async fn test_daily_usage_requires_cookie() {
    let app = TestApp::new();

    let response = app.server.get("/dailyUsage").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

/// A cookie with the wrong name does not authenticate
#[tokio::test]
async fn test_wrong_cookie_name_rejected() {
    let app = TestApp::new();

    let response = app
        .server
        .get("/dailyUsage")
        .add_header(
            header::COOKIE,
            HeaderValue::from_static("session=some-value"),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

/// A garbage token fails signature verification
#[tokio::test]
async fn test_invalid_token_rejected() {
    let app = TestApp::new();

    let response = app
        .server
        .get("/dailyUsage")
        .add_header(header::COOKIE, HeaderValue::from_static("uuid=not-a-token"))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let json: serde_json::Value = response.json();
    assert_eq!(json.get("code").and_then(|v| v.as_u64()), Some(10003));
}

/// A correctly signed cookie passes authentication. The handler then hits
/// the unreachable test database, so the request surfaces a storage error
/// instead of an auth rejection.
#[tokio::test]
async fn test_valid_cookie_passes_auth() {
    let app = TestApp::new();
    let cookie = app.auth_cookie(&unique_username());

    let response = app
        .server
        .get("/dailyUsage")
        .add_header(header::COOKIE, HeaderValue::from_str(&cookie).unwrap())
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

/// A non-upgrade request to the gateway is not accepted
#[tokio::test]
async fn test_gateway_rejects_plain_http() {
    let app = TestApp::new();

    let response = app.server.get("/gateway").await;

    assert!(response.status_code().is_client_error());
}

/// The WebSocket handshake refuses connections without a token cookie —
/// the socket is never admitted
#[tokio::test]
async fn test_gateway_handshake_requires_cookie() {
    let app = TestApp::new();

    let response = app
        .server
        .get("/gateway")
        .add_header(header::CONNECTION, HeaderValue::from_static("upgrade"))
        .add_header(header::UPGRADE, HeaderValue::from_static("websocket"))
        .add_header(
            header::SEC_WEBSOCKET_VERSION,
            HeaderValue::from_static("13"),
        )
        .add_header(
            header::SEC_WEBSOCKET_KEY,
            HeaderValue::from_static("dGhlIHNhbXBsZSBub25jZQ=="),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

/// The handshake also refuses a cookie signed with the wrong secret
#[tokio::test]
async fn test_gateway_handshake_rejects_bad_token() {
    let app = TestApp::new();

    let response = app
        .server
        .get("/gateway")
        .add_header(header::CONNECTION, HeaderValue::from_static("upgrade"))
        .add_header(header::UPGRADE, HeaderValue::from_static("websocket"))
        .add_header(
            header::SEC_WEBSOCKET_VERSION,
            HeaderValue::from_static("13"),
        )
        .add_header(
            header::SEC_WEBSOCKET_KEY,
            HeaderValue::from_static("dGhlIHNhbXBsZSBub25jZQ=="),
        )
        .add_header(header::COOKIE, HeaderValue::from_static("uuid=forged"))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}
