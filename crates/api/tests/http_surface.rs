//! Integration tests for the HTTP surface: health, routing, middleware,
//! and authentication, all without a running PostgreSQL instance.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{assert_error_code, body_json, build_test_app, get, test_config};
use tower::ServiceExt;

use draftline_api::auth::jwt::generate_access_token;

// ---------------------------------------------------------------------------
// Test: GET /health reports degraded when the database is unreachable
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_reports_degraded_without_database() {
    let app = build_test_app();
    let response = get(app, "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;

    assert_eq!(json["status"], "degraded");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], false);
}

// ---------------------------------------------------------------------------
// Test: Unknown route returns 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = build_test_app();
    let response = get(app, "/this-route-does-not-exist", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = build_test_app();
    let response = get(app, "/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);

    let request_id = response.headers().get("x-request-id");
    assert!(
        request_id.is_some(),
        "Response must contain an x-request-id header"
    );

    // The value should be a valid UUID (36 chars with hyphens).
    let id_str = request_id.unwrap().to_str().unwrap();
    assert_eq!(id_str.len(), 36, "x-request-id should be a UUID string");
}

// ---------------------------------------------------------------------------
// Test: CORS preflight OPTIONS request returns correct headers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cors_preflight_returns_correct_headers() {
    let app = build_test_app();

    // CORS preflight requires custom headers, so we build the request manually.
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/documents/1/versions")
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "GET")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    // CORS preflight should return 200.
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();

    // Access-Control-Allow-Origin must match the request origin.
    let allow_origin = headers
        .get("access-control-allow-origin")
        .expect("Missing Access-Control-Allow-Origin header")
        .to_str()
        .unwrap();
    assert_eq!(allow_origin, "http://localhost:5173");

    // Access-Control-Allow-Methods must include GET.
    let allow_methods = headers
        .get("access-control-allow-methods")
        .expect("Missing Access-Control-Allow-Methods header")
        .to_str()
        .unwrap();
    assert!(
        allow_methods.contains("GET"),
        "Allow-Methods should contain GET, got: {allow_methods}"
    );
}

// ---------------------------------------------------------------------------
// Test: version routes reject requests without a token
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_token_returns_401() {
    let app = build_test_app();
    let response = get(app, "/api/v1/documents/1/versions", None).await;

    assert_error_code(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;
}

// ---------------------------------------------------------------------------
// Test: malformed Authorization header is rejected
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_authorization_header_returns_401() {
    let app = build_test_app();

    let request = Request::builder()
        .uri("/api/v1/documents/1/versions")
        .header("Authorization", "Token abc123")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_error_code(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;
}

// ---------------------------------------------------------------------------
// Test: a token signed with the wrong secret is rejected
// ---------------------------------------------------------------------------

#[tokio::test]
async fn wrong_secret_token_returns_401() {
    let app = build_test_app();

    let mut other_config = test_config();
    other_config.jwt.secret = "a-different-secret".to_string();
    let token = generate_access_token(1, &other_config.jwt).unwrap();

    let response = get(app, "/api/v1/documents/1/versions", Some(&token)).await;

    assert_error_code(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;
}

// ---------------------------------------------------------------------------
// Test: authenticated request with unreachable store returns 503
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unreachable_store_returns_503_for_authenticated_request() {
    let app = build_test_app();

    let token = generate_access_token(1, &test_config().jwt).unwrap();
    let response = get(app, "/api/v1/documents/1/versions", Some(&token)).await;

    assert_error_code(response, StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE").await;
}
