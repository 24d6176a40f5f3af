//! Integration tests for the health endpoint and general HTTP behaviour.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get};

// ---------------------------------------------------------------------------
// Test: GET /health reports degraded when no database is configured
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_degraded_without_a_database() {
    let app = build_test_app(None);
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_configured"], false);
    assert_eq!(json["db_healthy"], false);
    assert!(json["version"].is_string());
}

// ---------------------------------------------------------------------------
// Test: health is also mounted under /api
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_is_available_under_api_prefix() {
    let app = build_test_app(None);
    let response = get(app, "/api/health").await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Test: Unknown route returns 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = build_test_app(None);
    let response = get(app, "/this-route-does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = build_test_app(None);
    let response = get(app, "/health").await;

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
