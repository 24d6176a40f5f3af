//! Integration tests for request validation on mutation endpoints.
//! Validation runs before any store access, so these pass (with 400s)
//! even on a disconnected data layer.

mod common;

use axum::http::StatusCode;
use common::{admin_identity, assert_error, build_test_app, request, send_json};
use serde_json::json;

#[tokio::test]
async fn create_dapp_rejects_a_short_name() {
    let app = build_test_app(Some(admin_identity()));
    let body = json!({ "name": "x", "slug": "valid-slug" });
    let response = send_json(app, "POST", "/api/dapps", Some("token"), &body).await;

    let message = assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
    assert!(message.contains("name"), "message should name the field: {message}");
}

#[tokio::test]
async fn create_dapp_rejects_an_invalid_website_url() {
    let app = build_test_app(Some(admin_identity()));
    let body = json!({
        "name": "Uniswap",
        "slug": "uniswap",
        "website": "not-a-url",
    });
    let response = send_json(app, "POST", "/api/dapps", Some("token"), &body).await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

#[tokio::test]
async fn update_dapp_rejects_a_short_name() {
    let app = build_test_app(Some(admin_identity()));
    let body = json!({ "name": "x" });
    let response = send_json(app, "PUT", "/api/dapps/1", Some("token"), &body).await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

#[tokio::test]
async fn create_image_rejects_an_invalid_url() {
    let app = build_test_app(Some(admin_identity()));
    let body = json!({ "dapp_id": 1, "url": "not-a-url" });
    let response = send_json(app, "POST", "/api/images", Some("token"), &body).await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

#[tokio::test]
async fn malformed_json_body_is_a_client_error() {
    let app = build_test_app(Some(admin_identity()));
    let response = request(
        app,
        "POST",
        "/api/dapps",
        Some("token"),
        Some("{ not json".to_string()),
    )
    .await;
    assert!(
        response.status().is_client_error(),
        "expected 4xx, got {}",
        response.status()
    );
}
