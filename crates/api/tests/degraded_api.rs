//! Integration tests for degraded-mode behaviour: reads serve the static
//! fallback catalog (flagged via the `x-data-degraded` header), writes
//! fail with 503.

mod common;

use axum::http::StatusCode;
use common::{admin_identity, assert_error, body_json, build_test_app, get, send_json};
use serde_json::json;

// ---------------------------------------------------------------------------
// Test: dapp listing serves the fallback catalog with the degraded header
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dapp_listing_serves_fallback_catalog() {
    let app = build_test_app(None);
    let response = get(app, "/api/dapps").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("x-data-degraded")
            .and_then(|v| v.to_str().ok()),
        Some("true"),
    );

    let json = body_json(response).await;
    let entries = json.as_array().expect("listing must be an array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["slug"], "gmx-v2");
    assert_eq!(entries[0]["image_count"], 3);
    assert_eq!(entries[1]["slug"], "jupiter");
}

// ---------------------------------------------------------------------------
// Test: dapp detail by slug serves fallback, never with premium images
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dapp_detail_serves_fallback_without_premium_images() {
    let app = build_test_app(None);
    let response = get(app, "/api/dapps/slug/gmx-v2").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-data-degraded"));

    let json = body_json(response).await;
    assert_eq!(json["slug"], "gmx-v2");
    let images = json["images"].as_array().expect("images must be an array");
    assert_eq!(images.len(), 3);
    assert!(images.iter().all(|img| img["is_premium"] == false));
}

// ---------------------------------------------------------------------------
// Test: unknown slug is a 404 even while degraded
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_slug_is_not_found_even_degraded() {
    let app = build_test_app(None);
    let response = get(app, "/api/dapps/slug/atlantis").await;
    assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

// ---------------------------------------------------------------------------
// Test: image listing filters apply to the fallback catalog too
// ---------------------------------------------------------------------------

#[tokio::test]
async fn image_listing_filters_fallback_by_category() {
    let app = build_test_app(None);
    let response = get(app, "/api/images?category=ANALYTICS").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let images = json.as_array().expect("listing must be an array");
    assert_eq!(images.len(), 1);
    assert_eq!(images[0]["title"], "Dashboard");
}

#[tokio::test]
async fn image_listing_filters_fallback_by_dapp() {
    let app = build_test_app(None);
    let response = get(app, "/api/images?dapp_id=2").await;

    let json = body_json(response).await;
    let images = json.as_array().expect("listing must be an array");
    assert_eq!(images.len(), 2);
    assert!(images.iter().all(|img| img["dapp_id"] == 2));
}

// ---------------------------------------------------------------------------
// Test: per-image access checks work against the fallback catalog, so any
// image a degraded listing shows can also be access-checked
// ---------------------------------------------------------------------------

#[tokio::test]
async fn image_access_check_allows_fallback_images_while_degraded() {
    let app = build_test_app(None);
    let response = get(app, "/api/images/1/access").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["allowed"], true);
}

#[tokio::test]
async fn image_access_check_is_not_found_for_unknown_id_while_degraded() {
    let app = build_test_app(None);
    let response = get(app, "/api/images/999/access").await;
    assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

// ---------------------------------------------------------------------------
// Test: admin writes are rejected with 503 while disconnected
// ---------------------------------------------------------------------------

#[tokio::test]
async fn admin_write_is_rejected_while_disconnected() {
    let app = build_test_app(Some(admin_identity()));
    let body = json!({
        "name": "Uniswap",
        "slug": "uniswap",
        "website": "https://uniswap.org",
    });
    let response = send_json(app, "POST", "/api/dapps", Some("token"), &body).await;
    assert_error(response, StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE").await;
}

#[tokio::test]
async fn flow_delete_is_rejected_while_disconnected() {
    let app = build_test_app(Some(admin_identity()));
    let response =
        common::request(app, "DELETE", "/api/flows/1", Some("token"), None).await;
    assert_error(response, StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE").await;
}
