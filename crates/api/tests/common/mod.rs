//! Shared helpers for API integration tests.
//!
//! Tests run against a disconnected [`DataAccess`] so no database is
//! required: reads exercise the fallback path and writes the typed
//! unavailability path, which is exactly the degraded mode the resilient
//! layer promises.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use dapparchive_api::billing::DisabledBilling;
use dapparchive_api::config::{ClerkConfig, ServerConfig, StripeConfig, SupabaseConfig};
use dapparchive_api::identity::{ExternalIdentity, IdentityError, IdentityProvider};
use dapparchive_api::router::build_app_router;
use dapparchive_api::state::AppState;
use dapparchive_api::storage::DisabledStorage;
use dapparchive_db::{DataAccess, RetryPolicy};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@example.com";

/// Identity provider that resolves every bearer token to one fixed
/// identity (or to anonymous when configured with `None`).
pub struct StaticIdentity(pub Option<ExternalIdentity>);

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn resolve(&self, _token: &str) -> Result<Option<ExternalIdentity>, IdentityError> {
        Ok(self.0.clone())
    }
}

/// The configured admin's identity.
pub fn admin_identity() -> ExternalIdentity {
    ExternalIdentity {
        external_id: "user_admin".to_string(),
        verified_email: Some(ADMIN_EMAIL.to_string()),
    }
}

/// A signed-in identity that is not the admin.
pub fn member_identity() -> ExternalIdentity {
    ExternalIdentity {
        external_id: "user_member".to_string(),
        verified_email: Some("member@example.com".to_string()),
    }
}

/// Build a test `ServerConfig` with safe defaults and no external
/// integrations configured.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: None,
        public_base_url: "http://localhost:3000".to_string(),
        admin_email: Some(ADMIN_EMAIL.to_string()),
        seed_on_start: false,
        retry: RetryPolicy {
            max_attempts: 1,
            ..RetryPolicy::default()
        },
        clerk: ClerkConfig::default(),
        stripe: StripeConfig {
            secret_key: None,
            webhook_secret: None,
            price_cents: 500,
            product_name: "DappArchive Premium".to_string(),
        },
        supabase: SupabaseConfig {
            url: None,
            service_key: None,
            bucket: "images".to_string(),
        },
    }
}

/// Build the full application router on a disconnected data layer,
/// resolving every token to `identity`.
pub fn build_test_app(identity: Option<ExternalIdentity>) -> Router {
    build_test_app_with_config(test_config(), identity)
}

/// Same as [`build_test_app`] but with a caller-tweaked config.
pub fn build_test_app_with_config(
    config: ServerConfig,
    identity: Option<ExternalIdentity>,
) -> Router {
    let data = DataAccess::disconnected(config.retry.clone());
    let state = AppState {
        data,
        config: Arc::new(config.clone()),
        identity: Arc::new(StaticIdentity(identity)),
        storage: Arc::new(DisabledStorage),
        billing: Arc::new(DisabledBilling),
    };
    build_app_router(state, &config)
}

/// Issue a GET request.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    request(app, "GET", uri, None, None).await
}

/// Issue a GET request with a bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    request(app, "GET", uri, Some(token), None).await
}

/// Issue a JSON request with optional bearer token.
pub async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: &Value,
) -> Response<Body> {
    request(app, method, uri, token, Some(body.to_string())).await
}

/// Low-level request helper.
pub async fn request(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<String>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the standard error envelope and return its message.
pub async fn assert_error(response: Response<Body>, status: StatusCode, code: &str) -> String {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["code"], code);
    json["error"].as_str().unwrap_or_default().to_string()
}
