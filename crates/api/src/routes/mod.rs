pub mod admin;
pub mod billing;
pub mod dapp;
pub mod flow;
pub mod health;
pub mod image;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                              service and database health
///
/// /dapps                               list (GET), create (POST, admin)
/// /dapps/{id}                          get, update (PUT), delete (admin)
/// /dapps/slug/{slug}                   get by slug
/// /dapps/{id}/flows                    list flows with steps
/// /dapps/{id}/images                   upload screenshot (POST, admin)
///
/// /images                              filtered list (GET), create (POST, admin)
/// /images/{id}                         update (PUT), delete (admin)
/// /images/{id}/access                  paywall check, counts free views
///
/// /flows                               create (POST, admin)
/// /flows/{id}                          delete (admin)
/// /flows/{id}/steps                    append step (POST, admin)
///
/// /create-checkout-session             start premium purchase (POST)
/// /webhooks/stripe                     billing events (POST, signed)
///
/// /admin/users                         list accounts (GET, admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(billing::router())
        .nest("/dapps", dapp::router())
        .nest("/images", image::router())
        .nest("/flows", flow::router())
        .nest("/admin", admin::router())
}
