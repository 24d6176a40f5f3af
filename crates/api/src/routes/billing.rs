use axum::routing::post;
use axum::Router;

use crate::handlers::{checkout, webhook};
use crate::state::AppState;

/// Mount billing routes at the `/api` root.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/create-checkout-session",
            post(checkout::create_checkout_session),
        )
        .route("/webhooks/stripe", post(webhook::stripe_webhook))
}
