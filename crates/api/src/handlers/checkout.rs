//! Premium checkout handler.

use axum::extract::State;
use axum::Json;
use dapparchive_core::error::CoreError;
use serde::Serialize;

use crate::auth::Viewer;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    /// Provider-hosted checkout page to redirect the buyer to.
    pub url: String,
}

/// POST /create-checkout-session -- start a premium purchase.
pub async fn create_checkout_session(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
) -> AppResult<Json<CheckoutResponse>> {
    let user = viewer.ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized(
            "Sign in to purchase premium access".into(),
        ))
    })?;

    if user.is_premium {
        return Err(AppError::BadRequest(
            "User already has premium access".into(),
        ));
    }

    let session = state
        .billing
        .create_checkout_session(user.id, &user.email)
        .await?;
    tracing::info!(user_id = user.id, "Created checkout session");
    Ok(Json(CheckoutResponse { url: session.url }))
}
