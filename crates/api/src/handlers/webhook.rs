//! Billing webhook handler.
//!
//! The only mutation a webhook can cause is granting premium access, and
//! only for a signed `checkout.session.completed` event whose metadata
//! names the buying user. Signature verification is mandatory: with no
//! signing secret configured the endpoint refuses all events.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use dapparchive_core::error::CoreError;
use dapparchive_core::types::DbId;
use dapparchive_db::repositories::user_repo::UserRepo;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Maximum accepted clock skew between the signature timestamp and now.
pub const SIGNATURE_TOLERANCE: Duration = Duration::from_secs(300);

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature header is malformed")]
    Malformed,

    #[error("signature timestamp outside tolerance")]
    Expired,

    #[error("no candidate signature matches the payload")]
    Mismatch,
}

#[derive(Debug, Deserialize)]
struct StripeEvent {
    #[serde(rename = "type")]
    kind: String,
    data: StripeEventData,
}

#[derive(Debug, Deserialize)]
struct StripeEventData {
    object: StripeCheckoutSession,
}

#[derive(Debug, Deserialize)]
struct StripeCheckoutSession {
    #[serde(default)]
    customer: Option<String>,
    #[serde(default)]
    metadata: Option<StripeSessionMetadata>,
}

#[derive(Debug, Deserialize)]
struct StripeSessionMetadata {
    #[serde(default)]
    user_id: Option<String>,
}

/// POST /webhooks/stripe -- handle billing events.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> AppResult<StatusCode> {
    let secret = state
        .config
        .stripe
        .webhook_secret
        .as_deref()
        .ok_or_else(|| {
            AppError::Core(CoreError::Unavailable(
                "Billing webhooks are not configured".into(),
            ))
        })?;

    let signature_header = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Missing Stripe-Signature header".into()))?;

    let now_unix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .as_secs() as i64;
    verify_signature(secret, signature_header, &body, SIGNATURE_TOLERANCE, now_unix).map_err(
        |err| {
            tracing::warn!(error = %err, "Rejected webhook event");
            AppError::BadRequest("Invalid webhook signature".into())
        },
    )?;

    let event: StripeEvent = serde_json::from_str(&body)
        .map_err(|_| AppError::BadRequest("Malformed webhook payload".into()))?;

    if event.kind != "checkout.session.completed" {
        tracing::debug!(kind = %event.kind, "Ignoring webhook event");
        return Ok(StatusCode::OK);
    }

    let session = event.data.object;
    let user_id: DbId = session
        .metadata
        .as_ref()
        .and_then(|m| m.user_id.as_deref())
        .and_then(|raw| raw.parse().ok())
        .ok_or_else(|| AppError::BadRequest("Webhook session is missing user metadata".into()))?;

    let customer = session.customer;
    let updated = state
        .data
        .write("grant_premium", |pool| {
            let customer = customer.clone();
            async move { UserRepo::set_premium(&pool, user_id, customer.as_deref()).await }
        })
        .await?;

    if updated {
        tracing::info!(user_id, "Premium access granted");
    } else {
        tracing::warn!(user_id, "Completed checkout references an unknown user");
    }
    Ok(StatusCode::OK)
}

/// Verify a `t=...,v1=...` signature header against the raw payload.
///
/// The signed string is `{timestamp}.{payload}` with HMAC-SHA256 over the
/// signing secret. Any of the `v1` candidates matching accepts the
/// event; the timestamp must fall within `tolerance` of `now_unix`.
pub fn verify_signature(
    secret: &str,
    header: &str,
    payload: &str,
    tolerance: Duration,
    now_unix: i64,
) -> Result<(), SignatureError> {
    let mut timestamp: Option<i64> = None;
    let mut candidates: Vec<&str> = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse().ok(),
            Some(("v1", value)) => candidates.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::Malformed)?;
    if candidates.is_empty() {
        return Err(SignatureError::Malformed);
    }
    if (now_unix - timestamp).abs() > tolerance.as_secs() as i64 {
        return Err(SignatureError::Expired);
    }

    let signed_payload = format!("{timestamp}.{payload}");
    for candidate in candidates {
        let Some(expected) = hex_decode(candidate) else {
            continue;
        };
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|_| SignatureError::Malformed)?;
        mac.update(signed_payload.as_bytes());
        // Constant-time comparison via the Mac verifier.
        if mac.verify_slice(&expected).is_ok() {
            return Ok(());
        }
    }
    Err(SignatureError::Mismatch)
}

fn hex_decode(input: &str) -> Option<Vec<u8>> {
    if input.len() % 2 != 0 {
        return None;
    }
    (0..input.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&input[i..i + 2], 16).ok())
        .collect()
}
