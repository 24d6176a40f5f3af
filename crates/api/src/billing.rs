//! Billing provider integration.
//!
//! Premium access is a one-time purchase. The server only creates the
//! checkout session and redirects the buyer; the actual premium flip
//! happens when the provider's webhook confirms payment (see
//! `handlers::webhook`), keyed by the `user_id` metadata attached here.

use async_trait::async_trait;
use dapparchive_core::types::DbId;
use serde::Deserialize;

use crate::config::StripeConfig;

#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    #[error("billing is not configured")]
    NotConfigured,

    #[error("billing request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("billing provider returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("billing provider returned a session without a URL")]
    MissingUrl,
}

/// A created checkout session the client should redirect to.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub url: String,
}

#[async_trait]
pub trait BillingProvider: Send + Sync {
    async fn create_checkout_session(
        &self,
        user_id: DbId,
        email: &str,
    ) -> Result<CheckoutSession, BillingError>;
}

#[derive(Debug, Deserialize)]
struct StripeSessionResponse {
    url: Option<String>,
}

/// Stripe-backed billing provider using the form-encoded REST API.
pub struct StripeBilling {
    http: reqwest::Client,
    api_base: String,
    secret_key: String,
    product_name: String,
    unit_amount_cents: u32,
    public_base_url: String,
}

impl StripeBilling {
    pub const DEFAULT_API_BASE: &'static str = "https://api.stripe.com";

    /// Build a provider from config; `None` when the secret key is missing.
    pub fn from_config(config: &StripeConfig, public_base_url: &str) -> Option<Self> {
        let secret_key = config.secret_key.clone()?;
        Some(Self {
            http: reqwest::Client::new(),
            api_base: Self::DEFAULT_API_BASE.to_string(),
            secret_key,
            product_name: config.product_name.clone(),
            unit_amount_cents: config.price_cents,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Form parameters for a one-time payment session. The `user_id`
    /// metadata is what the completion webhook uses to find the buyer.
    fn checkout_form(&self, user_id: DbId, email: &str) -> Vec<(String, String)> {
        vec![
            ("mode".into(), "payment".into()),
            ("payment_method_types[0]".into(), "card".into()),
            ("line_items[0][price_data][currency]".into(), "usd".into()),
            (
                "line_items[0][price_data][product_data][name]".into(),
                self.product_name.clone(),
            ),
            (
                "line_items[0][price_data][unit_amount]".into(),
                self.unit_amount_cents.to_string(),
            ),
            ("line_items[0][quantity]".into(), "1".into()),
            ("customer_email".into(), email.to_string()),
            ("metadata[user_id]".into(), user_id.to_string()),
            (
                "success_url".into(),
                format!(
                    "{}/premium/success?session_id={{CHECKOUT_SESSION_ID}}",
                    self.public_base_url
                ),
            ),
            ("cancel_url".into(), format!("{}/premium", self.public_base_url)),
        ]
    }
}

#[async_trait]
impl BillingProvider for StripeBilling {
    async fn create_checkout_session(
        &self,
        user_id: DbId,
        email: &str,
    ) -> Result<CheckoutSession, BillingError> {
        let response = self
            .http
            .post(format!("{}/v1/checkout/sessions", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&self.checkout_form(user_id, email))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BillingError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let session: StripeSessionResponse = response.json().await?;
        let url = session.url.ok_or(BillingError::MissingUrl)?;
        Ok(CheckoutSession { url })
    }
}

/// Provider used when billing is not configured.
pub struct DisabledBilling;

#[async_trait]
impl BillingProvider for DisabledBilling {
    async fn create_checkout_session(
        &self,
        _user_id: DbId,
        _email: &str,
    ) -> Result<CheckoutSession, BillingError> {
        Err(BillingError::NotConfigured)
    }
}
