//! Identity provider integration.
//!
//! Session tokens are verified locally (RS256 against the provider's
//! public key), then the user record is fetched from the provider's
//! backend API to learn the verified email address. Admin access is
//! decided purely from that email, so an unverified or missing email can
//! never grant elevated rights.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::config::ClerkConfig;

/// A resolved external identity: the provider's subject id plus the
/// verified email, when the account has one.
#[derive(Debug, Clone)]
pub struct ExternalIdentity {
    pub external_id: String,
    pub verified_email: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("identity provider request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("identity provider returned HTTP {0}")]
    HttpStatus(u16),
}

/// Resolves bearer tokens to external identities.
///
/// `Ok(None)` means the token is invalid or expired: the request proceeds
/// anonymously. Errors mean the provider itself could not be consulted.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<Option<ExternalIdentity>, IdentityError>;
}

/// Session claims we care about; the rest of the token is ignored.
#[derive(Debug, Deserialize)]
struct SessionClaims {
    sub: String,
}

#[derive(Debug, Deserialize)]
struct ClerkEmailVerification {
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClerkEmail {
    id: String,
    email_address: String,
    verification: Option<ClerkEmailVerification>,
}

#[derive(Debug, Deserialize)]
struct ClerkUser {
    primary_email_address_id: Option<String>,
    #[serde(default)]
    email_addresses: Vec<ClerkEmail>,
}

/// Clerk-backed identity provider.
pub struct ClerkIdentity {
    http: reqwest::Client,
    api_base: String,
    secret_key: String,
    jwt_key: DecodingKey,
    validation: Validation,
}

impl ClerkIdentity {
    pub const DEFAULT_API_BASE: &'static str = "https://api.clerk.com";

    /// Build a provider from config; `None` when either key is missing
    /// or the public key does not parse as RSA PEM.
    pub fn from_config(config: &ClerkConfig) -> Option<Self> {
        let secret_key = config.secret_key.clone()?;
        let pem = config.jwt_public_key.as_deref()?;
        let jwt_key = match DecodingKey::from_rsa_pem(pem.as_bytes()) {
            Ok(key) => key,
            Err(err) => {
                tracing::error!(error = %err, "CLERK_JWT_PUBLIC_KEY is not a valid RSA PEM");
                return None;
            }
        };
        Some(Self {
            http: reqwest::Client::new(),
            api_base: Self::DEFAULT_API_BASE.to_string(),
            secret_key,
            jwt_key,
            validation: Validation::new(Algorithm::RS256),
        })
    }

    /// Pick the account's verified email, preferring the primary address.
    fn verified_email(user: &ClerkUser) -> Option<String> {
        let is_verified = |email: &&ClerkEmail| {
            email
                .verification
                .as_ref()
                .and_then(|v| v.status.as_deref())
                == Some("verified")
        };

        let primary = user.email_addresses.iter().filter(is_verified).find(|e| {
            user.primary_email_address_id.as_deref() == Some(e.id.as_str())
        });
        primary
            .or_else(|| user.email_addresses.iter().find(is_verified))
            .map(|e| e.email_address.clone())
    }
}

#[async_trait]
impl IdentityProvider for ClerkIdentity {
    async fn resolve(&self, token: &str) -> Result<Option<ExternalIdentity>, IdentityError> {
        let claims = match jsonwebtoken::decode::<SessionClaims>(
            token,
            &self.jwt_key,
            &self.validation,
        ) {
            Ok(data) => data.claims,
            Err(err) => {
                tracing::debug!(error = %err, "Session token rejected");
                return Ok(None);
            }
        };

        let response = self
            .http
            .get(format!("{}/v1/users/{}", self.api_base, claims.sub))
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            // Valid token for a since-deleted account.
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(IdentityError::HttpStatus(response.status().as_u16()));
        }

        let user: ClerkUser = response.json().await?;
        Ok(Some(ExternalIdentity {
            external_id: claims.sub,
            verified_email: Self::verified_email(&user),
        }))
    }
}

/// Provider used when identity is not configured: every request is
/// anonymous.
pub struct DisabledIdentity;

#[async_trait]
impl IdentityProvider for DisabledIdentity {
    async fn resolve(&self, _token: &str) -> Result<Option<ExternalIdentity>, IdentityError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(id: &str, address: &str, status: Option<&str>) -> ClerkEmail {
        ClerkEmail {
            id: id.to_string(),
            email_address: address.to_string(),
            verification: status.map(|s| ClerkEmailVerification {
                status: Some(s.to_string()),
            }),
        }
    }

    #[test]
    fn prefers_primary_verified_email() {
        let user = ClerkUser {
            primary_email_address_id: Some("em_2".to_string()),
            email_addresses: vec![
                email("em_1", "old@example.com", Some("verified")),
                email("em_2", "main@example.com", Some("verified")),
            ],
        };
        assert_eq!(
            ClerkIdentity::verified_email(&user).as_deref(),
            Some("main@example.com")
        );
    }

    #[test]
    fn falls_back_to_any_verified_email() {
        let user = ClerkUser {
            primary_email_address_id: Some("em_1".to_string()),
            email_addresses: vec![
                email("em_1", "unconfirmed@example.com", Some("unverified")),
                email("em_2", "other@example.com", Some("verified")),
            ],
        };
        assert_eq!(
            ClerkIdentity::verified_email(&user).as_deref(),
            Some("other@example.com")
        );
    }

    #[test]
    fn no_verified_email_yields_none() {
        let user = ClerkUser {
            primary_email_address_id: None,
            email_addresses: vec![email("em_1", "pending@example.com", None)],
        };
        assert_eq!(ClerkIdentity::verified_email(&user), None);
    }
}
