//! Request authentication extractors.
//!
//! [`Viewer`] never rejects: it resolves the bearer token when one is
//! present and otherwise treats the request as anonymous, so public
//! catalog pages render for everyone. [`RequireAdmin`] gates mutation
//! endpoints on the single configured admin email.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use dapparchive_core::error::CoreError;
use dapparchive_db::models::user::User;
use dapparchive_db::repositories::user_repo::UserRepo;

use crate::error::AppError;
use crate::state::AppState;

/// The (possibly anonymous) viewer behind a request.
///
/// When the token resolves, the user row is lazily upserted so first
/// requests from a new account create its record. If the store is
/// unavailable the request downgrades to anonymous rather than failing.
#[derive(Debug, Clone)]
pub struct Viewer(pub Option<User>);

impl FromRequestParts<AppState> for Viewer {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(Viewer(None));
        };

        let identity = match state.identity.resolve(token).await {
            Ok(Some(identity)) => identity,
            Ok(None) => return Ok(Viewer(None)),
            Err(err) => {
                tracing::warn!(error = %err, "Identity lookup failed, treating request as anonymous");
                return Ok(Viewer(None));
            }
        };

        let external_id = identity.external_id;
        let email = identity.verified_email.unwrap_or_default();
        let upserted = state
            .data
            .write("upsert_user", |pool| {
                let external_id = external_id.clone();
                let email = email.clone();
                async move { UserRepo::upsert(&pool, &external_id, &email).await }
            })
            .await;

        match upserted {
            Ok(user) => Ok(Viewer(Some(user))),
            Err(err) => {
                tracing::warn!(
                    external_id,
                    error = %err,
                    "User record unavailable, downgrading to anonymous",
                );
                Ok(Viewer(None))
            }
        }
    }
}

/// Identity of the administrator behind an admin-gated request.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub external_id: String,
    pub email: String,
}

/// Rejects with 401 when not signed in and 403 when signed in as anyone
/// other than the configured admin. Does not touch the data store.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AdminUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing Authorization header".into(),
            ))
        })?;

        let identity = state
            .identity
            .resolve(token)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "Identity provider error");
                AppError::Core(CoreError::Unauthorized("Could not verify session".into()))
            })?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
            })?;

        let admin_email = state.config.admin_email.as_deref().ok_or_else(|| {
            AppError::Core(CoreError::Forbidden("No administrator is configured".into()))
        })?;

        let is_admin = identity
            .verified_email
            .as_deref()
            .is_some_and(|email| email.eq_ignore_ascii_case(admin_email));
        if !is_admin {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin access required".into(),
            )));
        }

        Ok(RequireAdmin(AdminUser {
            external_id: identity.external_id,
            email: admin_email.to_string(),
        }))
    }
}

/// Extract the bearer token from the `Authorization` header, if any.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
