use std::sync::Arc;

use dapparchive_db::DataAccess;

use crate::billing::{BillingProvider, DisabledBilling, StripeBilling};
use crate::config::ServerConfig;
use crate::identity::{ClerkIdentity, DisabledIdentity, IdentityProvider};
use crate::storage::{DisabledStorage, ObjectStorage, SupabaseStorage};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Resilient data access handle (connected or degraded).
    pub data: DataAccess,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Identity provider for session token resolution.
    pub identity: Arc<dyn IdentityProvider>,
    /// Object storage for screenshot binaries.
    pub storage: Arc<dyn ObjectStorage>,
    /// Billing provider for premium checkout.
    pub billing: Arc<dyn BillingProvider>,
}

/// Wire the external providers from configuration.
///
/// Each integration that is missing its credentials is replaced with a
/// disabled stand-in and logged, so the server always starts; the
/// affected endpoints report unavailability instead.
pub fn providers_from_config(
    config: &ServerConfig,
) -> (
    Arc<dyn IdentityProvider>,
    Arc<dyn ObjectStorage>,
    Arc<dyn BillingProvider>,
) {
    let identity: Arc<dyn IdentityProvider> = match ClerkIdentity::from_config(&config.clerk) {
        Some(provider) => Arc::new(provider),
        None => {
            tracing::warn!("Identity provider not configured, all requests will be anonymous");
            Arc::new(DisabledIdentity)
        }
    };

    let storage: Arc<dyn ObjectStorage> = match SupabaseStorage::from_config(&config.supabase) {
        Some(backend) => Arc::new(backend),
        None => {
            tracing::warn!("Object storage not configured, image uploads are disabled");
            Arc::new(DisabledStorage)
        }
    };

    let billing: Arc<dyn BillingProvider> =
        match StripeBilling::from_config(&config.stripe, &config.public_base_url) {
            Some(provider) => Arc::new(provider),
            None => {
                tracing::warn!("Billing not configured, premium checkout is disabled");
                Arc::new(DisabledBilling)
            }
        };

    (identity, storage, billing)
}
