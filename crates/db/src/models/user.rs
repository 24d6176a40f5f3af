//! User entity model.
//!
//! Users are created lazily on first authenticated request (idempotent
//! upsert keyed by the identity provider's id) and mutated only by the
//! access policy (view counter) and the billing webhook (premium flip).

use dapparchive_core::access::ViewerAccess;
use dapparchive_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    /// Identity-provider subject id (unique).
    pub external_id: String,
    pub email: String,
    /// Billing-provider customer id, set after first checkout completes.
    pub billing_customer_id: Option<String>,
    pub is_premium: bool,
    /// Free-tier premium views consumed. Monotonically non-decreasing
    /// while the user stays on the free tier.
    pub viewed_images: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// The slice of this record the access policy evaluates.
    pub fn access(&self) -> ViewerAccess {
        ViewerAccess {
            is_premium: self.is_premium,
            viewed_images: self.viewed_images,
        }
    }
}
