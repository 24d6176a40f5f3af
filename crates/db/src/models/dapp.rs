//! Dapp entity model and DTOs.

use dapparchive_core::taxonomy::{Category, DappKind};
use dapparchive_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::image::Image;

/// A row from the `dapps` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Dapp {
    pub id: DbId,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub featured: bool,
    pub kind: Option<DappKind>,
    pub category: Option<Category>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Listing row: a dapp plus its image count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DappSummary {
    pub id: DbId,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub featured: bool,
    pub kind: Option<DappKind>,
    pub category: Option<Category>,
    pub image_count: i64,
    pub created_at: Timestamp,
}

/// A dapp with its images, for detail pages and cascade deletion.
#[derive(Debug, Clone, Serialize)]
pub struct DappWithImages {
    #[serde(flatten)]
    pub dapp: Dapp,
    pub images: Vec<Image>,
}

/// DTO for creating a new dapp.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDapp {
    #[validate(length(min = 2, message = "name must be at least 2 characters"))]
    pub name: String,
    #[validate(length(min = 2, message = "slug must be at least 2 characters"))]
    pub slug: String,
    pub description: Option<String>,
    #[validate(url(message = "website must be a valid URL"))]
    pub website: Option<String>,
    #[validate(url(message = "logo_url must be a valid URL"))]
    pub logo_url: Option<String>,
    pub featured: Option<bool>,
    pub kind: Option<DappKind>,
    pub category: Option<Category>,
}

/// DTO for updating an existing dapp. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateDapp {
    #[validate(length(min = 2, message = "name must be at least 2 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(url(message = "website must be a valid URL"))]
    pub website: Option<String>,
    #[validate(url(message = "logo_url must be a valid URL"))]
    pub logo_url: Option<String>,
    pub featured: Option<bool>,
    pub kind: Option<DappKind>,
    pub category: Option<Category>,
}
