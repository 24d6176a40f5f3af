//! Image entity model and DTOs.

use dapparchive_core::taxonomy::{Category, UiElement, UiFlow};
use dapparchive_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `images` table.
///
/// `url` points at the externally stored binary; the storage path is
/// derived from it when the object has to be removed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Image {
    pub id: DbId,
    pub dapp_id: DbId,
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub version: Option<String>,
    pub flow: Option<UiFlow>,
    pub ui_element: Option<UiElement>,
    pub tags: Vec<String>,
    pub is_premium: bool,
    pub display_order: i32,
    pub captured_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new image.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateImage {
    pub dapp_id: DbId,
    #[validate(url(message = "url must be a valid URL"))]
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub version: Option<String>,
    pub flow: Option<UiFlow>,
    pub ui_element: Option<UiElement>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_premium: Option<bool>,
    pub display_order: Option<i32>,
    pub captured_at: Option<Timestamp>,
}

/// DTO for updating an existing image. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateImage {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub version: Option<String>,
    pub flow: Option<UiFlow>,
    pub ui_element: Option<UiElement>,
    pub tags: Option<Vec<String>>,
    pub is_premium: Option<bool>,
    pub display_order: Option<i32>,
    pub captured_at: Option<Timestamp>,
}

/// Listing filters for image queries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageFilter {
    pub dapp_id: Option<DbId>,
    pub category: Option<Category>,
    pub flow: Option<UiFlow>,
}
