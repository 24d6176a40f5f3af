//! Repository for the `images` table.

use dapparchive_core::types::DbId;
use sqlx::PgPool;

use crate::models::image::{CreateImage, Image, ImageFilter, UpdateImage};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, dapp_id, url, title, description, category, version, \
                       flow, ui_element, tags, is_premium, display_order, \
                       captured_at, created_at, updated_at";

/// Display ordering: explicit order first, creation time breaks ties.
const ORDERING: &str = "ORDER BY display_order ASC, created_at ASC";

/// Provides CRUD operations for images.
pub struct ImageRepo;

impl ImageRepo {
    /// Insert a new image, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateImage) -> Result<Image, sqlx::Error> {
        let query = format!(
            "INSERT INTO images (dapp_id, url, title, description, category, version,
                                 flow, ui_element, tags, is_premium, display_order, captured_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Image>(&query)
            .bind(input.dapp_id)
            .bind(&input.url)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.category)
            .bind(&input.version)
            .bind(input.flow)
            .bind(input.ui_element)
            .bind(&input.tags)
            .bind(input.is_premium.unwrap_or(false))
            .bind(input.display_order.unwrap_or(0))
            .bind(input.captured_at)
            .fetch_one(pool)
            .await
    }

    /// Find an image by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Image>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM images WHERE id = $1");
        sqlx::query_as::<_, Image>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all images of one dapp in display order.
    pub async fn list_by_dapp(pool: &PgPool, dapp_id: DbId) -> Result<Vec<Image>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM images WHERE dapp_id = $1 {ORDERING}");
        sqlx::query_as::<_, Image>(&query)
            .bind(dapp_id)
            .fetch_all(pool)
            .await
    }

    /// List images matching the given filters, in display order.
    ///
    /// `NULL` filter parameters match everything, so a single query covers
    /// all filter combinations.
    pub async fn list(pool: &PgPool, filter: &ImageFilter) -> Result<Vec<Image>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM images
             WHERE ($1::BIGINT IS NULL OR dapp_id = $1)
               AND ($2::category IS NULL OR category = $2)
               AND ($3::ui_flow IS NULL OR flow = $3)
             {ORDERING}"
        );
        sqlx::query_as::<_, Image>(&query)
            .bind(filter.dapp_id)
            .bind(filter.category)
            .bind(filter.flow)
            .fetch_all(pool)
            .await
    }

    /// Update an image. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateImage,
    ) -> Result<Option<Image>, sqlx::Error> {
        let query = format!(
            "UPDATE images SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                version = COALESCE($5, version),
                flow = COALESCE($6, flow),
                ui_element = COALESCE($7, ui_element),
                tags = COALESCE($8, tags),
                is_premium = COALESCE($9, is_premium),
                display_order = COALESCE($10, display_order),
                captured_at = COALESCE($11, captured_at)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Image>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.category)
            .bind(&input.version)
            .bind(input.flow)
            .bind(input.ui_element)
            .bind(&input.tags)
            .bind(input.is_premium)
            .bind(input.display_order)
            .bind(input.captured_at)
            .fetch_optional(pool)
            .await
    }

    /// Delete an image. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM images WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
