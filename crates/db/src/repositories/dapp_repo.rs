//! Repository for the `dapps` table.

use dapparchive_core::types::DbId;
use sqlx::PgPool;

use crate::models::dapp::{CreateDapp, Dapp, DappSummary, DappWithImages, UpdateDapp};
use crate::repositories::image_repo::ImageRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, slug, name, description, website, logo_url, featured, \
                       kind, category, created_at, updated_at";

/// Provides CRUD operations for dapps.
pub struct DappRepo;

impl DappRepo {
    /// Insert a new dapp, returning the created row.
    ///
    /// Fails with a unique violation on `uq_dapps_slug` if the slug is
    /// already taken; callers pre-check and treat the constraint as a
    /// backstop against races.
    pub async fn create(pool: &PgPool, input: &CreateDapp) -> Result<Dapp, sqlx::Error> {
        let query = format!(
            "INSERT INTO dapps (slug, name, description, website, logo_url, featured, kind, category)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Dapp>(&query)
            .bind(&input.slug)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.website)
            .bind(&input.logo_url)
            .bind(input.featured.unwrap_or(false))
            .bind(input.kind)
            .bind(input.category)
            .fetch_one(pool)
            .await
    }

    /// Find a dapp by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Dapp>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dapps WHERE id = $1");
        sqlx::query_as::<_, Dapp>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a dapp by its URL slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Dapp>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dapps WHERE slug = $1");
        sqlx::query_as::<_, Dapp>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Find a dapp by ID together with all its images in display order.
    pub async fn find_by_id_with_images(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DappWithImages>, sqlx::Error> {
        let Some(dapp) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let images = ImageRepo::list_by_dapp(pool, dapp.id).await?;
        Ok(Some(DappWithImages { dapp, images }))
    }

    /// Find a dapp by slug together with all its images in display order.
    pub async fn find_by_slug_with_images(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<DappWithImages>, sqlx::Error> {
        let Some(dapp) = Self::find_by_slug(pool, slug).await? else {
            return Ok(None);
        };
        let images = ImageRepo::list_by_dapp(pool, dapp.id).await?;
        Ok(Some(DappWithImages { dapp, images }))
    }

    /// List all dapps newest-first, with per-dapp image counts.
    pub async fn list(pool: &PgPool) -> Result<Vec<DappSummary>, sqlx::Error> {
        sqlx::query_as::<_, DappSummary>(
            "SELECT d.id, d.slug, d.name, d.description, d.logo_url, d.featured,
                    d.kind, d.category,
                    (SELECT COUNT(*) FROM images i WHERE i.dapp_id = d.id) AS image_count,
                    d.created_at
             FROM dapps d
             ORDER BY d.created_at DESC",
        )
        .fetch_all(pool)
        .await
    }

    /// Update a dapp. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDapp,
    ) -> Result<Option<Dapp>, sqlx::Error> {
        let query = format!(
            "UPDATE dapps SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                website = COALESCE($4, website),
                logo_url = COALESCE($5, logo_url),
                featured = COALESCE($6, featured),
                kind = COALESCE($7, kind),
                category = COALESCE($8, category)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Dapp>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.website)
            .bind(&input.logo_url)
            .bind(input.featured)
            .bind(input.kind)
            .bind(input.category)
            .fetch_optional(pool)
            .await
    }

    /// Delete a dapp; the database cascades to its images, flows, and
    /// flow steps. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM dapps WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
