//! Repository for the `users` table.

use dapparchive_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::User;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, external_id, email, billing_customer_id, is_premium, \
                       viewed_images, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Create the user on first sight or refresh the stored email.
    ///
    /// Idempotent `ON CONFLICT` upsert keyed by the identity provider's
    /// id, so concurrent first requests from the same user are safe.
    pub async fn upsert(
        pool: &PgPool,
        external_id: &str,
        email: &str,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (external_id, email)
             VALUES ($1, $2)
             ON CONFLICT (external_id) DO UPDATE SET email = EXCLUDED.email
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(external_id)
            .bind(email)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by identity-provider id.
    pub async fn find_by_external_id(
        pool: &PgPool,
        external_id: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE external_id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(external_id)
            .fetch_optional(pool)
            .await
    }

    /// List all users ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Consume one unit of free-view quota.
    ///
    /// Atomic in-place increment; a read-modify-write here would lose
    /// updates under concurrent views by the same user.
    pub async fn increment_viewed_images(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET viewed_images = viewed_images + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Grant premium access, recording the billing customer id when known.
    ///
    /// Returns `true` if the row was updated.
    pub async fn set_premium(
        pool: &PgPool,
        id: DbId,
        billing_customer_id: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET
                is_premium = true,
                billing_customer_id = COALESCE($2, billing_customer_id)
             WHERE id = $1",
        )
        .bind(id)
        .bind(billing_customer_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
