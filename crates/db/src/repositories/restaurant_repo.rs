//! Repository for the `restaurants` table.

use sqlx::PgPool;
use sweep_core::slug;
use sweep_core::types::DbId;

use super::is_unique_violation;
use crate::models::restaurant::Restaurant;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, slug, created_at, updated_at";

/// How many `-N` suffixes to try before giving up on a slug.
const MAX_SLUG_ATTEMPTS: u32 = 50;

const SLUG_CONSTRAINT: &str = "uq_restaurants_slug";

/// Provides CRUD operations for restaurants.
pub struct RestaurantRepo;

impl RestaurantRepo {
    /// Insert a restaurant with an explicit slug.
    pub async fn create(pool: &PgPool, name: &str, slug: &str) -> Result<Restaurant, sqlx::Error> {
        let query = format!(
            "INSERT INTO restaurants (name, slug)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Restaurant>(&query)
            .bind(name)
            .bind(slug)
            .fetch_one(pool)
            .await
    }

    /// Insert a restaurant, appending `-2`, `-3`, ... to `base_slug` until
    /// the unique constraint accepts it.
    ///
    /// Relies on the constraint rather than a pre-check, so two concurrent
    /// creations with the same name still end up with distinct slugs.
    pub async fn create_with_unique_slug(
        pool: &PgPool,
        name: &str,
        base_slug: &str,
    ) -> Result<Restaurant, sqlx::Error> {
        let mut attempt = 1;
        loop {
            let candidate = slug::candidate(base_slug, attempt);
            match Self::create(pool, name, &candidate).await {
                Err(e) if is_unique_violation(&e, SLUG_CONSTRAINT) && attempt < MAX_SLUG_ATTEMPTS => {
                    tracing::debug!(slug = %candidate, "Slug taken, trying next suffix");
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Restaurant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM restaurants WHERE id = $1");
        sqlx::query_as::<_, Restaurant>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Restaurant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM restaurants WHERE slug = $1");
        sqlx::query_as::<_, Restaurant>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List all restaurants in creation order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Restaurant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM restaurants ORDER BY id");
        sqlx::query_as::<_, Restaurant>(&query).fetch_all(pool).await
    }

    /// Change the display name. The slug is left as is.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn rename(
        pool: &PgPool,
        id: DbId,
        name: &str,
    ) -> Result<Option<Restaurant>, sqlx::Error> {
        let query = format!("UPDATE restaurants SET name = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Restaurant>(&query)
            .bind(id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Delete a restaurant and (via cascade) its responses.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM restaurants WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
