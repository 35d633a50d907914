//! Repository for the `source_options` table.

use sqlx::PgPool;
use sweep_core::types::DbId;

use crate::models::source_option::{CreateSourceOption, SourceOption, UpdateSourceOption};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, key, label, icon, sort_order, active, created_at";

/// Provides CRUD operations for survey source options.
pub struct SourceOptionRepo;

impl SourceOptionRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateSourceOption,
    ) -> Result<SourceOption, sqlx::Error> {
        let query = format!(
            "INSERT INTO source_options (key, label, icon, sort_order)
             VALUES ($1, $2, $3, COALESCE($4, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SourceOption>(&query)
            .bind(&input.key)
            .bind(&input.label)
            .bind(&input.icon)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    /// Options shown on the public survey, in display order.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<SourceOption>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM source_options WHERE active = true ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, SourceOption>(&query)
            .fetch_all(pool)
            .await
    }

    /// Every option, including inactive ones, in display order.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<SourceOption>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM source_options ORDER BY sort_order, id");
        sqlx::query_as::<_, SourceOption>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn find_active_by_key(
        pool: &PgPool,
        key: &str,
    ) -> Result<Option<SourceOption>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM source_options WHERE key = $1 AND active = true");
        sqlx::query_as::<_, SourceOption>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// Update an option. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSourceOption,
    ) -> Result<Option<SourceOption>, sqlx::Error> {
        let query = format!(
            "UPDATE source_options SET
                label = COALESCE($2, label),
                icon = COALESCE($3, icon),
                sort_order = COALESCE($4, sort_order),
                active = COALESCE($5, active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SourceOption>(&query)
            .bind(id)
            .bind(&input.label)
            .bind(&input.icon)
            .bind(input.sort_order)
            .bind(input.active)
            .fetch_optional(pool)
            .await
    }
}
