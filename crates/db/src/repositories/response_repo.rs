//! Repository for the `responses` table, including the aggregate queries
//! behind the admin dashboard and the bot summaries.

use sqlx::{PgConnection, PgPool};
use sweep_core::types::{DbId, Timestamp};

use crate::models::response::{
    DateCountRow, ResponseFilter, RestaurantSourceCountRow, SourceCountRow, SurveyResponse,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, restaurant_id, source, created_at";

/// WHERE clause for [`ResponseFilter`]; binds are `$1..$3`.
const FILTER: &str = "($1::bigint IS NULL OR restaurant_id = $1)
               AND ($2::timestamptz IS NULL OR created_at >= $2)
               AND ($3::timestamptz IS NULL OR created_at < $3)";

/// Provides inserts and aggregate reads over survey responses.
pub struct ResponseRepo;

impl ResponseRepo {
    /// Insert a response. Takes a connection so callers can run it inside
    /// the same transaction as the follow-up count.
    pub async fn create(
        conn: &mut PgConnection,
        restaurant_id: DbId,
        source: &str,
    ) -> Result<SurveyResponse, sqlx::Error> {
        let query = format!(
            "INSERT INTO responses (restaurant_id, source)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SurveyResponse>(&query)
            .bind(restaurant_id)
            .bind(source)
            .fetch_one(conn)
            .await
    }

    /// Count a restaurant's responses recorded at or after `since`.
    pub async fn count_since(
        conn: &mut PgConnection,
        restaurant_id: DbId,
        since: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM responses WHERE restaurant_id = $1 AND created_at >= $2",
        )
        .bind(restaurant_id)
        .bind(since)
        .fetch_one(conn)
        .await?;
        Ok(count)
    }

    /// List responses matching `filter`, oldest first.
    pub async fn list(
        pool: &PgPool,
        filter: &ResponseFilter,
    ) -> Result<Vec<SurveyResponse>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM responses WHERE {FILTER} ORDER BY created_at, id");
        sqlx::query_as::<_, SurveyResponse>(&query)
            .bind(filter.restaurant_id)
            .bind(filter.from)
            .bind(filter.to)
            .fetch_all(pool)
            .await
    }

    /// Responses per source key, most frequent first.
    pub async fn count_by_source(
        pool: &PgPool,
        filter: &ResponseFilter,
    ) -> Result<Vec<SourceCountRow>, sqlx::Error> {
        let query = format!(
            "SELECT source, COUNT(*) AS count FROM responses
             WHERE {FILTER}
             GROUP BY source
             ORDER BY count DESC, source"
        );
        sqlx::query_as::<_, SourceCountRow>(&query)
            .bind(filter.restaurant_id)
            .bind(filter.from)
            .bind(filter.to)
            .fetch_all(pool)
            .await
    }

    /// Responses per MSK (UTC+3) calendar day, ascending.
    pub async fn count_by_msk_date(
        pool: &PgPool,
        filter: &ResponseFilter,
    ) -> Result<Vec<DateCountRow>, sqlx::Error> {
        let query = format!(
            "SELECT ((created_at AT TIME ZONE 'UTC') + INTERVAL '3 hours')::date AS date,
                    COUNT(*) AS count
             FROM responses
             WHERE {FILTER}
             GROUP BY 1
             ORDER BY 1"
        );
        sqlx::query_as::<_, DateCountRow>(&query)
            .bind(filter.restaurant_id)
            .bind(filter.from)
            .bind(filter.to)
            .fetch_all(pool)
            .await
    }

    /// Responses per (restaurant, source) since `since` (all time if `None`),
    /// grouped by restaurant with the most frequent source first.
    pub async fn count_by_restaurant_and_source(
        pool: &PgPool,
        since: Option<Timestamp>,
    ) -> Result<Vec<RestaurantSourceCountRow>, sqlx::Error> {
        sqlx::query_as::<_, RestaurantSourceCountRow>(
            "SELECT restaurant_id, source, COUNT(*) AS count
             FROM responses
             WHERE ($1::timestamptz IS NULL OR created_at >= $1)
             GROUP BY restaurant_id, source
             ORDER BY restaurant_id, count DESC, source",
        )
        .bind(since)
        .fetch_all(pool)
        .await
    }
}
