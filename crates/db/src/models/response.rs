//! Guest survey responses and aggregate rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sweep_core::types::{DbId, Timestamp};

/// A row from the `responses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SurveyResponse {
    pub id: DbId,
    pub restaurant_id: DbId,
    /// A `source_options.key` value.
    pub source: String,
    pub created_at: Timestamp,
}

/// Optional filters shared by the listing and aggregate queries.
///
/// `from` is inclusive, `to` is exclusive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseFilter {
    pub restaurant_id: Option<DbId>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
}

/// Number of responses per source key.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SourceCountRow {
    pub source: String,
    pub count: i64,
}

/// Number of responses per MSK calendar day.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DateCountRow {
    pub date: NaiveDate,
    pub count: i64,
}

/// Number of responses per (restaurant, source) pair.
#[derive(Debug, Clone, FromRow)]
pub struct RestaurantSourceCountRow {
    pub restaurant_id: DbId,
    pub source: String,
    pub count: i64,
}
