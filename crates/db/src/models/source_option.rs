//! Guest-acquisition source options ("how did you hear about us").

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sweep_core::types::{DbId, Timestamp};

/// A row from the `source_options` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SourceOption {
    pub id: DbId,
    /// Stable machine key stored in `responses.source`.
    pub key: String,
    pub label: String,
    pub icon: Option<String>,
    pub sort_order: i32,
    /// Inactive options are hidden from the survey but keep their history.
    pub active: bool,
    pub created_at: Timestamp,
}

/// DTO for creating a source option.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSourceOption {
    pub key: String,
    pub label: String,
    pub icon: Option<String>,
    /// Defaults to 0 if omitted.
    pub sort_order: Option<i32>,
}

/// DTO for updating a source option. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSourceOption {
    pub label: Option<String>,
    pub icon: Option<String>,
    pub sort_order: Option<i32>,
    pub active: Option<bool>,
}
