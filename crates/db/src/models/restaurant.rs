//! Restaurant entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sweep_core::types::{DbId, Timestamp};

/// A restaurant row from the `restaurants` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Restaurant {
    pub id: DbId,
    pub name: String,
    /// Public survey address; fixed at creation.
    pub slug: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for creating a restaurant. The slug is derived from `name`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRestaurant {
    pub name: String,
}

/// Request body for renaming a restaurant.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRestaurant {
    pub name: String,
}
