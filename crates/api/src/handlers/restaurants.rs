//! Handlers for restaurants: the public list and admin create/rename/delete.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use sweep_core::error::CoreError;
use sweep_core::slug::slugify;
use sweep_core::types::DbId;
use sweep_db::models::restaurant::{CreateRestaurant, Restaurant, UpdateRestaurant};
use sweep_db::repositories::RestaurantRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthAdmin;
use crate::state::AppState;

/// Longest accepted restaurant name, in characters.
const MAX_NAME_LENGTH: usize = 200;

/// Restaurant as shown to guests.
#[derive(Debug, Serialize)]
pub struct PublicRestaurant {
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

impl From<Restaurant> for PublicRestaurant {
    fn from(r: Restaurant) -> Self {
        Self {
            id: r.id,
            name: r.name,
            slug: r.slug,
        }
    }
}

fn validate_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Restaurant name must not be empty".into(),
        )));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Restaurant name must be at most {MAX_NAME_LENGTH} characters"
        ))));
    }
    Ok(name.to_string())
}

// ---------------------------------------------------------------------------
// Shared logic (also used by the action router)
// ---------------------------------------------------------------------------

pub async fn list_restaurants(state: &AppState) -> AppResult<Vec<PublicRestaurant>> {
    let restaurants = RestaurantRepo::list(&state.pool).await?;
    Ok(restaurants.into_iter().map(PublicRestaurant::from).collect())
}

/// Create a restaurant with a slug derived from its name.
pub async fn create_restaurant(state: &AppState, name: &str) -> AppResult<Restaurant> {
    let name = validate_name(name)?;
    let restaurant =
        RestaurantRepo::create_with_unique_slug(&state.pool, &name, &slugify(&name)).await?;
    tracing::info!(
        restaurant_id = restaurant.id,
        slug = %restaurant.slug,
        "Restaurant created"
    );
    Ok(restaurant)
}

/// Rename a restaurant. The slug does not change.
pub async fn rename_restaurant(state: &AppState, id: DbId, name: &str) -> AppResult<Restaurant> {
    let name = validate_name(name)?;
    let restaurant = RestaurantRepo::rename(&state.pool, id, &name)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Restaurant", id)))?;
    tracing::info!(restaurant_id = id, "Restaurant renamed");
    Ok(restaurant)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/restaurants
pub async fn list_public(State(state): State<AppState>) -> AppResult<Json<Vec<PublicRestaurant>>> {
    Ok(Json(list_restaurants(&state).await?))
}

/// POST /api/v1/admin/restaurants
pub async fn create(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Json(input): Json<CreateRestaurant>,
) -> AppResult<(StatusCode, Json<Restaurant>)> {
    let restaurant = create_restaurant(&state, &input.name).await?;
    Ok((StatusCode::CREATED, Json(restaurant)))
}

/// PUT /api/v1/admin/restaurants/{id}
pub async fn rename(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRestaurant>,
) -> AppResult<Json<Restaurant>> {
    Ok(Json(rename_restaurant(&state, id, &input.name).await?))
}

/// DELETE /api/v1/admin/restaurants/{id}
///
/// Also deletes the restaurant's responses.
pub async fn delete(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !RestaurantRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::not_found("Restaurant", id)));
    }
    tracing::info!(restaurant_id = id, "Restaurant deleted");
    Ok(StatusCode::NO_CONTENT)
}
