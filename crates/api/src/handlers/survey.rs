//! Public survey: the page data for a restaurant and the guest's answer.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sweep_core::error::CoreError;
use sweep_core::msk::msk_day_start;
use sweep_core::summary::render_new_response;
use sweep_db::models::response::SurveyResponse;
use sweep_db::models::restaurant::Restaurant;
use sweep_db::repositories::{AppSettingRepo, ResponseRepo, RestaurantRepo, SourceOptionRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::restaurants::PublicRestaurant;
use crate::response::OkResponse;
use crate::state::AppState;

/// An answer choice as shown to guests.
#[derive(Debug, Serialize)]
pub struct PublicSource {
    pub key: String,
    pub label: String,
    pub icon: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SurveyPage {
    pub restaurant: PublicRestaurant,
    pub sources: Vec<PublicSource>,
}

/// Request body for `POST /survey/{slug}/responses`.
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    pub source: String,
}

async fn restaurant_by_slug(state: &AppState, slug: &str) -> AppResult<Restaurant> {
    RestaurantRepo::find_by_slug(&state.pool, slug)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Restaurant",
                key: slug.to_string(),
            })
        })
}

/// Record one guest answer and notify the configured chat.
///
/// The insert and today's count share a transaction. The notification goes
/// out after commit on its own task, so its outcome cannot affect the
/// result.
pub async fn record_response(
    state: &AppState,
    restaurant: &Restaurant,
    source_key: &str,
) -> AppResult<SurveyResponse> {
    let source = SourceOptionRepo::find_active_by_key(&state.pool, source_key)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!("Unknown source: {source_key}")))
        })?;

    let mut tx = state.pool.begin().await?;
    let response = ResponseRepo::create(&mut tx, restaurant.id, &source.key).await?;
    let today_count =
        ResponseRepo::count_since(&mut tx, restaurant.id, msk_day_start(response.created_at))
            .await?;
    tx.commit().await?;

    tracing::info!(
        response_id = response.id,
        restaurant_id = restaurant.id,
        source = %source.key,
        today_count,
        "Guest response recorded"
    );

    match AppSettingRepo::get(&state.pool).await {
        Ok(settings) => {
            if let Some(chat_id) = settings.notification_target() {
                let text = render_new_response(
                    &restaurant.name,
                    &source.label,
                    today_count,
                    response.created_at,
                );
                sweep_telegram::dispatch(state.notifier.clone(), chat_id.to_string(), text);
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Could not load settings; notification skipped");
        }
    }

    Ok(response)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/survey/{slug}
pub async fn get_survey(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<SurveyPage>> {
    let restaurant = restaurant_by_slug(&state, &slug).await?;
    let sources = SourceOptionRepo::list_active(&state.pool)
        .await?
        .into_iter()
        .map(|s| PublicSource {
            key: s.key,
            label: s.label,
            icon: s.icon,
        })
        .collect();

    Ok(Json(SurveyPage {
        restaurant: restaurant.into(),
        sources,
    }))
}

/// POST /api/v1/survey/{slug}/responses
pub async fn submit_response(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(input): Json<SubmitResponse>,
) -> AppResult<(StatusCode, Json<OkResponse>)> {
    let restaurant = restaurant_by_slug(&state, &slug).await?;
    let response = record_response(&state, &restaurant, input.source.trim()).await?;
    Ok((StatusCode::CREATED, Json(OkResponse::created(response.id))))
}
