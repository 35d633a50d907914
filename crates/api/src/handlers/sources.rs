//! Admin management of survey answer choices.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use sweep_core::error::CoreError;
use sweep_core::types::DbId;
use sweep_db::models::source_option::{CreateSourceOption, SourceOption, UpdateSourceOption};
use sweep_db::repositories::SourceOptionRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthAdmin;
use crate::state::AppState;

const MAX_KEY_LENGTH: usize = 32;

/// Keys are stored on every response, so they are kept short and plain:
/// lowercase ASCII letters, digits and underscores.
fn validate_key(key: &str) -> Result<(), CoreError> {
    let ok = !key.is_empty()
        && key.len() <= MAX_KEY_LENGTH
        && key
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');
    if !ok {
        return Err(CoreError::Validation(format!(
            "Source key must be 1-{MAX_KEY_LENGTH} characters of a-z, 0-9 or _"
        )));
    }
    Ok(())
}

fn validate_label(label: &str) -> Result<(), CoreError> {
    if label.trim().is_empty() {
        return Err(CoreError::Validation("Source label must not be empty".into()));
    }
    Ok(())
}

/// GET /api/v1/admin/sources
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthAdmin,
) -> AppResult<Json<Vec<SourceOption>>> {
    Ok(Json(SourceOptionRepo::list_all(&state.pool).await?))
}

/// POST /api/v1/admin/sources
pub async fn create(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Json(mut input): Json<CreateSourceOption>,
) -> AppResult<(StatusCode, Json<SourceOption>)> {
    input.key = input.key.trim().to_string();
    validate_key(&input.key)?;
    validate_label(&input.label)?;

    let option = SourceOptionRepo::create(&state.pool, &input).await?;
    tracing::info!(source_id = option.id, key = %option.key, "Source option created");
    Ok((StatusCode::CREATED, Json(option)))
}

/// PUT /api/v1/admin/sources/{id}
///
/// The key cannot change; deactivate and create a new option instead.
pub async fn update(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSourceOption>,
) -> AppResult<Json<SourceOption>> {
    if let Some(label) = &input.label {
        validate_label(label)?;
    }

    let option = SourceOptionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Source option", id)))?;
    tracing::info!(source_id = id, active = option.active, "Source option updated");
    Ok(Json(option))
}
