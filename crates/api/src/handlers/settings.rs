//! Admin application settings (notification chat and switch).

use axum::extract::State;
use axum::Json;
use sweep_core::error::CoreError;
use sweep_db::models::app_setting::{AppSettings, UpdateAppSettings};
use sweep_db::repositories::AppSettingRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthAdmin;
use crate::state::AppState;

/// A chat id is a signed integer or an `@channel` name. Empty clears it.
fn validate_chat_id(chat_id: &str) -> Result<(), CoreError> {
    let chat_id = chat_id.trim();
    if chat_id.is_empty() {
        return Ok(());
    }
    let digits = chat_id.strip_prefix('-').unwrap_or(chat_id);
    let numeric = !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit());
    let channel = chat_id.strip_prefix('@').is_some_and(|name| {
        !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
    });
    if numeric || channel {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "telegram_chat_id must be a numeric chat id or an @channel name".into(),
        ))
    }
}

/// GET /api/v1/admin/settings
pub async fn get_settings(
    State(state): State<AppState>,
    _auth: AuthAdmin,
) -> AppResult<Json<AppSettings>> {
    Ok(Json(AppSettingRepo::get(&state.pool).await?))
}

/// PUT /api/v1/admin/settings
///
/// Absent fields stay as they are.
pub async fn update_settings(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Json(input): Json<UpdateAppSettings>,
) -> AppResult<Json<AppSettings>> {
    if let Some(chat_id) = &input.telegram_chat_id {
        validate_chat_id(chat_id)?;
    }

    let settings = AppSettingRepo::update(&state.pool, &input).await?;
    tracing::info!(
        admin_id = auth.admin.id,
        notifications_enabled = settings.telegram_notifications_enabled,
        chat_configured = settings.telegram_chat_id.is_some(),
        "Settings updated"
    );
    Ok(Json(settings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_id_formats() {
        assert!(validate_chat_id("").is_ok());
        assert!(validate_chat_id("123456").is_ok());
        assert!(validate_chat_id("-1001234567890").is_ok());
        assert!(validate_chat_id("@sweep_channel").is_ok());

        assert!(validate_chat_id("-").is_err());
        assert!(validate_chat_id("@").is_err());
        assert!(validate_chat_id("12a").is_err());
        assert!(validate_chat_id("@bad name").is_err());
    }
}
