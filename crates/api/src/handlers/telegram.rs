//! Telegram endpoints: the bot webhook and the admin "send message" call.

use std::fmt;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use sweep_core::error::CoreError;
use sweep_core::secrets::constant_time_eq;
use sweep_telegram::client::SendMessage;
use sweep_telegram::types::Update;
use sweep_telegram::TelegramError;

use crate::bot;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthAdmin;
use crate::response::OkResponse;
use crate::state::AppState;

/// Header Telegram sends when the webhook was registered with a secret.
pub const WEBHOOK_SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// A chat id as clients send it: a number or an `@channel` string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ChatTarget {
    Id(i64),
    Name(String),
}

impl fmt::Display for ChatTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatTarget::Id(id) => write!(f, "{id}"),
            ChatTarget::Name(name) => f.write_str(name.trim()),
        }
    }
}

/// Request body for `POST /telegram/send`.
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub chat_id: ChatTarget,
    pub text: String,
    #[serde(default)]
    pub silent: bool,
}

#[derive(Debug, Serialize)]
pub struct SendResult {
    pub success: bool,
    pub message_id: i64,
}

/// POST /api/v1/telegram/webhook
///
/// Always acknowledges with `{"ok": true}` once the secret header checks
/// out; handling errors are logged only, so Telegram never retries.
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<OkResponse>> {
    if let Some(expected) = &state.config.telegram.webhook_secret {
        let presented = headers
            .get(WEBHOOK_SECRET_HEADER)
            .map(|v| v.as_bytes())
            .unwrap_or_default();
        if !constant_time_eq(presented, expected.as_bytes()) {
            tracing::warn!("Webhook call with a wrong secret token");
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid webhook secret".into(),
            )));
        }
    }

    match serde_json::from_slice::<Update>(&body) {
        Ok(update) => bot::handle_update(&state, update).await,
        Err(e) => tracing::warn!(error = %e, "Ignoring unparseable Telegram update"),
    }

    Ok(Json(OkResponse::new()))
}

/// POST /api/v1/telegram/send
///
/// Send an HTML message as the bot. Telegram API refusals (unknown chat,
/// bot blocked) come back as 400 with Telegram's description.
pub async fn send(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Json(input): Json<SendRequest>,
) -> AppResult<Json<SendResult>> {
    let chat_id = input.chat_id.to_string();
    if chat_id.is_empty() {
        return Err(AppError::BadRequest("chat_id is required".into()));
    }
    if input.text.trim().is_empty() {
        return Err(AppError::BadRequest("text is required".into()));
    }

    let bot = state
        .bot
        .as_ref()
        .ok_or_else(|| AppError::BadRequest("Telegram bot is not configured".into()))?;

    let request = SendMessage::html(chat_id.clone(), input.text.trim()).silent(input.silent);
    let message_id = bot.send_message(&request).await.map_err(|e| match e {
        TelegramError::Api { description, .. } => AppError::BadRequest(description),
        other => AppError::Upstream(other.to_string()),
    })?;

    tracing::info!(admin_id = auth.admin.id, chat_id = %chat_id, message_id, "Message sent");
    Ok(Json(SendResult {
        success: true,
        message_id,
    }))
}
