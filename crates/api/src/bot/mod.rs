//! Telegram bot behaviour behind the webhook.
//!
//! [`handle_update`] never fails: every error is logged and the update is
//! considered handled, so Telegram does not redeliver it.

pub mod commands;
pub mod replies;
pub mod summary;

use chrono::Utc;
use sweep_core::identity::TelegramIdentity;
use sweep_core::summary::SummaryPeriod;
use sweep_telegram::types::{CallbackQuery, Message, Update, User};
use sweep_telegram::{BotClient, TelegramError};

use crate::auth::telegram_login;
use crate::state::AppState;
use commands::{parse_callback, parse_command, Command};

#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error(transparent)]
    Telegram(#[from] TelegramError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// React to one webhook update.
pub async fn handle_update(state: &AppState, update: Update) {
    let Some(bot) = state.bot.as_ref() else {
        tracing::debug!(update_id = update.update_id, "Bot not configured, update ignored");
        return;
    };

    let update_id = update.update_id;
    let result = if let Some(query) = update.callback_query {
        on_callback(state, bot, query).await
    } else if let Some(message) = update.message {
        on_message(state, bot, message).await
    } else {
        Ok(())
    };

    if let Err(e) = result {
        tracing::warn!(update_id, error = %e, "Failed to handle Telegram update");
    }
}

async fn on_callback(state: &AppState, bot: &BotClient, query: CallbackQuery) -> Result<(), BotError> {
    let chat_id = query.message.as_ref().map(|m| m.chat.id);
    let period = query.data.as_deref().and_then(parse_callback);

    let outcome = match (chat_id, period) {
        (Some(chat_id), Some(period)) => send_summary(state, bot, chat_id, period).await,
        _ => Ok(()),
    };

    // Stops the button's loading spinner; nothing else depends on it.
    if let Err(e) = bot.answer_callback_query(&query.id).await {
        tracing::debug!(error = %e, "answerCallbackQuery failed");
    }
    outcome
}

async fn on_message(state: &AppState, bot: &BotClient, message: Message) -> Result<(), BotError> {
    let chat_id = message.chat.id;
    let bot_username = state.config.telegram.bot_username.as_deref();

    if !message.new_chat_members.is_empty() {
        if message
            .new_chat_members
            .iter()
            .any(|member| is_this_bot(member, bot_username))
        {
            tracing::info!(chat_id, "Bot added to a chat");
            bot.send_message(&replies::group_greeting(chat_id)).await?;
        }
        return Ok(());
    }

    let Some(text) = message.text.as_deref() else {
        return Ok(());
    };

    match parse_command(text, bot_username) {
        Some(Command::WebAuth) => {
            let Some(user) = &message.from else {
                return Ok(());
            };
            let secret = telegram_login::issue(&state.pool, &identity_of(user)).await?;
            let url = telegram_login::callback_url(&state.config.site_url, &secret);
            bot.send_message(&replies::login_link(chat_id, &url)).await?;
        }
        Some(Command::Start) => {
            bot.send_message(&replies::welcome(chat_id)).await?;
        }
        Some(Command::Summary(period)) => send_summary(state, bot, chat_id, period).await?,
        None => {}
    }
    Ok(())
}

async fn send_summary(
    state: &AppState,
    bot: &BotClient,
    chat_id: i64,
    period: SummaryPeriod,
) -> Result<(), BotError> {
    let reply = match summary::build_summary(&state.pool, period, Utc::now()).await {
        Ok(text) => replies::summary(chat_id, text),
        Err(e) => {
            tracing::error!(error = %e, chat_id, "Failed to build summary");
            replies::summary_failed(chat_id)
        }
    };
    bot.send_message(&reply).await?;
    Ok(())
}

/// With a configured username, only that account counts; otherwise any bot
/// joining is assumed to be this one.
fn is_this_bot(member: &User, bot_username: Option<&str>) -> bool {
    match bot_username {
        Some(ours) => member
            .username
            .as_deref()
            .is_some_and(|name| name.eq_ignore_ascii_case(ours)),
        None => member.is_bot,
    }
}

fn identity_of(user: &User) -> TelegramIdentity {
    TelegramIdentity {
        telegram_id: user.id,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: Option<&str>, is_bot: bool) -> User {
        User {
            id: 1,
            is_bot,
            first_name: Some("Sweep".into()),
            last_name: None,
            username: username.map(str::to_string),
        }
    }

    #[test]
    fn bot_detection_prefers_username() {
        assert!(is_this_bot(&user(Some("Sweep_Bot"), true), Some("sweep_bot")));
        assert!(!is_this_bot(&user(Some("other_bot"), true), Some("sweep_bot")));
        assert!(is_this_bot(&user(Some("other_bot"), true), None));
        assert!(!is_this_bot(&user(Some("alice"), false), None));
    }

    #[test]
    fn identity_copies_user_fields() {
        let identity = identity_of(&user(Some("sweep"), false));
        assert_eq!(identity.telegram_id, 1);
        assert_eq!(identity.username.as_deref(), Some("sweep"));
        assert_eq!(identity.first_name.as_deref(), Some("Sweep"));
        assert_eq!(identity.last_name, None);
    }
}
