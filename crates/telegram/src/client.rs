//! HTTPS client for the Telegram Bot API.
//!
//! Every call is a JSON POST to `{api_url}/bot{token}/{method}`. The token
//! is part of the URL, so request errors are stripped of their URL before
//! they can reach a log line.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::types::ReplyMarkup;

/// Default Bot API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Default timeout for a single Bot API call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    /// Network, DNS, timeout or body decoding failure.
    #[error("Telegram request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Telegram answered with `ok: false`.
    #[error("Telegram API error {code}: {description}")]
    Api { code: i64, description: String },
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Connection settings for [`BotClient`].
#[derive(Clone)]
pub struct BotConfig {
    pub token: String,
    pub api_url: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Requests / responses
// ---------------------------------------------------------------------------

/// Parameters for `sendMessage`.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessage {
    /// Numeric id or `@channel` name, as a string.
    pub chat_id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'static str>,
    pub disable_notification: bool,
    pub link_preview_options: LinkPreviewOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<ReplyMarkup>,
}

impl SendMessage {
    /// An HTML-formatted message without link previews.
    pub fn html(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            text: text.into(),
            parse_mode: Some("HTML"),
            disable_notification: false,
            link_preview_options: LinkPreviewOptions { is_disabled: true },
            reply_markup: None,
        }
    }

    pub fn with_markup(mut self, markup: ReplyMarkup) -> Self {
        self.reply_markup = Some(markup);
        self
    }

    pub fn silent(mut self, silent: bool) -> Self {
        self.disable_notification = silent;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkPreviewOptions {
    pub is_disabled: bool,
}

#[derive(Debug, Serialize)]
struct AnswerCallbackQuery<'a> {
    callback_query_id: &'a str,
}

/// Envelope of every Bot API response.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    message_id: i64,
}

// ---------------------------------------------------------------------------
// BotClient
// ---------------------------------------------------------------------------

/// Sends messages on behalf of the bot.
#[derive(Clone)]
pub struct BotClient {
    client: reqwest::Client,
    base_url: String,
}

impl BotClient {
    /// Build a client with the configured timeout.
    pub fn new(config: &BotConfig) -> Result<Self, TelegramError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        let base_url = format!(
            "{}/bot{}",
            config.api_url.trim_end_matches('/'),
            config.token
        );
        Ok(Self { client, base_url })
    }

    /// `sendMessage`; returns the id of the sent message.
    pub async fn send_message(&self, request: &SendMessage) -> Result<i64, TelegramError> {
        let sent: SentMessage = self.call("sendMessage", request).await?;
        Ok(sent.message_id)
    }

    /// `answerCallbackQuery` with no notification text.
    pub async fn answer_callback_query(&self, callback_query_id: &str) -> Result<(), TelegramError> {
        let _: bool = self
            .call("answerCallbackQuery", &AnswerCallbackQuery { callback_query_id })
            .await?;
        Ok(())
    }

    async fn call<P, R>(&self, method: &str, params: &P) -> Result<R, TelegramError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/{method}", self.base_url);
        let response = self
            .client
            .post(url)
            .json(params)
            .send()
            .await
            .map_err(|e| TelegramError::Request(e.without_url()))?;

        // Telegram reports failures in the JSON body, with a matching non-2xx
        // status; decode the body either way.
        let body: ApiResponse<R> = response
            .json()
            .await
            .map_err(|e| TelegramError::Request(e.without_url()))?;

        match (body.ok, body.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(TelegramError::Api {
                code: body.error_code.unwrap_or_default(),
                description: body
                    .description
                    .unwrap_or_else(|| format!("{method} returned no result")),
            }),
        }
    }
}
