//! Key/value application settings.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sweep_core::types::Timestamp;

/// Chat that receives live notifications and that the summaries describe.
pub const KEY_TELEGRAM_CHAT_ID: &str = "telegram_chat_id";
/// `"true"` / `"false"`.
pub const KEY_TELEGRAM_NOTIFICATIONS_ENABLED: &str = "telegram_notifications_enabled";

/// A raw row from the `app_settings` table.
#[derive(Debug, Clone, FromRow)]
pub struct AppSetting {
    pub key: String,
    pub value: String,
    pub updated_at: Timestamp,
}

/// Typed view over the known keys. Missing rows yield the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppSettings {
    pub telegram_chat_id: Option<String>,
    pub telegram_notifications_enabled: bool,
}

impl AppSettings {
    /// Build from raw rows; unknown keys are ignored.
    pub fn from_rows(rows: &[AppSetting]) -> Self {
        let mut settings = Self::default();
        for row in rows {
            match row.key.as_str() {
                KEY_TELEGRAM_CHAT_ID => {
                    let value = row.value.trim();
                    settings.telegram_chat_id = (!value.is_empty()).then(|| value.to_string());
                }
                KEY_TELEGRAM_NOTIFICATIONS_ENABLED => {
                    settings.telegram_notifications_enabled = row.value.trim() == "true";
                }
                _ => {}
            }
        }
        settings
    }

    /// Chat id to notify, if notifications are switched on and configured.
    pub fn notification_target(&self) -> Option<&str> {
        if self.telegram_notifications_enabled {
            self.telegram_chat_id.as_deref()
        } else {
            None
        }
    }
}

/// DTO for updating settings. Absent fields are left untouched; an empty
/// `telegram_chat_id` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAppSettings {
    pub telegram_chat_id: Option<String>,
    pub telegram_notifications_enabled: Option<bool>,
}
