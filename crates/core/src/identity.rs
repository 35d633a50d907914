//! Telegram identity snapshot captured from an inbound chat event.

use serde::{Deserialize, Serialize};

/// Who started a Telegram login, as reported by Telegram at that moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelegramIdentity {
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl TelegramIdentity {
    /// Human-readable name: "First Last", falling back to `@username`,
    /// then to the numeric id.
    pub fn display_name(&self) -> String {
        let full: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect();
        if !full.is_empty() {
            return full.join(" ");
        }
        match &self.username {
            Some(u) if !u.is_empty() => format!("@{u}"),
            _ => self.telegram_id.to_string(),
        }
    }
}
