//! Telegram Bot API transport.
//!
//! - [`types`] -- webhook update payloads and reply markup.
//! - [`client`] -- [`BotClient`], a thin HTTPS client for the Bot API methods
//!   the bot uses.
//! - [`notifier`] -- the best-effort [`Notifier`] seam used for live
//!   notifications, plus [`dispatch`](notifier::dispatch).

pub mod client;
pub mod notifier;
pub mod types;

pub use client::{BotClient, BotConfig, TelegramError};
pub use notifier::{dispatch, DisabledNotifier, NotifyError, Notifier};
