//! Outgoing bot messages.

use sweep_telegram::client::SendMessage;
use sweep_telegram::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, ReplyKeyboardMarkup, ReplyMarkup,
};

use super::commands::{
    BUTTON_SUMMARY_ALL, BUTTON_SUMMARY_TODAY, CALLBACK_SUMMARY_ALL, CALLBACK_SUMMARY_TODAY,
};

const COMMAND_HELP: &str = "Commands:\n\
    /summary_today - summary for today\n\
    /summary_all - summary for all time";

/// Reply to `/start web_auth`: a button opening the redemption URL.
pub fn login_link(chat_id: i64, url: &str) -> SendMessage {
    SendMessage::html(
        chat_id.to_string(),
        "Login is ready!\n\nTap the button below to sign in to the website 👇\n\n\
         The link is valid for 5 minutes.",
    )
    .with_markup(ReplyMarkup::Inline(InlineKeyboardMarkup {
        inline_keyboard: vec![vec![InlineKeyboardButton::url("Sign in", url)]],
    }))
}

/// Reply to a plain `/start`: introduction plus the summary keyboard.
pub fn welcome(chat_id: i64) -> SendMessage {
    let text = format!(
        "👋 Hi! I'm the <b>Sweep REF</b> bot.\n\n\
         I track where guests of your restaurants come from.\n\n\
         📊 <b>What I can do:</b>\n\
         • Notify you about every new guest response\n\
         • Build summaries for today and for all time\n\n\
         Use the buttons below or the commands.\n{COMMAND_HELP}"
    );
    SendMessage::html(chat_id.to_string(), text).with_markup(ReplyMarkup::Keyboard(
        ReplyKeyboardMarkup {
            keyboard: vec![vec![
                KeyboardButton {
                    text: BUTTON_SUMMARY_TODAY.to_string(),
                },
                KeyboardButton {
                    text: BUTTON_SUMMARY_ALL.to_string(),
                },
            ]],
            resize_keyboard: true,
        },
    ))
}

/// Sent when the bot is added to a group: how to connect the group for
/// notifications, plus inline summary buttons.
pub fn group_greeting(chat_id: i64) -> SendMessage {
    let text = format!(
        "👋 Hi! I'm the <b>Sweep REF</b> bot.\n\n\
         I will post new guest responses here.\n\n\
         📌 <b>To connect this chat:</b>\n\
         1. Copy this chat's ID: <code>{chat_id}</code>\n\
         2. Paste it in the admin panel under Settings → Telegram\n\
         3. Turn notifications on\n\n{COMMAND_HELP}"
    );
    SendMessage::html(chat_id.to_string(), text).with_markup(ReplyMarkup::Inline(
        InlineKeyboardMarkup {
            inline_keyboard: vec![vec![
                InlineKeyboardButton::callback(BUTTON_SUMMARY_TODAY, CALLBACK_SUMMARY_TODAY),
                InlineKeyboardButton::callback(BUTTON_SUMMARY_ALL, CALLBACK_SUMMARY_ALL),
            ]],
        },
    ))
}

pub fn summary(chat_id: i64, text: String) -> SendMessage {
    SendMessage::html(chat_id.to_string(), text)
}

pub fn summary_failed(chat_id: i64) -> SendMessage {
    SendMessage::html(chat_id.to_string(), "❌ Could not build the summary")
}
