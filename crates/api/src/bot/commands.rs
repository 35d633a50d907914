//! Recognizing what a chat message or button press asks the bot to do.

use sweep_core::summary::SummaryPeriod;

/// Reply keyboard button texts. Pressing one sends the text as a message.
pub const BUTTON_SUMMARY_TODAY: &str = "📊 Today's summary";
pub const BUTTON_SUMMARY_ALL: &str = "📈 All-time summary";

/// Inline button callback payloads.
pub const CALLBACK_SUMMARY_TODAY: &str = "summary_today";
pub const CALLBACK_SUMMARY_ALL: &str = "summary_all";

/// Deep-link payload that starts the Telegram login handshake.
const WEB_AUTH_PAYLOAD: &str = "web_auth";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `/start web_auth`
    WebAuth,
    /// `/start` with any other (or no) payload.
    Start,
    Summary(SummaryPeriod),
}

/// Parse a message text.
///
/// Commands may carry an `@botname` suffix, as Telegram adds in groups.
/// When `bot_username` is known, commands addressed to other bots are
/// ignored.
pub fn parse_command(text: &str, bot_username: Option<&str>) -> Option<Command> {
    let text = text.trim();
    match text {
        BUTTON_SUMMARY_TODAY => return Some(Command::Summary(SummaryPeriod::Today)),
        BUTTON_SUMMARY_ALL => return Some(Command::Summary(SummaryPeriod::All)),
        _ => {}
    }

    let (head, payload) = match text.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (text, ""),
    };
    let head = head.strip_prefix('/')?;
    let name = match head.split_once('@') {
        Some((name, target)) => {
            if let Some(ours) = bot_username {
                if !target.eq_ignore_ascii_case(ours) {
                    return None;
                }
            }
            name
        }
        None => head,
    };

    match name {
        "start" if payload == WEB_AUTH_PAYLOAD => Some(Command::WebAuth),
        "start" => Some(Command::Start),
        "summary_today" => Some(Command::Summary(SummaryPeriod::Today)),
        "summary_all" => Some(Command::Summary(SummaryPeriod::All)),
        _ => None,
    }
}

/// Parse an inline button's callback data.
pub fn parse_callback(data: &str) -> Option<SummaryPeriod> {
    match data {
        CALLBACK_SUMMARY_TODAY => Some(SummaryPeriod::Today),
        CALLBACK_SUMMARY_ALL => Some(SummaryPeriod::All),
        _ => None,
    }
}
