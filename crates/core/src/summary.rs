//! Text rendering for Telegram summaries and live notifications.
//!
//! Output uses Telegram's HTML parse mode: `<b>` for bold and literal
//! newlines. Every user-controlled value goes through [`escape_html`].

use crate::msk::format_msk;
use crate::types::Timestamp;

/// Time window a summary covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryPeriod {
    /// The current MSK calendar day.
    Today,
    /// Every response ever recorded.
    All,
}

impl SummaryPeriod {
    pub fn title(self) -> &'static str {
        match self {
            SummaryPeriod::Today => "📊 Summary for today",
            SummaryPeriod::All => "📊 Summary for all time",
        }
    }
}

/// Per-restaurant breakdown, sources sorted by count descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantSummary {
    pub name: String,
    pub sources: Vec<SourceCount>,
}

impl RestaurantSummary {
    pub fn total(&self) -> i64 {
        self.sources.iter().map(|s| s.count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCount {
    pub label: String,
    pub count: i64,
}

/// Escape the characters Telegram's HTML mode treats specially.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a summary message. Restaurants without responses are skipped.
pub fn render_summary(
    period: SummaryPeriod,
    restaurants: &[RestaurantSummary],
    generated_at: Timestamp,
) -> String {
    let active: Vec<&RestaurantSummary> =
        restaurants.iter().filter(|r| r.total() > 0).collect();
    let total: i64 = active.iter().map(|r| r.total()).sum();

    let mut text = format!(
        "<b>{}</b>\n🕐 {} MSK\n📋 Total responses: {total}",
        period.title(),
        format_msk(generated_at),
    );

    if active.is_empty() {
        text.push_str("\n\nNo data");
        return text;
    }

    for restaurant in active {
        text.push_str(&format!(
            "\n\n🏪 <b>{}</b>: {}",
            escape_html(&restaurant.name),
            restaurant.total()
        ));
        for source in &restaurant.sources {
            text.push_str(&format!(
                "\n   • {}: {}",
                escape_html(&source.label),
                source.count
            ));
        }
    }
    text
}

/// Render the live notification sent after a guest answers the survey.
pub fn render_new_response(
    restaurant_name: &str,
    source_label: &str,
    today_count: i64,
    at: Timestamp,
) -> String {
    format!(
        "<b>New guest</b>\nRestaurant: <b>{}</b>\nSource: {}\nToday at this restaurant: {today_count}\n{} MSK",
        escape_html(restaurant_name),
        escape_html(source_label),
        format_msk(at),
    )
}
