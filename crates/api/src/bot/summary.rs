//! Summary messages built from the store.

use std::collections::HashMap;

use sqlx::PgPool;
use sweep_core::msk::msk_day_start;
use sweep_core::summary::{render_summary, RestaurantSummary, SourceCount, SummaryPeriod};
use sweep_core::types::{DbId, Timestamp};
use sweep_db::models::response::RestaurantSourceCountRow;
use sweep_db::models::restaurant::Restaurant;
use sweep_db::repositories::{ResponseRepo, RestaurantRepo, SourceOptionRepo};

/// Render the summary for `period` as of `now`.
pub async fn build_summary(
    pool: &PgPool,
    period: SummaryPeriod,
    now: Timestamp,
) -> Result<String, sqlx::Error> {
    let since = match period {
        SummaryPeriod::Today => Some(msk_day_start(now)),
        SummaryPeriod::All => None,
    };

    let restaurants = RestaurantRepo::list(pool).await?;
    let labels: HashMap<String, String> = SourceOptionRepo::list_all(pool)
        .await?
        .into_iter()
        .map(|option| (option.key, option.label))
        .collect();
    let counts = ResponseRepo::count_by_restaurant_and_source(pool, since).await?;

    Ok(render_summary(
        period,
        &assemble(&restaurants, &labels, &counts),
        now,
    ))
}

/// Group count rows under their restaurants, in restaurant order.
/// Source keys without an option fall back to the raw key.
fn assemble(
    restaurants: &[Restaurant],
    labels: &HashMap<String, String>,
    counts: &[RestaurantSourceCountRow],
) -> Vec<RestaurantSummary> {
    let mut by_restaurant: HashMap<DbId, Vec<SourceCount>> = HashMap::new();
    for row in counts {
        by_restaurant
            .entry(row.restaurant_id)
            .or_default()
            .push(SourceCount {
                label: labels
                    .get(&row.source)
                    .cloned()
                    .unwrap_or_else(|| row.source.clone()),
                count: row.count,
            });
    }

    restaurants
        .iter()
        .map(|r| RestaurantSummary {
            name: r.name.clone(),
            sources: by_restaurant.remove(&r.id).unwrap_or_default(),
        })
        .collect()
}
