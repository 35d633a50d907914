//! Admin dashboard statistics.

use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;
use sweep_db::models::response::{DateCountRow, ResponseFilter, SurveyResponse};
use sweep_db::models::restaurant::Restaurant;
use sweep_db::repositories::{ResponseRepo, RestaurantRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthAdmin;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub restaurants: Vec<Restaurant>,
    pub responses: Vec<SurveyResponse>,
    pub total: i64,
    /// Source key -> count.
    pub by_source: BTreeMap<String, i64>,
    /// MSK calendar day -> count, ascending.
    pub by_date: Vec<DateCountRow>,
}

/// Load every restaurant plus the responses and aggregates matching `filter`.
pub async fn load_stats(state: &AppState, filter: &ResponseFilter) -> AppResult<StatsResponse> {
    let restaurants = RestaurantRepo::list(&state.pool).await?;
    let responses = ResponseRepo::list(&state.pool, filter).await?;
    let by_source: BTreeMap<String, i64> = ResponseRepo::count_by_source(&state.pool, filter)
        .await?
        .into_iter()
        .map(|row| (row.source, row.count))
        .collect();
    let by_date = ResponseRepo::count_by_msk_date(&state.pool, filter).await?;
    let total = by_source.values().sum();

    Ok(StatsResponse {
        restaurants,
        responses,
        total,
        by_source,
        by_date,
    })
}

/// GET /api/v1/admin/stats?restaurant_id=&from=&to=
///
/// `from` is inclusive, `to` exclusive; both are RFC 3339 timestamps.
pub async fn get_stats(
    State(state): State<AppState>,
    _auth: AuthAdmin,
    Query(filter): Query<ResponseFilter>,
) -> AppResult<Json<StatsResponse>> {
    Ok(Json(load_stats(&state, &filter).await?))
}
