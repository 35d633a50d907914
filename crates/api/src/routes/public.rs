//! Guest-facing routes. No authentication.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{restaurants, survey};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/restaurants", get(restaurants::list_public))
        .route("/survey/{slug}", get(survey::get_survey))
        .route("/survey/{slug}/responses", post(survey::submit_response))
}
