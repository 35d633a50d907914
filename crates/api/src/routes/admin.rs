//! Route definitions for the `/admin` resource. Every handler requires an
//! admin session.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{restaurants, settings, sources, stats};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /stats               -> get_stats
/// POST   /restaurants         -> create
/// PUT    /restaurants/{id}    -> rename
/// DELETE /restaurants/{id}    -> delete
/// GET    /sources             -> list
/// POST   /sources             -> create
/// PUT    /sources/{id}        -> update
/// GET    /settings            -> get_settings
/// PUT    /settings            -> update_settings
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats::get_stats))
        .route("/restaurants", post(restaurants::create))
        .route(
            "/restaurants/{id}",
            put(restaurants::rename).delete(restaurants::delete),
        )
        .route("/sources", get(sources::list).post(sources::create))
        .route("/sources/{id}", put(sources::update))
        .route(
            "/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
}
