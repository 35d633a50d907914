use axum::routing::post;
use axum::Router;

use crate::handlers::telegram;
use crate::state::AppState;

/// Routes mounted at `/telegram`.
///
/// ```text
/// POST /webhook   -> webhook (secret header when configured)
/// POST /send      -> send (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/webhook", post(telegram::webhook))
        .route("/send", post(telegram::send))
}
