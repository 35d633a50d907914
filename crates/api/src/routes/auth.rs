//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /login               -> login
/// POST /telegram/callback   -> telegram_callback
/// GET  /me                  -> me (requires auth)
/// POST /change-password     -> change_password (requires auth)
/// POST /telegram/link       -> telegram_link (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/telegram/callback", post(auth::telegram_callback))
        .route("/me", get(auth::me))
        .route("/change-password", post(auth::change_password))
        .route("/telegram/link", post(auth::telegram_link))
}
