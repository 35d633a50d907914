pub mod admin;
pub mod auth;
pub mod health;
pub mod public;
pub mod telegram;

use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                           password login (public)
/// /auth/telegram/callback               Telegram login (public)
/// /auth/me                              current admin
/// /auth/change-password                 change own password
/// /auth/telegram/link                   link a Telegram account
///
/// /restaurants                          public restaurant list
/// /survey/{slug}                        survey page data (public)
/// /survey/{slug}/responses              record a guest answer (POST, public)
///
/// /admin/stats                          dashboard statistics
/// /admin/restaurants                    create (POST)
/// /admin/restaurants/{id}               rename (PUT), delete (DELETE)
/// /admin/sources                        list, create
/// /admin/sources/{id}                   update (PUT)
/// /admin/settings                       get, update (PUT)
///
/// /telegram/webhook                     bot updates (public, secret header)
/// /telegram/send                        send a message as the bot
///
/// /actions                              single-endpoint action router
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .merge(public::router())
        .nest("/admin", admin::router())
        .nest("/telegram", telegram::router())
        .route("/actions", post(handlers::actions::dispatch))
}
