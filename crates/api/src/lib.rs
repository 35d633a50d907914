//! Sweep API server library.
//!
//! Exposes the building blocks (config, state, auth, error handling, routes,
//! the bot webhook logic and background tasks) so integration tests and the
//! binary entrypoint can both access them.

pub mod auth;
pub mod background;
pub mod bot;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
