pub mod actions;
pub mod auth;
pub mod restaurants;
pub mod settings;
pub mod sources;
pub mod stats;
pub mod survey;
pub mod telegram;
