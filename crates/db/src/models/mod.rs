//! Row models and DTOs, one module per table.

pub mod admin_user;
pub mod app_setting;
pub mod response;
pub mod restaurant;
pub mod source_option;
pub mod telegram_auth_token;
