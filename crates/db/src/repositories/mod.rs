//! Repositories, one per table. Each is a zero-sized struct whose associated
//! functions run parameterized SQL and return `sqlx::Error` unchanged.

pub mod admin_user_repo;
pub mod app_setting_repo;
pub mod response_repo;
pub mod restaurant_repo;
pub mod source_option_repo;
pub mod telegram_auth_token_repo;

pub use admin_user_repo::AdminUserRepo;
pub use app_setting_repo::AppSettingRepo;
pub use response_repo::ResponseRepo;
pub use restaurant_repo::RestaurantRepo;
pub use source_option_repo::SourceOptionRepo;
pub use telegram_auth_token_repo::TelegramAuthTokenRepo;

/// True if `err` is a PostgreSQL unique violation (23505) on `constraint`.
pub(crate) fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505") && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}
