//! First-run admin account.

use sqlx::PgPool;
use sweep_db::models::admin_user::CreateAdminUser;
use sweep_db::repositories::AdminUserRepo;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};

/// Create the configured admin if the `admin_users` table is empty.
///
/// Returns `true` if an account was created. An existing admin of any name
/// leaves the table untouched.
pub async fn ensure_bootstrap_admin(pool: &PgPool, admin: &BootstrapAdmin) -> AppResult<bool> {
    if AdminUserRepo::count(pool).await? > 0 {
        tracing::debug!("Admin accounts exist, bootstrap skipped");
        return Ok(false);
    }

    validate_password_strength(&admin.password)?;
    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let created = AdminUserRepo::create(
        pool,
        &CreateAdminUser {
            username: admin.username.clone(),
            password_hash,
        },
    )
    .await?;

    tracing::info!(admin_id = created.id, username = %created.username, "Bootstrap admin created");
    Ok(true)
}
