//! Handlers for the `/auth` resource: password login, Telegram login,
//! account linking and password change.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use sweep_core::error::CoreError;
use sweep_core::types::DbId;
use sweep_db::models::admin_user::AdminUser;
use sweep_db::repositories::AdminUserRepo;

use crate::auth::password::{
    hash_password, validate_password_strength, verify_against_dummy, verify_password,
};
use crate::auth::telegram_login;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{invalid_token, AuthAdmin};
use crate::response::OkResponse;
use crate::state::AppState;

const INVALID_LOGIN_MESSAGE: &str = "Invalid username or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for `POST /auth/change-password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Request body carrying a Telegram one-time login secret.
#[derive(Debug, Deserialize)]
pub struct TelegramTokenRequest {
    pub token: String,
}

/// Successful authentication response (password or Telegram login).
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    /// Unix timestamp (seconds) after which the token stops working.
    pub expires_at: i64,
    pub user: AdminInfo,
}

/// Public admin info. Never includes the password hash.
#[derive(Debug, Serialize)]
pub struct AdminInfo {
    pub id: DbId,
    pub username: String,
    pub telegram_id: Option<i64>,
}

impl From<&AdminUser> for AdminInfo {
    fn from(admin: &AdminUser) -> Self {
        Self {
            id: admin.id,
            username: admin.username.clone(),
            telegram_id: admin.telegram_id,
        }
    }
}

// ---------------------------------------------------------------------------
// Shared logic (also used by the action router)
// ---------------------------------------------------------------------------

/// Check a username/password pair and issue a session.
///
/// Unknown user and wrong password fail with the same message.
pub async fn password_login(
    state: &AppState,
    username: &str,
    password: &str,
) -> AppResult<AuthResponse> {
    let Some(admin) = AdminUserRepo::find_by_username(&state.pool, username).await? else {
        verify_against_dummy(password);
        tracing::info!("Login failed: unknown username");
        return Err(AppError::Core(CoreError::Unauthorized(
            INVALID_LOGIN_MESSAGE.into(),
        )));
    };

    let password_valid = verify_password(password, &admin.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(admin_id = admin.id, "Login failed: wrong password");
        return Err(AppError::Core(CoreError::Unauthorized(
            INVALID_LOGIN_MESSAGE.into(),
        )));
    }

    tracing::info!(admin_id = admin.id, "Admin logged in with password");
    Ok(session_response(state, &admin))
}

/// Verify the current password, then store the new one.
pub async fn change_admin_password(
    state: &AppState,
    admin: &AdminUser,
    old_password: &str,
    new_password: &str,
) -> AppResult<()> {
    let old_valid = verify_password(old_password, &admin.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !old_valid {
        return Err(AppError::Core(CoreError::Validation(
            "Current password is incorrect".into(),
        )));
    }

    validate_password_strength(new_password)?;

    let new_hash = hash_password(new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    let updated = AdminUserRepo::update_password(&state.pool, admin.id, &new_hash).await?;
    if !updated {
        return Err(AppError::Core(CoreError::not_found("Admin", admin.id)));
    }

    tracing::info!(admin_id = admin.id, "Admin password changed");
    Ok(())
}

fn session_response(state: &AppState, admin: &AdminUser) -> AuthResponse {
    let token = state.sessions.issue(admin.id);
    AuthResponse {
        token: token.encode(),
        expires_at: token.expires_at,
        user: AdminInfo::from(admin),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let response = password_login(&state, &input.username, &input.password).await?;
    Ok(Json(response))
}

/// GET /api/v1/auth/me
pub async fn me(auth: AuthAdmin) -> Json<AdminInfo> {
    Json(AdminInfo::from(&auth.admin))
}

/// POST /api/v1/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<Json<OkResponse>> {
    change_admin_password(&state, &auth.admin, &input.old_password, &input.new_password).await?;
    Ok(Json(OkResponse::new()))
}

/// POST /api/v1/auth/telegram/callback
///
/// Redeem a one-time secret from the bot and log in as the admin linked to
/// that Telegram account. A secret for an unlinked account is still spent.
pub async fn telegram_callback(
    State(state): State<AppState>,
    Json(input): Json<TelegramTokenRequest>,
) -> AppResult<Json<AuthResponse>> {
    let identity = telegram_login::redeem(&state.pool, &input.token)
        .await?
        .ok_or_else(invalid_token)?;

    let admin = AdminUserRepo::find_by_telegram_id(&state.pool, identity.telegram_id)
        .await?
        .ok_or_else(|| {
            tracing::info!(
                telegram_id = identity.telegram_id,
                "Telegram login for an account not linked to any admin"
            );
            invalid_token()
        })?;

    tracing::info!(
        admin_id = admin.id,
        telegram_id = identity.telegram_id,
        "Admin logged in via Telegram"
    );
    Ok(Json(session_response(&state, &admin)))
}

/// POST /api/v1/auth/telegram/link
///
/// Redeem a one-time secret and attach its Telegram account to the calling
/// admin.
pub async fn telegram_link(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Json(input): Json<TelegramTokenRequest>,
) -> AppResult<Json<AdminInfo>> {
    let identity = telegram_login::redeem(&state.pool, &input.token)
        .await?
        .ok_or_else(invalid_token)?;

    if let Some(owner) = AdminUserRepo::find_by_telegram_id(&state.pool, identity.telegram_id).await? {
        if owner.id != auth.admin.id {
            return Err(AppError::Core(CoreError::Conflict(
                "This Telegram account is linked to another admin".into(),
            )));
        }
    }

    let admin = AdminUserRepo::link_telegram(&state.pool, auth.admin.id, identity.telegram_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Admin", auth.admin.id)))?;

    tracing::info!(
        admin_id = admin.id,
        telegram_id = identity.telegram_id,
        telegram_name = %identity.display_name(),
        "Telegram account linked"
    );
    Ok(Json(AdminInfo::from(&admin)))
}
