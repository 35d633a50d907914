//! Session-token authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use sweep_core::error::CoreError;
use sweep_db::models::admin_user::AdminUser;
use sweep_db::repositories::AdminUserRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Header checked before `Authorization`. The `Bearer ` prefix is optional
/// here.
pub const X_AUTHORIZATION: &str = "x-authorization";

/// The one message every credential failure is reported with.
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired token";

/// Authenticated admin, resolved from a session token.
///
/// ```ignore
/// async fn my_handler(admin: AuthAdmin) -> AppResult<Json<()>> {
///     tracing::info!(admin_id = admin.admin.id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthAdmin {
    pub admin: AdminUser,
}

impl FromRequestParts<AppState> for AuthAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(&parts.headers, state).await
    }
}

/// Resolve the admin behind the request's session token.
///
/// Missing, malformed, forged and expired tokens, and tokens whose admin no
/// longer exists, all produce the same 401.
pub async fn authenticate(headers: &HeaderMap, state: &AppState) -> AppResult<AuthAdmin> {
    let token = bearer_token(headers).ok_or_else(invalid_token)?;

    let admin_id = state.sessions.verify(token).map_err(|reason| {
        tracing::debug!(%reason, "Session token rejected");
        invalid_token()
    })?;

    let admin = AdminUserRepo::find_by_id(&state.pool, admin_id)
        .await?
        .ok_or_else(|| {
            tracing::debug!(admin_id, "Session token for unknown admin");
            invalid_token()
        })?;

    Ok(AuthAdmin { admin })
}

/// Extract the raw token. `X-Authorization` wins when both headers are
/// present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    if let Some(value) = headers.get(X_AUTHORIZATION) {
        let raw = value.to_str().ok()?.trim();
        return Some(raw.strip_prefix("Bearer ").unwrap_or(raw));
    }
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .trim()
        .strip_prefix("Bearer ")
}

pub fn invalid_token() -> AppError {
    AppError::Core(CoreError::Unauthorized(INVALID_TOKEN_MESSAGE.into()))
}
