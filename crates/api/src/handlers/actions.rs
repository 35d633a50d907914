//! Single-endpoint action router.
//!
//! `POST /api/v1/actions` takes `{"action": "...", ...}` and runs the same
//! logic as the matching REST route. Actions that need an admin check the
//! session token exactly as the REST extractor does.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use sweep_core::error::CoreError;
use sweep_core::types::{DbId, Timestamp};
use sweep_db::models::response::ResponseFilter;
use sweep_db::repositories::RestaurantRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::auth::{change_admin_password, password_login};
use crate::handlers::restaurants::{
    create_restaurant, list_restaurants, rename_restaurant, PublicRestaurant,
};
use crate::handlers::stats::load_stats;
use crate::handlers::survey::record_response;
use crate::middleware::auth::authenticate;
use crate::response::OkResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    GetRestaurants,
    AddResponse {
        restaurant_id: DbId,
        source: String,
    },
    Login {
        username: String,
        password: String,
    },
    GetStats {
        restaurant_id: Option<DbId>,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
    },
    CreateRestaurant {
        name: String,
    },
    RenameRestaurant {
        restaurant_id: DbId,
        name: String,
    },
    ChangePassword {
        old_password: String,
        new_password: String,
    },
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Action::GetRestaurants => "get_restaurants",
            Action::AddResponse { .. } => "add_response",
            Action::Login { .. } => "login",
            Action::GetStats { .. } => "get_stats",
            Action::CreateRestaurant { .. } => "create_restaurant",
            Action::RenameRestaurant { .. } => "rename_restaurant",
            Action::ChangePassword { .. } => "change_password",
        }
    }
}

#[derive(Debug, Serialize)]
struct RestaurantsBody {
    restaurants: Vec<PublicRestaurant>,
}

/// POST /api/v1/actions
pub async fn dispatch(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Response> {
    let action: Action = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(error = %e, "Unrecognized action body");
        AppError::BadRequest("Unknown action".into())
    })?;
    tracing::debug!(action = action.name(), "Dispatching action");

    let response = match action {
        Action::GetRestaurants => Json(RestaurantsBody {
            restaurants: list_restaurants(&state).await?,
        })
        .into_response(),

        Action::AddResponse {
            restaurant_id,
            source,
        } => {
            let restaurant = RestaurantRepo::find_by_id(&state.pool, restaurant_id)
                .await?
                .ok_or_else(|| AppError::Core(CoreError::not_found("Restaurant", restaurant_id)))?;
            let response = record_response(&state, &restaurant, source.trim()).await?;
            Json(OkResponse::created(response.id)).into_response()
        }

        Action::Login { username, password } => {
            Json(password_login(&state, &username, &password).await?).into_response()
        }

        Action::GetStats {
            restaurant_id,
            from,
            to,
        } => {
            authenticate(&headers, &state).await?;
            let filter = ResponseFilter {
                restaurant_id,
                from,
                to,
            };
            Json(load_stats(&state, &filter).await?).into_response()
        }

        Action::CreateRestaurant { name } => {
            authenticate(&headers, &state).await?;
            let restaurant = create_restaurant(&state, &name).await?;
            Json(OkResponse::created(restaurant.id)).into_response()
        }

        Action::RenameRestaurant {
            restaurant_id,
            name,
        } => {
            authenticate(&headers, &state).await?;
            rename_restaurant(&state, restaurant_id, &name).await?;
            Json(OkResponse::new()).into_response()
        }

        Action::ChangePassword {
            old_password,
            new_password,
        } => {
            let auth = authenticate(&headers, &state).await?;
            change_admin_password(&state, &auth.admin, &old_password, &new_password).await?;
            Json(OkResponse::new()).into_response()
        }
    };

    Ok(response)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn parse(raw: &str) -> Result<Action, serde_json::Error> {
        serde_json::from_str(raw)
    }

    #[test]
    fn parses_known_actions() {
        assert_matches!(parse(r#"{"action":"get_restaurants"}"#), Ok(Action::GetRestaurants));
        assert_matches!(
            parse(r#"{"action":"add_response","restaurant_id":3,"source":"instagram"}"#),
            Ok(Action::AddResponse { restaurant_id: 3, ref source }) if source == "instagram"
        );
        assert_matches!(
            parse(r#"{"action":"get_stats"}"#),
            Ok(Action::GetStats { restaurant_id: None, from: None, to: None })
        );
        assert_matches!(
            parse(r#"{"action":"get_stats","restaurant_id":2,"from":"2024-06-01T00:00:00Z"}"#),
            Ok(Action::GetStats { restaurant_id: Some(2), from: Some(_), to: None })
        );
        assert_matches!(
            parse(r#"{"action":"rename_restaurant","restaurant_id":1,"name":"New"}"#),
            Ok(Action::RenameRestaurant { restaurant_id: 1, .. })
        );
    }

    #[test]
    fn rejects_unknown_and_incomplete_actions() {
        assert!(parse(r#"{"action":"drop_tables"}"#).is_err());
        assert!(parse(r#"{"action":"add_response","source":"instagram"}"#).is_err());
        assert!(parse(r#"{"name":"no action"}"#).is_err());
        assert!(parse("not json").is_err());
    }

    #[test]
    fn names_match_wire_tags() {
        let action = parse(r#"{"action":"change_password","old_password":"a","new_password":"b"}"#)
            .expect("should parse");
        assert_eq!(action.name(), "change_password");
    }
}
