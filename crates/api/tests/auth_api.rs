mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;
use sqlx::PgPool;

use sweep_api::auth::bootstrap::ensure_bootstrap_admin;
use sweep_api::auth::session::SessionAuthority;
use sweep_api::auth::telegram_login;
use sweep_api::config::BootstrapAdmin;
use sweep_core::identity::TelegramIdentity;
use sweep_db::repositories::AdminUserRepo;

use common::{
    body_json, build_test_app, create_admin, get, get_auth, get_with_headers, post_json,
    post_json_auth, test_config, token_for, TEST_PASSWORD,
};

fn identity(telegram_id: i64) -> TelegramIdentity {
    TelegramIdentity {
        telegram_id,
        username: Some("manager".into()),
        first_name: Some("Anna".into()),
        last_name: None,
    }
}

// ---------------------------------------------------------------------------
// Password login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn login_returns_verifiable_session(pool: PgPool) {
    let admin = create_admin(&pool, "admin").await;
    let app = build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "username": "admin", "password": TEST_PASSWORD }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["id"], admin.id);
    assert_eq!(json["user"]["username"], "admin");
    assert!(json["user"]["telegram_id"].is_null());

    let token = json["token"].as_str().expect("token should be a string");
    let authority = SessionAuthority::new(&test_config().session);
    let subject = authority.verify(token).expect("issued token should verify");
    assert_eq!(subject, admin.id);
    assert!(json["expires_at"].as_i64().expect("expires_at is a number") > Utc::now().timestamp());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_failures_are_indistinguishable(pool: PgPool) {
    create_admin(&pool, "admin").await;
    let app = build_test_app(pool);

    let wrong_password = post_json(
        app.clone(),
        "/api/v1/auth/login",
        json!({ "username": "admin", "password": "not-the-password" }),
    )
    .await;
    let unknown_user = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "username": "ghost", "password": TEST_PASSWORD }),
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(wrong_password).await, body_json(unknown_user).await);
}

// ---------------------------------------------------------------------------
// Session verification
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn me_accepts_bearer_and_bare_x_authorization(pool: PgPool) {
    let admin = create_admin(&pool, "admin").await;
    let token = token_for(admin.id);
    let app = build_test_app(pool);

    let response = get_auth(app.clone(), "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["username"], "admin");

    let response =
        get_with_headers(app, "/api/v1/auth/me", &[("x-authorization", token.as_str())]).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn x_authorization_takes_precedence(pool: PgPool) {
    let admin = create_admin(&pool, "admin").await;
    let bearer = format!("Bearer {}", token_for(admin.id));
    let app = build_test_app(pool);

    let response = get_with_headers(
        app,
        "/api/v1/auth/me",
        &[("authorization", bearer.as_str()), ("x-authorization", "garbage")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_tampered_and_expired_tokens_get_same_401(pool: PgPool) {
    let admin = create_admin(&pool, "admin").await;
    let token = token_for(admin.id);
    let app = build_test_app(pool);

    let missing = body_json(get(app.clone(), "/api/v1/auth/me").await).await;

    // Flip the last signature character.
    let mut tampered = token.clone();
    let last = tampered.pop().expect("token is not empty");
    tampered.push(if last == '0' { '1' } else { '0' });
    let response = get_auth(app.clone(), "/api/v1/auth/me", &tampered).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let tampered_body = body_json(response).await;

    let authority = SessionAuthority::new(&test_config().session);
    let expired = authority
        .issue_at(admin.id, (Utc::now() - Duration::days(8)).timestamp())
        .encode();
    let response = get_auth(app, "/api/v1/auth/me", &expired).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let expired_body = body_json(response).await;

    assert_eq!(missing["error"], "Invalid or expired token");
    assert_eq!(missing, tampered_body);
    assert_eq!(missing, expired_body);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn token_signed_with_other_secret_is_rejected(pool: PgPool) {
    let admin = create_admin(&pool, "admin").await;
    let mut config = test_config();
    config.session.secret = "some-other-deployment-secret".into();
    let foreign = SessionAuthority::new(&config.session).issue(admin.id).encode();
    let app = build_test_app(pool);

    let response = get_auth(app, "/api/v1/auth/me", &foreign).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn token_for_missing_admin_is_rejected(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get_auth(app, "/api/v1/auth/me", &token_for(424242)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Invalid or expired token");
}

// ---------------------------------------------------------------------------
// Password change
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn change_password_requires_current_password(pool: PgPool) {
    let admin = create_admin(&pool, "admin").await;
    let token = token_for(admin.id);
    let app = build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/auth/change-password",
        json!({ "old_password": "wrong-password", "new_password": "brand-new-pass" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn change_password_rejects_short_password(pool: PgPool) {
    let admin = create_admin(&pool, "admin").await;
    let token = token_for(admin.id);
    let app = build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/auth/change-password",
        json!({ "old_password": TEST_PASSWORD, "new_password": "short" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn changed_password_replaces_old_one(pool: PgPool) {
    let admin = create_admin(&pool, "admin").await;
    let token = token_for(admin.id);
    let app = build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/auth/change-password",
        json!({ "old_password": TEST_PASSWORD, "new_password": "brand-new-pass" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["ok"], true);

    let old = post_json(
        app.clone(),
        "/api/v1/auth/login",
        json!({ "username": "admin", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(old.status(), StatusCode::UNAUTHORIZED);

    let new = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "username": "admin", "password": "brand-new-pass" }),
    )
    .await;
    assert_eq!(new.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Telegram login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn telegram_secret_logs_in_linked_admin_once(pool: PgPool) {
    let admin = create_admin(&pool, "admin").await;
    AdminUserRepo::link_telegram(&pool, admin.id, 555)
        .await
        .unwrap()
        .unwrap();
    let secret = telegram_login::issue(&pool, &identity(555)).await.unwrap();
    let app = build_test_app(pool);

    let first = post_json(
        app.clone(),
        "/api/v1/auth/telegram/callback",
        json!({ "token": secret }),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);
    let json = body_json(first).await;
    assert_eq!(json["user"]["id"], admin.id);
    assert_eq!(json["user"]["telegram_id"], 555);

    let second = post_json(
        app,
        "/api/v1/auth/telegram/callback",
        json!({ "token": secret }),
    )
    .await;
    assert_eq!(second.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn telegram_secret_for_unlinked_account_is_spent(pool: PgPool) {
    let secret = telegram_login::issue(&pool, &identity(777)).await.unwrap();
    let app = build_test_app(pool.clone());

    let response = post_json(
        app,
        "/api/v1/auth/telegram/callback",
        json!({ "token": secret }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Invalid or expired token");

    let (unconsumed,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM telegram_auth_tokens WHERE consumed_at IS NULL",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(unconsumed, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_telegram_secret_is_rejected(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/auth/telegram/callback",
        json!({ "token": "not-a-real-secret" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn concurrent_redemptions_yield_one_session(pool: PgPool) {
    let admin = create_admin(&pool, "admin").await;
    AdminUserRepo::link_telegram(&pool, admin.id, 555)
        .await
        .unwrap()
        .unwrap();
    let secret = telegram_login::issue(&pool, &identity(555)).await.unwrap();
    let app = build_test_app(pool);

    let attempts = (0..4).map(|_| {
        post_json(
            app.clone(),
            "/api/v1/auth/telegram/callback",
            json!({ "token": secret }),
        )
    });
    let responses = futures::future::join_all(attempts).await;

    let successes = responses
        .iter()
        .filter(|r| r.status() == StatusCode::OK)
        .count();
    assert_eq!(successes, 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn link_attaches_telegram_account(pool: PgPool) {
    let admin = create_admin(&pool, "admin").await;
    let token = token_for(admin.id);
    let secret = telegram_login::issue(&pool, &identity(555)).await.unwrap();
    let app = build_test_app(pool.clone());

    let response = post_json_auth(
        app.clone(),
        "/api/v1/auth/telegram/link",
        json!({ "token": secret }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["telegram_id"], 555);

    // The linked account can now log in through the bot.
    let login_secret = telegram_login::issue(&pool, &identity(555)).await.unwrap();
    let response = post_json(
        app,
        "/api/v1/auth/telegram/callback",
        json!({ "token": login_secret }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn link_conflicts_with_other_admin(pool: PgPool) {
    let first = create_admin(&pool, "first").await;
    let second = create_admin(&pool, "second").await;
    AdminUserRepo::link_telegram(&pool, second.id, 777)
        .await
        .unwrap()
        .unwrap();
    let secret = telegram_login::issue(&pool, &identity(777)).await.unwrap();
    let app = build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/auth/telegram/link",
        json!({ "token": secret }),
        &token_for(first.id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Bootstrap admin
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn bootstrap_admin_is_created_only_once(pool: PgPool) {
    let seed = BootstrapAdmin {
        username: "owner".into(),
        password: "owner-password".into(),
    };

    assert!(ensure_bootstrap_admin(&pool, &seed).await.unwrap());
    assert!(!ensure_bootstrap_admin(&pool, &seed).await.unwrap());
    assert_eq!(AdminUserRepo::count(&pool).await.unwrap(), 1);

    let app = build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "username": "owner", "password": "owner-password" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn bootstrap_is_skipped_when_admins_exist(pool: PgPool) {
    create_admin(&pool, "admin").await;
    let seed = BootstrapAdmin {
        username: "owner".into(),
        password: "owner-password".into(),
    };

    assert!(!ensure_bootstrap_admin(&pool, &seed).await.unwrap());
    assert!(AdminUserRepo::find_by_username(&pool, "owner")
        .await
        .unwrap()
        .is_none());
}
