mod common;

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use sweep_db::models::source_option::UpdateSourceOption;
use sweep_db::repositories::SourceOptionRepo;

use common::{
    body_json, build_app, build_test_app, create_restaurant, enable_notifications, get,
    next_within, post_json, test_config, test_state, unreachable_bot, FailingNotifier,
    RecordingNotifier,
};

async fn response_count(pool: &PgPool) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM responses")
        .fetch_one(pool)
        .await
        .unwrap();
    count
}

// ---------------------------------------------------------------------------
// Survey page
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn public_restaurant_list_is_in_creation_order(pool: PgPool) {
    create_restaurant(&pool, "Zebra Bar").await;
    create_restaurant(&pool, "Amber Cafe").await;
    let app = build_test_app(pool);

    let response = get(app, "/api/v1/restaurants").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let names: Vec<&str> = json
        .as_array()
        .expect("list is an array")
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Zebra Bar", "Amber Cafe"]);
    assert_eq!(json[1]["slug"], "amber-cafe");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn survey_page_lists_active_sources_in_order(pool: PgPool) {
    create_restaurant(&pool, "Amber Cafe").await;
    let app = build_test_app(pool);

    let response = get(app, "/api/v1/survey/amber-cafe").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["restaurant"]["name"], "Amber Cafe");

    let keys: Vec<&str> = json["sources"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["key"].as_str().unwrap())
        .collect();
    assert_eq!(
        keys,
        ["instagram", "friends", "internet_ads", "banner", "passerby", "other"]
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn survey_page_for_unknown_slug_is_404(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app, "/api/v1/survey/nowhere").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Recording answers
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn valid_answer_is_recorded(pool: PgPool) {
    create_restaurant(&pool, "Amber Cafe").await;
    let app = build_test_app(pool.clone());

    let response = post_json(
        app,
        "/api/v1/survey/amber-cafe/responses",
        json!({ "source": "instagram" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["ok"], true);
    assert!(json["id"].as_i64().is_some());
    assert_eq!(response_count(&pool).await, 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_source_is_rejected_without_writing(pool: PgPool) {
    create_restaurant(&pool, "Amber Cafe").await;
    let app = build_test_app(pool.clone());

    let response = post_json(
        app,
        "/api/v1/survey/amber-cafe/responses",
        json!({ "source": "carrier_pigeon" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn inactive_source_is_rejected(pool: PgPool) {
    create_restaurant(&pool, "Amber Cafe").await;
    let banner = SourceOptionRepo::find_active_by_key(&pool, "banner")
        .await
        .unwrap()
        .expect("seeded source");
    SourceOptionRepo::update(
        &pool,
        banner.id,
        &UpdateSourceOption {
            active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let app = build_test_app(pool.clone());

    let response = post_json(
        app,
        "/api/v1/survey/amber-cafe/responses",
        json!({ "source": "banner" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn answer_for_unknown_restaurant_is_404(pool: PgPool) {
    let app = build_test_app(pool.clone());

    let response = post_json(
        app,
        "/api/v1/survey/nowhere/responses",
        json!({ "source": "instagram" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response_count(&pool).await, 0);
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn answer_notifies_configured_chat_with_daily_count(pool: PgPool) {
    create_restaurant(&pool, "Amber Cafe").await;
    enable_notifications(&pool, "-100123").await;
    let (notifier, mut rx) = RecordingNotifier::new();
    let app = build_app(test_state(pool, test_config()).with_notifier(notifier));

    for expected in 1..=2 {
        let response = post_json(
            app.clone(),
            "/api/v1/survey/amber-cafe/responses",
            json!({ "source": "friends" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let (destination, text) = next_within(&mut rx)
            .await
            .expect("notification should be dispatched");
        assert_eq!(destination, "-100123");
        assert!(text.contains("Amber Cafe"), "text: {text}");
        assert!(text.contains("Friends recommended"), "text: {text}");
        assert!(
            text.contains(&format!("Today at this restaurant: {expected}")),
            "text: {text}"
        );
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn disabled_notifications_send_nothing(pool: PgPool) {
    create_restaurant(&pool, "Amber Cafe").await;
    let (notifier, mut rx) = RecordingNotifier::new();
    let app = build_app(test_state(pool, test_config()).with_notifier(notifier));

    let response = post_json(
        app,
        "/api/v1/survey/amber-cafe/responses",
        json!({ "source": "friends" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let received = tokio::time::timeout(Duration::from_millis(300), rx.recv()).await;
    assert!(received.is_err(), "no notification expected");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn failing_notifier_does_not_fail_the_answer(pool: PgPool) {
    create_restaurant(&pool, "Amber Cafe").await;
    enable_notifications(&pool, "-100123").await;
    let (notifier, mut attempts) = FailingNotifier::new();
    let app = build_app(test_state(pool.clone(), test_config()).with_notifier(notifier));

    let response = post_json(
        app,
        "/api/v1/survey/amber-cafe/responses",
        json!({ "source": "other" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        next_within(&mut attempts).await.as_deref(),
        Some("-100123"),
        "delivery was attempted"
    );
    assert_eq!(response_count(&pool).await, 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unreachable_bot_does_not_fail_the_answer(pool: PgPool) {
    create_restaurant(&pool, "Amber Cafe").await;
    enable_notifications(&pool, "-100123").await;
    let mut config = test_config();
    config.telegram.bot = Some(unreachable_bot());
    let app = build_app(test_state(pool.clone(), config));

    let response = post_json(
        app,
        "/api/v1/survey/amber-cafe/responses",
        json!({ "source": "passerby" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response_count(&pool).await, 1);
}
