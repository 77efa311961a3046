//! End-to-end API tests over an in-memory SQLite database.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

use cafelist_server::db::pool::create_pool_with_options;
use cafelist_server::db::repos::{CategoryRepo, UserRepo};
use cafelist_server::db::migrations;
use cafelist_server::{build_router, AppState, ServerConfig};

const SECRET: &str = "test-secret";

async fn test_app() -> (Router, SqlitePool) {
    let pool = create_pool_with_options("sqlite::memory:", 1)
        .await
        .expect("pool");
    migrations::run(&pool).await.expect("migrations");

    for name in ["wifi", "quiet", "coffee", "brunch"] {
        CategoryRepo::new(&pool)
            .insert_if_missing(name)
            .await
            .expect("seed category");
    }

    let state = Arc::new(AppState::new(pool.clone(), SECRET));
    let router = build_router(state, &ServerConfig::default());
    (router, pool)
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send_with_token(router, method, uri, body, None).await
}

async fn send_with_token(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder
        .body(match body {
            Some(v) => Body::from(v.to_string()),
            None => Body::empty(),
        })
        .expect("request");

    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

async fn login(router: &Router) -> String {
    let (status, _) = send(
        router,
        "POST",
        "/auth/register",
        Some(json!({ "email": "owner@example.com", "password": "hunter2" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        router,
        "POST",
        "/auth/jwt/login",
        Some(json!({ "email": "owner@example.com", "password": "hunter2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    body["access_token"].as_str().expect("token").to_owned()
}

fn cafe_body(title: &str, city: &str, description: &str, best: &str, also: &[&str]) -> Value {
    json!({
        "title": title,
        "city": city,
        "description": description,
        "best_for": best,
        "also_good_for": also,
    })
}

#[tokio::test]
async fn health_is_ok() {
    let (router, _pool) = test_app().await;
    let (status, body) = send(&router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn create_requires_auth() {
    let (router, _pool) = test_app().await;
    let body = cafe_body("A", "Paris", "a", "wifi", &[]);

    let (status, _) = send(&router, "POST", "/cafes", Some(body.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) =
        send_with_token(&router, "POST", "/cafes", Some(body), Some("not.a.token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn inactive_user_is_rejected() {
    let (router, pool) = test_app().await;
    let token = login(&router).await;

    let user = UserRepo::new(&pool)
        .find_by_email("owner@example.com")
        .await
        .unwrap()
        .unwrap();
    UserRepo::new(&pool).set_active(user.id, false).await.unwrap();

    let body = cafe_body("A", "Paris", "a", "wifi", &[]);
    let (status, _) = send_with_token(&router, "POST", "/cafes", Some(body), Some(token.as_str())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_and_list_cafes() {
    let (router, _pool) = test_app().await;
    let token = login(&router).await;

    let (status, created) = send_with_token(
        &router,
        "POST",
        "/cafes",
        Some(cafe_body("Cozy Corner", "Paris", "quiet spot", "wifi", &["quiet"])),
        Some(token.as_str()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["best_for"], "wifi");
    assert_eq!(created["also_good_for"], json!(["quiet"]));

    let (status, listed) = send(&router, "GET", "/cafes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["title"], "Cozy Corner");
}

#[tokio::test]
async fn duplicate_title_city_is_conflict() {
    let (router, pool) = test_app().await;
    let token = login(&router).await;

    let body = cafe_body("Cozy Corner", "Paris", "first", "wifi", &[]);
    let (status, _) =
        send_with_token(&router, "POST", "/cafes", Some(body), Some(token.as_str())).await;
    assert_eq!(status, StatusCode::CREATED);

    let body = cafe_body("Cozy Corner", "Paris", "second", "quiet", &[]);
    let (status, err) =
        send_with_token(&router, "POST", "/cafes", Some(body), Some(token.as_str())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["error"], "conflict");

    // No partial rows survived the rollback
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cafes")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 1);
    let assoc: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cafe_categories")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(assoc.0, 1);
}

#[tokio::test]
async fn best_category_repeated_in_also_set_is_rejected() {
    let (router, _pool) = test_app().await;
    let token = login(&router).await;

    let body = cafe_body("B", "Paris", "b", "wifi", &["wifi"]);
    let (status, err) =
        send_with_token(&router, "POST", "/cafes", Some(body), Some(token.as_str())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "validation_error");
    assert!(err["message"].as_str().unwrap().contains("wifi"));
}

#[tokio::test]
async fn unknown_categories_are_listed_in_create_error() {
    let (router, _pool) = test_app().await;
    let token = login(&router).await;

    let body = cafe_body("B", "Paris", "b", "vegan", &["arcade", "quiet"]);
    let (status, err) =
        send_with_token(&router, "POST", "/cafes", Some(body), Some(token.as_str())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        err["message"],
        "categories do not exist: arcade, vegan"
    );
}

#[tokio::test]
async fn unknown_categories_are_listed_in_filter_error() {
    let (router, _pool) = test_app().await;

    let (status, err) = send(
        &router,
        "GET",
        "/cafes?best_for=zilch&also_good_for=nope,quiet",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["message"], "categories do not exist: nope, zilch");
}

#[tokio::test]
async fn filters_match_best_and_also_rows_separately() {
    let (router, _pool) = test_app().await;
    let token = login(&router).await;

    for (title, best, also) in [
        ("A", "wifi", vec!["quiet"]),
        ("B", "quiet", vec!["wifi"]),
        ("C", "coffee", vec![]),
    ] {
        let also: Vec<&str> = also;
        let (status, _) = send_with_token(
            &router,
            "POST",
            "/cafes",
            Some(cafe_body(title, "Paris", "x", best, &also)),
            Some(token.as_str()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, listed) = send(&router, "GET", "/cafes?best_for=wifi", None).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["A"]);

    let (status, listed) = send(&router, "GET", "/cafes?also_good_for=wifi", None).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["B"]);
}

#[tokio::test]
async fn update_replaces_association_set() {
    let (router, _pool) = test_app().await;
    let token = login(&router).await;

    let (_, created) = send_with_token(
        &router,
        "POST",
        "/cafes",
        Some(cafe_body("A", "Paris", "old", "wifi", &["quiet", "coffee"])),
        Some(token.as_str()),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = send_with_token(
        &router,
        "PUT",
        &format!("/cafes/{id}"),
        Some(cafe_body("A", "Paris", "new", "quiet", &["brunch"])),
        Some(token.as_str()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["description"], "new");
    assert_eq!(updated["best_for"], "quiet");
    assert_eq!(updated["also_good_for"], json!(["brunch"]));

    let (status, _) = send_with_token(
        &router,
        "PUT",
        "/cafes/999",
        Some(cafe_body("X", "Paris", "x", "wifi", &[])),
        Some(token.as_str()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_cascades_and_then_404s() {
    let (router, pool) = test_app().await;
    let token = login(&router).await;

    let (_, created) = send_with_token(
        &router,
        "POST",
        "/cafes",
        Some(cafe_body("A", "Paris", "a", "wifi", &["quiet"])),
        Some(token.as_str()),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) =
        send_with_token(&router, "DELETE", &format!("/cafes/{id}"), None, Some(token.as_str())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Cafe deleted");

    let assoc: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cafe_categories")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(assoc.0, 0);

    let (status, _) =
        send_with_token(&router, "DELETE", &format!("/cafes/{id}"), None, Some(token.as_str())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&router, "GET", &format!("/cafes/{id}/recommend"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn recommendations_follow_text_similarity() {
    let (router, _pool) = test_app().await;
    let token = login(&router).await;

    let (_, created) = send_with_token(
        &router,
        "POST",
        "/cafes",
        Some(cafe_body(
            "Target",
            "Paris",
            "quiet workspace with fast wifi",
            "wifi",
            &["quiet"],
        )),
        Some(token.as_str()),
    )
    .await;
    let target = created["id"].as_i64().unwrap();

    // Alone in the corpus: no meaningful comparison
    let (status, recs) =
        send(&router, "GET", &format!("/cafes/{target}/recommend"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(recs, json!([]));

    for (title, description, best, also) in [
        ("Twin", "quiet workspace with fast wifi", "wifi", vec!["quiet"]),
        ("Brunchy", "weekend brunch and pastries", "brunch", vec![]),
        ("Beans", "specialty coffee roastery", "coffee", vec![]),
        ("Library", "silent reading room vibes", "quiet", vec!["wifi"]),
    ] {
        let also: Vec<&str> = also;
        send_with_token(
            &router,
            "POST",
            "/cafes",
            Some(cafe_body(title, "Paris", description, best, &also)),
            Some(token.as_str()),
        )
        .await;
    }

    let (status, recs) =
        send(&router, "GET", &format!("/cafes/{target}/recommend"), None).await;
    assert_eq!(status, StatusCode::OK);
    let recs = recs.as_array().unwrap();
    assert_eq!(recs.len(), 3);
    let titles: Vec<&str> = recs.iter().map(|c| c["title"].as_str().unwrap()).collect();
    assert!(!titles.contains(&"Target"));
    assert_eq!(titles[0], "Twin");

    let (status, _) = send(&router, "GET", "/cafes/999/recommend", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn login_failures_are_unauthorized() {
    let (router, _pool) = test_app().await;
    let _ = login(&router).await;

    let (status, _) = send(
        &router,
        "POST",
        "/auth/jwt/login",
        Some(json!({ "email": "owner@example.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &router,
        "POST",
        "/auth/jwt/login",
        Some(json!({ "email": "ghost@example.com", "password": "hunter2" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_registration_is_conflict() {
    let (router, _pool) = test_app().await;
    let _ = login(&router).await;

    let (status, _) = send(
        &router,
        "POST",
        "/auth/register",
        Some(json!({ "email": "owner@example.com", "password": "other" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn categories_endpoint_lists_table() {
    let (router, _pool) = test_app().await;
    let (status, body) = send(&router, "GET", "/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["wifi", "quiet", "coffee", "brunch"]);
}
