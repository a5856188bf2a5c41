//! services/api/tests/rest_api.rs
//!
//! Drives the full REST router against an in-memory store, request to
//! response, the way the browser client talks to it.

use api_lib::adapters::SqliteStore;
use api_lib::config::Config;
use api_lib::web::{api_router, state::AppState};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tower::ServiceExt;

async fn test_app(seed: bool) -> Router {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");
    let store = SqliteStore::new(pool);
    store.init_schema().await.expect("failed to create schema");
    if seed {
        store.seed_if_empty().await.expect("failed to seed");
    }

    let state = Arc::new(AppState {
        store: Arc::new(store),
        config: Arc::new(Config::from_env().expect("failed to load config")),
    });
    api_router(state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn ibuprofen() -> Value {
    json!({
        "medicine": "Ibuprofen",
        "dosage": "200mg",
        "duration": "5 days",
        "start_date": "2024-11-01",
        "end_date": "2024-11-06",
        "condition": "Pain"
    })
}

#[tokio::test]
async fn post_then_get_by_id_returns_the_stored_record() {
    let app = test_app(false).await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/records", &ibuprofen()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = body_json(response).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["medicine"], "Ibuprofen");
    assert_eq!(created["start_date"], "2024-11-01");
    assert!(created["created_at"].is_string());
    assert!(created["updated_at"].is_string());

    let response = app.oneshot(get(&format!("/records/{}", id))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn post_with_inverted_dates_is_rejected_and_creates_nothing() {
    let app = test_app(true).await;

    let mut payload = ibuprofen();
    payload["start_date"] = json!("2024-11-10");
    payload["end_date"] = json!("2024-11-01");

    let response = app
        .clone()
        .oneshot(json_request("POST", "/records", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "start_date must not be after end_date");

    let response = app.oneshot(get("/records")).await.unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn post_with_a_missing_field_names_it() {
    let app = test_app(false).await;

    let mut payload = ibuprofen();
    payload.as_object_mut().unwrap().remove("medicine");

    let response = app
        .oneshot(json_request("POST", "/records", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "The 'medicine' field is required");
}

#[tokio::test]
async fn seeded_listing_puts_a_new_ibuprofen_course_first() {
    let app = test_app(true).await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/records", &ibuprofen()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.oneshot(get("/records")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    let rows = listed.as_array().unwrap();

    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["medicine"], "Ibuprofen");

    // start_date descending throughout.
    let dates: Vec<&str> = rows.iter().map(|r| r["start_date"].as_str().unwrap()).collect();
    let mut sorted = dates.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(dates, sorted);
}

#[tokio::test]
async fn delete_then_get_returns_404() {
    let app = test_app(false).await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/records", &ibuprofen()))
        .await
        .unwrap();
    let id = body_json(response).await["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/records/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("deleted"));

    let response = app.oneshot(get(&format!("/records/{}", id))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_of_an_unknown_id_returns_404_and_count_is_unchanged() {
    let app = test_app(true).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/records/9999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(get("/records")).await.unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn put_replaces_the_record_and_returns_it() {
    let app = test_app(false).await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/records", &ibuprofen()))
        .await
        .unwrap();
    let id = body_json(response).await["id"].as_i64().unwrap();

    let mut payload = ibuprofen();
    payload["dosage"] = json!("400mg");
    payload["condition"] = json!("");

    let response = app
        .clone()
        .oneshot(json_request("PUT", &format!("/records/{}", id), &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["id"].as_i64().unwrap(), id);
    assert_eq!(updated["dosage"], "400mg");
    // An empty condition is stored as absent.
    assert!(updated["condition"].is_null());

    let response = app.oneshot(get(&format!("/records/{}", id))).await.unwrap();
    assert_eq!(body_json(response).await["dosage"], "400mg");
}

#[tokio::test]
async fn put_on_an_unknown_id_returns_404_and_creates_no_row() {
    let app = test_app(true).await;

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/records/9999", &ibuprofen()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(get("/records")).await.unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn put_with_inverted_dates_is_rejected() {
    let app = test_app(true).await;

    let response = app.clone().oneshot(get("/records")).await.unwrap();
    let id = body_json(response).await[0]["id"].as_i64().unwrap();

    let mut payload = ibuprofen();
    payload["start_date"] = json!("2024-11-10");
    payload["end_date"] = json!("2024-11-01");

    let response = app
        .oneshot(json_request("PUT", &format!("/records/{}", id), &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_of_the_seed_fixture_returns_exactly_the_aspirin_row() {
    let app = test_app(true).await;

    let response = app.oneshot(get("/records/search/aspirin")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let rows = body_json(response).await;
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["medicine"], "Aspirin");
}

#[tokio::test]
async fn markup_in_a_field_is_stored_and_returned_verbatim() {
    // The server treats field content as opaque text; neutralizing it for
    // display is the browser client's job.
    let app = test_app(false).await;

    let mut payload = ibuprofen();
    payload["medicine"] = json!("<script>x</script>");

    let response = app
        .clone()
        .oneshot(json_request("POST", "/records", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["id"].as_i64().unwrap();

    let response = app.oneshot(get(&format!("/records/{}", id))).await.unwrap();
    let fetched = body_json(response).await;
    assert_eq!(fetched["medicine"], "<script>x</script>");
}

#[tokio::test]
async fn health_reports_a_connected_store() {
    let app = test_app(false).await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}
