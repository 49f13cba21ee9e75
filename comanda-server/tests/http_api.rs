//! HTTP surface smoke tests
//!
//! Exercises the axum router end to end: JSON in, JSON out, error envelope
//! with stable codes.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use comanda_server::db::DbService;
use comanda_server::events::EventPublisher;
use comanda_server::{Config, ServerState, api};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn test_app() -> Router {
    let db = DbService::in_memory().await.unwrap();
    let (events, worker) = EventPublisher::new(db.pool.clone(), 64);
    tokio::spawn(worker.run());
    let state = ServerState {
        config: Config::from_env(),
        pool: db.pool,
        events,
    };
    api::router(state)
}

async fn request(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    let request = match body {
        Some(value) => builder.body(Body::from(value.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_endpoint_answers() {
    let app = test_app().await;
    let (status, body) = request(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn qr_flow_over_http() {
    let app = test_app().await;

    let (status, restaurant) = request(
        &app,
        "POST",
        "/api/restaurants",
        Some(json!({ "name": "La Esquina", "slug": "la-esquina" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let restaurant_id = restaurant["id"].as_i64().unwrap();

    let (status, table) = request(
        &app,
        "POST",
        &format!("/api/restaurants/{restaurant_id}/tables"),
        Some(json!({ "number": "7" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let table_id = table["id"].as_i64().unwrap();

    let (_, product) = request(
        &app,
        "POST",
        &format!("/api/restaurants/{restaurant_id}/products"),
        Some(json!({ "name": "Milanesa", "price": 12000 })),
    )
    .await;
    let product_id = product["id"].as_i64().unwrap();
    assert_eq!(product["price_cents"].as_i64().unwrap(), 1_200_000);

    // Ana scans the QR and opens the table
    let (status, started) = request(
        &app,
        "POST",
        &format!("/api/tables/{table_id}/sessions"),
        Some(json!({ "consumer_name": "Ana" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(started["joined"], false);
    let session_id = started["session"]["id"].as_i64().unwrap();
    let ana_id = started["consumer"]["id"].as_i64().unwrap();

    // Beto joins the same table
    let (_, joined) = request(
        &app,
        "POST",
        &format!("/api/tables/{table_id}/sessions"),
        Some(json!({ "consumer_name": "Beto" })),
    )
    .await;
    assert_eq!(joined["joined"], true);
    let beto_id = joined["consumer"]["id"].as_i64().unwrap();

    // A shared milanesa
    let (status, _) = request(
        &app,
        "POST",
        &format!("/api/sessions/{session_id}/items"),
        Some(json!({
            "items": [
                { "product_id": product_id, "consumer_ids": [ana_id, beto_id] }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, totals) = request(
        &app,
        "GET",
        &format!("/api/sessions/{session_id}/totals"),
        None,
    )
    .await;
    assert_eq!(totals["session_total_cents"].as_i64().unwrap(), 1_200_000);
    let consumer_totals = totals["consumer_totals"].as_array().unwrap();
    assert_eq!(consumer_totals.len(), 2);
    assert_eq!(consumer_totals[0]["total_cents"].as_i64().unwrap(), 600_000);
    assert_eq!(consumer_totals[1]["total_cents"].as_i64().unwrap(), 600_000);
    assert_eq!(consumer_totals[0]["items"][0]["is_shared"], true);

    // Bill request flips the session and blocks further items
    let (status, _) = request(
        &app,
        "POST",
        &format!("/api/sessions/{session_id}/service-calls"),
        Some(json!({ "type": "BILL" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, error) = request(
        &app,
        "POST",
        &format!("/api/sessions/{session_id}/items"),
        Some(json!({
            "items": [
                { "product_id": product_id, "consumer_ids": [ana_id] }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"].as_u64().unwrap(), 4003);
    assert_eq!(error["message"], "Cannot add items after requesting bill");

    // The session view reflects everything with lowercase statuses
    let (_, view) = request(&app, "GET", &format!("/api/sessions/{session_id}"), None).await;
    assert_eq!(view["status"], "payment_pending");
    assert_eq!(view["table_number"], "7");
    assert_eq!(view["orders"][0]["items"][0]["status"], "pending");
    assert_eq!(view["service_calls"][0]["type"], "bill");
}

#[tokio::test]
async fn unknown_session_yields_structured_not_found() {
    let app = test_app().await;
    let (status, body) = request(&app, "GET", "/api/sessions/123456", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"].as_u64().unwrap(), 4001);
    assert_eq!(body["message"], "Session not found");
}

#[tokio::test]
async fn invalid_status_yields_unprocessable() {
    let app = test_app().await;

    let (_, restaurant) = request(
        &app,
        "POST",
        "/api/restaurants",
        Some(json!({ "name": "Bar", "slug": "bar" })),
    )
    .await;
    let restaurant_id = restaurant["id"].as_i64().unwrap();
    let (_, table) = request(
        &app,
        "POST",
        &format!("/api/restaurants/{restaurant_id}/tables"),
        Some(json!({ "number": "1" })),
    )
    .await;
    let (_, started) = request(
        &app,
        "POST",
        &format!("/api/tables/{}/sessions", table["id"].as_i64().unwrap()),
        Some(json!({ "consumer_name": "Ana" })),
    )
    .await;
    let session_id = started["session"]["id"].as_i64().unwrap();

    let (status, body) = request(
        &app,
        "PATCH",
        &format!("/api/sessions/{session_id}/status"),
        Some(json!({ "status": "archived" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"].as_u64().unwrap(), 4004);
}
