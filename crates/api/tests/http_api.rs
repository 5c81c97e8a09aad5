//! In-process tests: the router is driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use stockguard_advisor::ForecastConfig;
use stockguard_api::app::{build_app, services::AppServices};

fn app() -> Router {
    let services = AppServices::seeded(ForecastConfig::default()).unwrap();
    build_app(Arc::new(services))
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

#[tokio::test]
async fn health_is_ok() {
    let (status, _) = get(&app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn lists_seed_catalog_in_order() {
    let (status, body) = get(&app(), "/items").await;
    assert_eq!(status, StatusCode::OK);
    let keys: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["ITEM-001", "ITEM-002", "ITEM-003", "ITEM-004"]);
}

#[tokio::test]
async fn outbound_movement_returns_receipt_with_threshold_flag() {
    let app = app();
    let (status, body) = post_json(
        &app,
        "/items/ITEM-004/movements",
        json!({"magnitude": 850, "kind": "outbound", "reason": "bulk order"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["new_quantity"], 150);
    assert_eq!(body["below_safety_threshold"], true);
    assert_eq!(body["movement"]["kind"], "outbound");

    let (_, item) = get(&app, "/items/ITEM-004").await;
    assert_eq!(item["quantity"], 150);
}

#[tokio::test]
async fn overdraw_is_rejected_with_available_and_requested() {
    let app = app();
    let (status, body) = post_json(
        &app,
        "/items/ITEM-001/movements",
        json!({"magnitude": 51, "kind": "outbound", "reason": "too many"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "insufficient_stock");
    assert_eq!(body["available"], 50);
    assert_eq!(body["requested"], 51);

    let (_, item) = get(&app, "/items/ITEM-001").await;
    assert_eq!(item["quantity"], 50);
}

#[tokio::test]
async fn error_statuses_use_the_json_error_shape() {
    let app = app();

    let (status, body) = get(&app, "/items/ITEM-999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
    assert!(body["message"].is_string());

    let (status, body) = get(&app, "/items/bad$key").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_id");

    let (status, body) = post_json(
        &app,
        "/items/ITEM-001/movements",
        json!({"magnitude": 1, "kind": "teleport"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, body) = post_json(
        &app,
        "/items/ITEM-001/movements",
        json!({"magnitude": 1, "kind": "inbound", "reason": "x".repeat(2_000)}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn movement_history_can_be_filtered_by_item() {
    let app = app();
    post_json(
        &app,
        "/items/ITEM-002/movements",
        json!({"magnitude": 5, "kind": "inbound", "reason": "restock"}),
    )
    .await;

    let (status, body) = get(&app, "/movements?item=ITEM-002").await;
    assert_eq!(status, StatusCode::OK);
    let movements = body.as_array().unwrap();
    assert_eq!(movements.len(), 2);
    assert_eq!(movements[0]["reason"], "opening balance");
    assert_eq!(movements[1]["magnitude"], 5);

    let (_, all) = get(&app, "/movements").await;
    assert_eq!(all.as_array().unwrap().len(), 5);

    let (status, _) = get(&app, "/movements?item=ITEM-999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn forecast_and_reorder_reflect_sales_history() {
    let app = app();
    for _ in 0..10 {
        post_json(
            &app,
            "/items/ITEM-002/movements",
            json!({"magnitude": 10, "kind": "outbound", "reason": "sale"}),
        )
        .await;
    }

    let (status, body) = get(&app, "/items/ITEM-002/forecast?horizon_days=30").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["forecast"], 360);
    assert_eq!(body["horizon_days"], 30);

    let (status, rec) = get(&app, "/items/ITEM-002/reorder").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rec["item_key"], "ITEM-002");
    assert_eq!(rec["current_quantity"], 400);

    let (_, all) = get(&app, "/reorder").await;
    assert_eq!(all.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn verify_reports_no_drift() {
    let app = app();
    post_json(
        &app,
        "/items/ITEM-003/movements",
        json!({"magnitude": 7, "kind": "adjustment", "reason": "cycle count"}),
    )
    .await;

    let (status, report) = get(&app, "/items/ITEM-003/verify").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["is_valid"], true);
    assert_eq!(report["live_quantity"], 127);

    let (_, reports) = get(&app, "/verify").await;
    assert!(reports
        .as_array()
        .unwrap()
        .iter()
        .all(|r| r["is_valid"] == true));
}

#[tokio::test]
async fn admin_reset_restores_seed_state() {
    let app = app();
    post_json(
        &app,
        "/items/ITEM-001/movements",
        json!({"magnitude": 50, "kind": "outbound", "reason": "sell out"}),
    )
    .await;

    let req = Request::post("/admin/reset").body(Body::empty()).unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, item) = get(&app, "/items/ITEM-001").await;
    assert_eq!(item["quantity"], 50);
    let (_, history) = get(&app, "/movements?item=ITEM-001").await;
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn malformed_query_strings_use_the_json_error_shape() {
    let app = app();

    let resp = app
        .clone()
        .oneshot(
            Request::get("/items/ITEM-001/forecast?horizon_days=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "validation_error");
    assert!(body["message"].is_string());

    let (status, body) = get(&app, "/movements?item=ITEM-001&item=ITEM-002").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}
