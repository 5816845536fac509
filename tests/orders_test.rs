//! Order views, tracking and the cancellation gate.

mod common;

use axum::http::{Method, StatusCode};
use common::{order_json, response_json, TestApp};
use serde_json::json;
use std::time::Duration;
use wiremock::{
    matchers::{method, path},
    Mock, ResponseTemplate,
};

async fn mount_order(app: &TestApp, id: &str, status: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/api/orders/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": order_json(id, status) })))
        .mount(&app.backend)
        .await;
}

#[tokio::test]
async fn order_list_carries_badges_and_affordances() {
    let app = TestApp::new().await;
    Mock::given(method("GET"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [order_json("aaaaaaaa-1", "PLACED"), order_json("bbbbbbbb-2", "DELIVERED")]
        })))
        .mount(&app.backend)
        .await;

    let response = app.request_signed_in(Method::GET, "/orders", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let orders = response_json(response).await;
    assert_eq!(orders[0]["reference"], "AAAAAAAA");
    assert_eq!(orders[0]["status"]["badge"], "secondary");
    assert_eq!(orders[0]["canCancel"], true);
    assert_eq!(orders[1]["status"]["label"], "Delivered");
    assert_eq!(orders[1]["canCancel"], false);
}

#[tokio::test]
async fn missing_order_renders_not_found() {
    let app = TestApp::new().await;
    Mock::given(method("GET"))
        .and(path("/api/orders/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Order not found" })))
        .mount(&app.backend)
        .await;

    let response = app.request_signed_in(Method::GET, "/orders/missing", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response_json(response).await["notFound"], true);
}

#[tokio::test]
async fn tracking_survives_a_failed_history_read() {
    let app = TestApp::new().await;
    let mut order = order_json("order-1", "SHIPPED");
    order["statusHistory"] = json!([
        { "status": "PLACED", "changedAt": "2026-02-20T10:30:00Z" },
        { "status": "SHIPPED", "changedAt": "2026-02-22T08:00:00Z" }
    ]);
    Mock::given(method("GET"))
        .and(path("/api/orders/order-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": order })))
        .mount(&app.backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/orders/order-1/status-history"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "boom" })))
        .mount(&app.backend)
        .await;

    let response = app
        .request_signed_in(Method::GET, "/orders/order-1/track", None)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let view = response_json(response).await;
    assert_eq!(view["historyAvailable"], false);

    let steps = view["timeline"]["steps"].as_array().unwrap();
    let states: Vec<&str> = steps.iter().map(|step| step["state"].as_str().unwrap()).collect();
    assert_eq!(
        states,
        vec!["completed", "completed", "completed", "completed", "pending"]
    );
    assert_eq!(steps[0]["reachedAt"], "2026-02-20T10:30:00Z");
    assert!(steps[1]["reachedAt"].is_null());
    assert_eq!(steps[3]["isCurrent"], true);
    assert_eq!(steps[4]["awaiting"], true);
}

#[tokio::test]
async fn tracking_uses_the_history_endpoint() {
    let app = TestApp::new().await;
    mount_order(&app, "order-2", "CANCELLED").await;
    Mock::given(method("GET"))
        .and(path("/api/orders/order-2/status-history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "status": "PLACED", "changedAt": "2026-02-20T10:30:00Z" },
                { "status": "CANCELLED", "changedAt": "2026-02-20T12:00:00Z" }
            ]
        })))
        .mount(&app.backend)
        .await;

    let response = app
        .request_signed_in(Method::GET, "/orders/order-2/track", None)
        .await;

    let view = response_json(response).await;
    assert_eq!(view["historyAvailable"], true);
    assert_eq!(view["timeline"]["cancelled"], true);
    let steps = view["timeline"]["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 6);
    assert_eq!(steps[0]["state"], "completed");
    assert_eq!(steps[1]["state"], "pending");
    assert_eq!(steps[1]["awaiting"], false);
    assert_eq!(steps[5]["status"], "CANCELLED");
    assert_eq!(steps[5]["reachedAt"], "2026-02-20T12:00:00Z");
}

#[tokio::test]
async fn cancellation_requires_confirmation() {
    let app = TestApp::new().await;
    Mock::given(method("PATCH"))
        .and(path("/api/orders/order-1/cancel"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.backend)
        .await;

    let response = app
        .request_signed_in(Method::POST, "/orders/order-1/cancel", Some(json!({})))
        .await;

    assert_eq!(response.status(), StatusCode::PRECONDITION_REQUIRED);
}

#[tokio::test]
async fn shipped_orders_cannot_be_cancelled() {
    let app = TestApp::new().await;
    mount_order(&app, "order-1", "SHIPPED").await;
    Mock::given(method("PATCH"))
        .and(path("/api/orders/order-1/cancel"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.backend)
        .await;

    let response = app
        .request_signed_in(
            Method::POST,
            "/orders/order-1/cancel",
            Some(json!({ "confirm": true })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn cancelling_a_placed_order_refreshes_its_views() {
    let app = TestApp::new().await;
    Mock::given(method("GET"))
        .and(path("/api/orders/order-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": order_json("order-1", "PLACED") })),
        )
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&app.backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/orders/order-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": order_json("order-1", "CANCELLED") })),
        )
        .with_priority(2)
        .mount(&app.backend)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/orders/order-1/cancel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Order cancelled",
            "data": order_json("order-1", "CANCELLED")
        })))
        .expect(1)
        .mount(&app.backend)
        .await;

    let before = app.request_signed_in(Method::GET, "/orders/order-1", None).await;
    assert_eq!(response_json(before).await["canCancel"], true);

    let cancelled = app
        .request_signed_in(
            Method::POST,
            "/orders/order-1/cancel",
            Some(json!({ "confirm": true })),
        )
        .await;
    assert_eq!(cancelled.status(), StatusCode::OK);
    assert_eq!(response_json(cancelled).await["status"]["code"], "CANCELLED");

    let after = app.request_signed_in(Method::GET, "/orders/order-1", None).await;
    let view = response_json(after).await;
    assert_eq!(view["status"]["code"], "CANCELLED");
    assert_eq!(view["canCancel"], false);
}

#[tokio::test]
async fn cancelling_two_orders_at_once_is_allowed() {
    let app = TestApp::new().await;
    for id in ["order-a", "order-b"] {
        mount_order(&app, id, "PLACED").await;
        Mock::given(method("PATCH"))
            .and(path(format!("/api/orders/{id}/cancel")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": order_json(id, "CANCELLED") }))
                    .set_delay(Duration::from_millis(300)),
            )
            .expect(1)
            .mount(&app.backend)
            .await;
    }

    let (a, b) = tokio::join!(
        app.request_signed_in(
            Method::POST,
            "/orders/order-a/cancel",
            Some(json!({ "confirm": true })),
        ),
        app.request_signed_in(
            Method::POST,
            "/orders/order-b/cancel",
            Some(json!({ "confirm": true })),
        ),
    );

    assert_eq!(a.status(), StatusCode::OK);
    assert_eq!(b.status(), StatusCode::OK);
}
