//! Cart to order transition against a mocked backend.

mod common;

use axum::http::{header, Method, StatusCode};
use common::{cart_json, order_json, response_json, valid_checkout, TestApp};
use serde_json::json;
use std::time::Duration;
use wiremock::{
    matchers::{header as header_matcher, method, path},
    Mock, ResponseTemplate,
};

#[tokio::test]
async fn checkout_page_redirects_when_cart_is_empty() {
    let app = TestApp::new().await;
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(0)))
        .mount(&app.backend)
        .await;

    let response = app.request_signed_in(Method::GET, "/checkout", None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/cart");
}

#[tokio::test]
async fn checkout_page_summarises_a_filled_cart() {
    let app = TestApp::new().await;
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .and(header_matcher("cookie", common::SESSION_COOKIE))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(2)))
        .mount(&app.backend)
        .await;

    let response = app.request_signed_in(Method::GET, "/checkout", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["itemCount"], 2);
    assert_eq!(body["subtotal"], "180.00");
    assert_eq!(body["paymentMethod"], "Cash on delivery");
}

#[tokio::test]
async fn placing_an_order_invalidates_the_cached_cart() {
    let app = TestApp::new().await;
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(2)))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&app.backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(0)))
        .with_priority(2)
        .mount(&app.backend)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "message": "Order created", "data": order_json("order-1", "PLACED") })),
        )
        .expect(1)
        .mount(&app.backend)
        .await;

    let before = app.request_signed_in(Method::GET, "/cart", None).await;
    assert_eq!(response_json(before).await["items"].as_array().unwrap().len(), 1);

    let created = app
        .request_signed_in(Method::POST, "/checkout", Some(valid_checkout()))
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let order = response_json(created).await;
    assert_eq!(order["order"]["id"], "order-1");
    assert_eq!(order["canCancel"], true);

    let after = app.request_signed_in(Method::GET, "/cart", None).await;
    let cart = response_json(after).await;
    assert!(cart["items"].as_array().unwrap().is_empty());
    assert_eq!(cart["cartCount"], 0);
}

#[tokio::test]
async fn cart_read_overlapping_an_order_is_not_cached() {
    let app = TestApp::new().await;
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(cart_json(2))
                .set_delay(Duration::from_millis(400)),
        )
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&app.backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(0)))
        .with_priority(2)
        .mount(&app.backend)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "data": order_json("order-1", "PLACED") })),
        )
        .expect(1)
        .mount(&app.backend)
        .await;

    let (slow_read, created) = tokio::join!(
        app.request_signed_in(Method::GET, "/cart", None),
        async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            app.request_signed_in(Method::POST, "/checkout", Some(valid_checkout()))
                .await
        },
    );
    assert_eq!(slow_read.status(), StatusCode::OK);
    assert_eq!(created.status(), StatusCode::CREATED);

    let after = app.request_signed_in(Method::GET, "/cart", None).await;
    let cart = response_json(after).await;
    assert!(cart["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn invalid_shipping_details_never_reach_the_backend() {
    let app = TestApp::new().await;
    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.backend)
        .await;

    let response = app
        .request_signed_in(
            Method::POST,
            "/checkout",
            Some(json!({
                "shippingName": "Rahim Uddin",
                "shippingPhone": "0171234567",
                "shippingAddress": "a".repeat(99)
            })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response_json(response).await;
    assert!(body["fields"]["shippingPhone"].is_array());
    assert!(body["fields"]["shippingAddress"].is_array());
    assert!(body["fields"].get("shippingName").is_none());
}

#[tokio::test]
async fn backend_rejection_message_is_shown_verbatim() {
    let app = TestApp::new().await;
    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "message": "Insufficient stock for Napa Extra" })),
        )
        .mount(&app.backend)
        .await;

    let response = app
        .request_signed_in(Method::POST, "/checkout", Some(valid_checkout()))
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        response_json(response).await["error"],
        "Insufficient stock for Napa Extra"
    );
}

#[tokio::test]
async fn duplicate_submission_is_refused_while_one_is_in_flight() {
    let app = TestApp::new().await;
    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "data": order_json("order-1", "PLACED") }))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&app.backend)
        .await;

    let (first, second) = tokio::join!(
        app.request_signed_in(Method::POST, "/checkout", Some(valid_checkout())),
        app.request_signed_in(Method::POST, "/checkout", Some(valid_checkout())),
    );

    let mut statuses = vec![first.status(), second.status()];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);
}

#[tokio::test]
async fn mutations_require_a_session() {
    let app = TestApp::new().await;
    Mock::given(method("POST"))
        .and(path("/api/cart/items"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.backend)
        .await;

    let response = app
        .request(
            Method::POST,
            "/cart/items",
            Some(json!({ "medicineId": "med-1", "quantity": 1 })),
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn add_to_cart_rejects_zero_quantity() {
    let app = TestApp::new().await;
    Mock::given(method("POST"))
        .and(path("/api/cart/items"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.backend)
        .await;

    let response = app
        .request_signed_in(
            Method::POST,
            "/cart/items",
            Some(json!({ "medicineId": "med-1", "quantity": 0 })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response_json(response).await["fields"]["quantity"].is_array());
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    // Nothing listens on port 1, so the connection is refused.
    let router = medistore_server::app(&common::config_for("http://127.0.0.1:1"));

    let response = common::send(&router, Method::GET, "/cart", None, Some(common::SESSION_COOKIE)).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(response_json(response).await["error"], "Network error");
}
