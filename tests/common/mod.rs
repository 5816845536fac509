#![allow(dead_code)]

use axum::{
    body::{self, Body},
    http::{header, Method, Request},
    response::Response,
    Router,
};
use medistore_server::config::{
    parse_backend_url, AppConfig, BackendConfig, CacheConfig, CorsConfig, SessionConfig,
};
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;
use wiremock::MockServer;

pub const SESSION_COOKIE: &str = "better-auth.session_token=token-abc";

/// Router wired to a mock backend.
pub struct TestApp {
    pub router: Router,
    pub backend: MockServer,
}

pub fn config_for(backend_uri: &str) -> AppConfig {
    AppConfig {
        host: "127.0.0.1".into(),
        port: 0,
        backend: BackendConfig {
            base_url: parse_backend_url(&format!("{backend_uri}/api")).expect("backend url"),
        },
        session: SessionConfig {
            cookie_name: "better-auth.session_token".into(),
            endpoint: "/auth/get-session".into(),
        },
        cache: CacheConfig {
            ttl: Duration::from_secs(60),
        },
        request_timeout: Duration::from_secs(10),
        cors: CorsConfig {
            allowed_origins: vec!["http://localhost:3000".into()],
        },
    }
}

impl TestApp {
    pub async fn new() -> Self {
        let backend = MockServer::start().await;
        let router = medistore_server::app(&config_for(&backend.uri()));
        Self { router, backend }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> Response {
        send(&self.router, method, uri, body, cookie).await
    }

    /// Request carrying the shopper's session cookie.
    pub async fn request_signed_in(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        self.request(method, uri, body, Some(SESSION_COOKIE)).await
    }
}

pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    cookie: Option<&str>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let body = if let Some(json) = body {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
    } else {
        Body::empty()
    };

    let request = builder.body(body).expect("failed to build request");
    router
        .clone()
        .oneshot(request)
        .await
        .expect("router error during test request")
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

pub fn order_json(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "userId": "user-1",
        "total": "180.00",
        "status": status,
        "shippingName": "Rahim Uddin",
        "shippingPhone": "01712345678",
        "shippingAddress": "House 12, Road 5, Dhanmondi",
        "createdAt": "2026-02-20T10:30:00Z",
        "updatedAt": "2026-02-20T10:30:00Z",
        "items": [{
            "id": "item-1",
            "orderId": id,
            "medicineId": "med-1",
            "quantity": 2,
            "unitPrice": "90.00",
            "orderItemStatus": status,
            "medicine": { "id": "med-1", "name": "Napa Extra" }
        }]
    })
}

pub fn cart_json(quantity: u32) -> Value {
    if quantity == 0 {
        return json!({ "data": { "items": [], "subtotal": 0, "cartCount": 0 } });
    }
    json!({
        "data": {
            "items": [{
                "id": "cart-item-1",
                "medicineId": "med-1",
                "quantity": quantity,
                "medicine": { "id": "med-1", "name": "Napa Extra", "price": "90.00" }
            }],
            "subtotal": "180.00",
            "cartCount": quantity
        }
    })
}

pub fn valid_checkout() -> Value {
    json!({
        "shippingName": "Rahim Uddin",
        "shippingPhone": "01712345678",
        "shippingAddress": "a".repeat(120)
    })
}
