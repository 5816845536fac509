use reqwest::{
    header::{CONTENT_TYPE, COOKIE},
    Method, RequestBuilder, Url,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use super::{BackendError, Envelope, ResponseBody};
use crate::models::{
    AddToCartPayload, Cart, ChangePasswordPayload, CreateOrderPayload, CreateReviewPayload,
    CreatedReview, DeliveredMedicine, Medicine, MedicinePage, MedicineQuery, Order,
    OrderStatusHistory, ProfileData, ReviewList, SessionWithUser, UpdateProfilePayload, User,
};

/// Thin proxy over the REST API. Authenticated calls forward the caller's
/// `Cookie` header untouched.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
    session_endpoint: Vec<String>,
}

/// The session endpoint answers either bare or wrapped in `data`.
#[derive(Deserialize)]
#[serde(untagged)]
enum SessionBody {
    Bare(SessionWithUser),
    Wrapped { data: Option<SessionWithUser> },
}

impl BackendClient {
    pub fn new(base_url: Url, session_endpoint: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            session_endpoint: session_endpoint
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(String::from)
                .collect(),
        }
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url, cookie: Option<&str>) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder
    }

    /// Sends the request and splits the outcome into transport failure,
    /// HTTP rejection, or a (possibly empty) JSON body.
    async fn exchange(
        &self,
        operation: &'static str,
        builder: RequestBuilder,
        fallback: &'static str,
    ) -> Result<(u16, Option<Value>), BackendError> {
        let response = builder.send().await.map_err(|err| {
            error!("backend.{operation} transport error: {err}");
            BackendError::Network(err.to_string())
        })?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|err| {
            error!("backend.{operation} body read error: {err}");
            BackendError::Network(err.to_string())
        })?;
        let body: Option<Value> = serde_json::from_slice(&bytes).ok();

        if !(200..300).contains(&status) {
            let message = body
                .as_ref()
                .and_then(|body| body.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string());
            warn!("backend.{operation} rejected with {status}: {message}");
            return Err(BackendError::Application { status, message });
        }

        Ok((status, body))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        builder: RequestBuilder,
        fallback: &'static str,
    ) -> Result<Envelope<T>, BackendError> {
        let (status, body) = self.exchange(operation, builder, fallback).await?;

        let parsed: ResponseBody<T> = match body {
            Some(value) if !value.is_null() => serde_json::from_value(value).map_err(|err| {
                error!("backend.{operation} returned an unexpected shape: {err}");
                BackendError::Decode {
                    status,
                    detail: err.to_string(),
                }
            })?,
            _ => ResponseBody::empty(),
        };

        Ok(Envelope {
            status,
            message: parsed.message,
            data: parsed.data,
        })
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        operation: &'static str,
        method: Method,
        segments: &[&str],
        cookie: Option<&str>,
        body: &B,
        fallback: &'static str,
    ) -> Result<Envelope<T>, BackendError> {
        let builder = self.request(method, self.url(segments), cookie).json(body);
        self.send(operation, builder, fallback).await
    }

    async fn send_empty<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        method: Method,
        segments: &[&str],
        cookie: Option<&str>,
        fallback: &'static str,
    ) -> Result<Envelope<T>, BackendError> {
        let builder = self.request(method, self.url(segments), cookie);
        self.send(operation, builder, fallback).await
    }

    // Session

    /// Resolves the user behind the forwarded cookie; `None` when signed out.
    pub async fn current_user(&self, cookie: Option<&str>) -> Result<Option<User>, BackendError> {
        let Some(cookie) = cookie else {
            return Ok(None);
        };
        let segments: Vec<&str> = self.session_endpoint.iter().map(String::as_str).collect();
        let builder = self.request(Method::GET, self.url(&segments), Some(cookie));

        let body = match self.exchange("current_user", builder, "Session lookup failed").await {
            Ok((_, body)) => body,
            Err(err) if err.is_auth_failure() => return Ok(None),
            Err(err) => return Err(err),
        };

        let user = body
            .filter(|value| !value.is_null())
            .and_then(|value| serde_json::from_value::<SessionBody>(value).ok())
            .and_then(|session| match session {
                SessionBody::Bare(session) => Some(session.user),
                SessionBody::Wrapped { data } => data.map(|session| session.user),
            });
        Ok(user)
    }

    // Catalogue

    pub async fn list_medicines(
        &self,
        query: &MedicineQuery,
    ) -> Result<Envelope<MedicinePage>, BackendError> {
        let pairs = query.to_pairs();
        info!("backend.list_medicines with {} filter(s)", pairs.len());
        let builder = self
            .request(Method::GET, self.url(&["medicines"]), None)
            .query(&pairs);
        self.send("list_medicines", builder, "Something went wrong")
            .await
    }

    pub async fn get_medicine(&self, medicine_id: &str) -> Result<Envelope<Medicine>, BackendError> {
        self.send_empty(
            "get_medicine",
            Method::GET,
            &["medicines", medicine_id],
            None,
            "Something went wrong",
        )
        .await
    }

    // Cart

    pub async fn add_to_cart(
        &self,
        cookie: Option<&str>,
        payload: &AddToCartPayload,
    ) -> Result<Envelope<Value>, BackendError> {
        self.send_json(
            "add_to_cart",
            Method::POST,
            &["cart", "items"],
            cookie,
            payload,
            "Request failed",
        )
        .await
    }

    pub async fn get_cart(&self, cookie: Option<&str>) -> Result<Envelope<Cart>, BackendError> {
        self.send_empty("get_cart", Method::GET, &["cart"], cookie, "Cart not found")
            .await
    }

    // Orders

    pub async fn create_order(
        &self,
        cookie: Option<&str>,
        payload: &CreateOrderPayload,
    ) -> Result<Envelope<Order>, BackendError> {
        self.send_json(
            "create_order",
            Method::POST,
            &["orders"],
            cookie,
            payload,
            "Failed to create order",
        )
        .await
    }

    pub async fn list_orders(&self, cookie: Option<&str>) -> Result<Envelope<Vec<Order>>, BackendError> {
        self.send_empty(
            "list_orders",
            Method::GET,
            &["orders"],
            cookie,
            "Failed to fetch orders",
        )
        .await
    }

    pub async fn get_order(
        &self,
        cookie: Option<&str>,
        order_id: &str,
    ) -> Result<Envelope<Order>, BackendError> {
        self.send_empty(
            "get_order",
            Method::GET,
            &["orders", order_id],
            cookie,
            "Failed to fetch order",
        )
        .await
    }

    pub async fn cancel_order(
        &self,
        cookie: Option<&str>,
        order_id: &str,
    ) -> Result<Envelope<Order>, BackendError> {
        self.send_empty(
            "cancel_order",
            Method::PATCH,
            &["orders", order_id, "cancel"],
            cookie,
            "Failed to cancel order",
        )
        .await
    }

    pub async fn order_status_history(
        &self,
        cookie: Option<&str>,
        order_id: &str,
    ) -> Result<Envelope<Vec<OrderStatusHistory>>, BackendError> {
        self.send_empty(
            "order_status_history",
            Method::GET,
            &["orders", order_id, "status-history"],
            cookie,
            "Failed to fetch order status history",
        )
        .await
    }

    pub async fn delivered_medicines(
        &self,
        cookie: Option<&str>,
    ) -> Result<Envelope<Vec<DeliveredMedicine>>, BackendError> {
        self.send_empty(
            "delivered_medicines",
            Method::GET,
            &["orders", "delivered-medicines"],
            cookie,
            "Could not load delivered medicines",
        )
        .await
    }

    // Profile

    pub async fn get_profile(&self, cookie: Option<&str>) -> Result<Envelope<ProfileData>, BackendError> {
        self.send_empty(
            "get_profile",
            Method::GET,
            &["profile", "me"],
            cookie,
            "Failed to fetch profile",
        )
        .await
    }

    pub async fn update_profile(
        &self,
        cookie: Option<&str>,
        payload: &UpdateProfilePayload,
    ) -> Result<Envelope<ProfileData>, BackendError> {
        self.send_json(
            "update_profile",
            Method::PUT,
            &["profile", "me"],
            cookie,
            payload,
            "Failed to update profile",
        )
        .await
    }

    pub async fn change_password(
        &self,
        cookie: Option<&str>,
        payload: &ChangePasswordPayload,
    ) -> Result<Envelope<Value>, BackendError> {
        self.send_json(
            "change_password",
            Method::PATCH,
            &["profile", "me", "password"],
            cookie,
            payload,
            "Failed to change password",
        )
        .await
    }

    // Reviews

    pub async fn create_review(
        &self,
        cookie: Option<&str>,
        medicine_id: &str,
        payload: &CreateReviewPayload,
    ) -> Result<Envelope<CreatedReview>, BackendError> {
        self.send_json(
            "create_review",
            Method::POST,
            &["reviews", "medicines", medicine_id],
            cookie,
            payload,
            "Could not create review",
        )
        .await
    }

    pub async fn reviews_by_medicine(
        &self,
        medicine_id: &str,
    ) -> Result<Envelope<ReviewList>, BackendError> {
        self.send_empty(
            "reviews_by_medicine",
            Method::GET,
            &["reviews", "medicines", medicine_id],
            None,
            "Could not load reviews",
        )
        .await
    }

    pub async fn reviews_by_user(
        &self,
        cookie: Option<&str>,
        user_id: &str,
    ) -> Result<Envelope<ReviewList>, BackendError> {
        self.send_empty(
            "reviews_by_user",
            Method::GET,
            &["reviews", "users", user_id],
            cookie,
            "Could not load reviews",
        )
        .await
    }

    pub async fn delete_review(
        &self,
        cookie: Option<&str>,
        review_id: &str,
    ) -> Result<Envelope<Value>, BackendError> {
        self.send_empty(
            "delete_review",
            Method::DELETE,
            &["reviews", review_id],
            cookie,
            "Could not delete review",
        )
        .await
    }
}
