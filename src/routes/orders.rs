use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, warn};

use super::{cached, mutate, page_data};
use crate::{
    cache::{Mutation, ViewKey},
    cancellation::{ensure_cancellable, require_confirmation, CancelRequest},
    error::{ApiError, ErrorResponse},
    models::{Order, OrderStatusHistory},
    session::Session,
    state::AppState,
    tracking::build_timeline,
    views::{OrderDetailView, OrderSummaryView, TrackingView},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/track", get(track_order))
        .route("/orders/:id/cancel", post(cancel_order))
}

async fn load_order(state: &AppState, session: &Session, id: &str) -> Result<Order, ApiError> {
    cached(state, session, ViewKey::Order(id.to_string()), || async {
        page_data(state.backend.get_order(session.cookie(), id).await, "order")
    })
    .await
}

async fn load_history(
    state: &AppState,
    session: &Session,
    id: &str,
) -> Result<Vec<OrderStatusHistory>, ApiError> {
    cached(state, session, ViewKey::OrderHistory(id.to_string()), || async {
        Ok::<_, ApiError>(
            state
                .backend
                .order_status_history(session.cookie(), id)
                .await?
                .into_data()
                .unwrap_or_default(),
        )
    })
    .await
}

/// List the shopper's orders
#[utoipa::path(
    get,
    path = "/orders",
    tag = "Orders",
    responses(
        (status = 200, description = "Order summaries", body = Vec<OrderSummaryView>),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    )
)]
pub async fn list_orders(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<OrderSummaryView>>, ApiError> {
    info!("GET /orders");
    let orders: Vec<Order> = cached(&state, &session, ViewKey::Orders, || async {
        Ok::<_, ApiError>(
            state
                .backend
                .list_orders(session.cookie())
                .await?
                .into_data()
                .unwrap_or_default(),
        )
    })
    .await?;

    info!("GET /orders - returning {} orders", orders.len());
    Ok(Json(orders.iter().map(OrderSummaryView::of).collect()))
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "Orders",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order detail", body = OrderDetailView),
        (status = 404, description = "Order not found", body = ErrorResponse)
    )
)]
pub async fn get_order(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<OrderDetailView>, ApiError> {
    info!("GET /orders/{id}");
    let order = load_order(&state, &session, &id).await?;
    Ok(Json(OrderDetailView::of(order)))
}

/// Tracking timeline for one order
#[utoipa::path(
    get,
    path = "/orders/{id}/track",
    tag = "Orders",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Timeline view", body = TrackingView),
        (status = 404, description = "Order not found", body = ErrorResponse)
    )
)]
pub async fn track_order(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<TrackingView>, ApiError> {
    info!("GET /orders/{id}/track");
    let (order, history) = futures::future::join(
        load_order(&state, &session, &id),
        load_history(&state, &session, &id),
    )
    .await;
    let order = order?;

    let (history, history_available) = match history {
        Ok(history) => (history, true),
        Err(err) => {
            warn!("GET /orders/{id}/track - history unavailable, using embedded history: {err}");
            (order.status_history.clone().unwrap_or_default(), false)
        }
    };

    Ok(Json(TrackingView {
        order_id: order.id.clone(),
        reference: order.reference(),
        timeline: build_timeline(&order.status, &history),
        history_available,
    }))
}

/// Cancel a placed order
#[utoipa::path(
    post,
    path = "/orders/{id}/cancel",
    tag = "Orders",
    params(("id" = String, Path, description = "Order id")),
    request_body = CancelRequest,
    responses(
        (status = 200, description = "Order cancelled", body = OrderDetailView),
        (status = 404, description = "Order not found", body = ErrorResponse),
        (status = 409, description = "Order is past PLACED, or a cancellation is in flight", body = ErrorResponse),
        (status = 428, description = "Cancellation was not confirmed", body = ErrorResponse)
    )
)]
pub async fn cancel_order(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    request: Option<Json<CancelRequest>>,
) -> Result<Json<OrderDetailView>, ApiError> {
    info!("POST /orders/{id}/cancel");
    let request = request.map(|Json(request)| request).unwrap_or_default();
    require_confirmation(&request)?;
    let scope = session.require_scope()?;

    let current = page_data(state.backend.get_order(session.cookie(), &id).await, "order")?;
    ensure_cancellable(&current.status)?;

    let cancelled = mutate(
        &state,
        scope,
        Mutation::CancelOrder {
            order_id: id.clone(),
        },
        state.backend.cancel_order(session.cookie(), &id),
    )
    .await?
    .into_data();

    let order = match cancelled {
        Some(order) => order,
        None => page_data(state.backend.get_order(session.cookie(), &id).await, "order")?,
    };
    info!("POST /orders/{id}/cancel - order is now {}", order.status);
    Ok(Json(OrderDetailView::of(order)))
}
