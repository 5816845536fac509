use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use tracing::info;
use validator::Validate;

use super::{cached, mutate, ActionResult};
use crate::{
    cache::{Mutation, ViewKey},
    checkout::{CheckoutForm, CheckoutView},
    error::{ApiError, ErrorResponse},
    models::{AddToCartPayload, Cart},
    session::Session,
    state::AppState,
    validation::FieldErrors,
    views::OrderDetailView,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(get_cart))
        .route("/cart/items", post(add_to_cart))
        .route("/checkout", get(checkout_page).post(place_order))
}

async fn load_cart(state: &AppState, session: &Session) -> Result<Cart, ApiError> {
    cached(state, session, ViewKey::Cart, || async {
        Ok::<_, ApiError>(state
            .backend
            .get_cart(session.cookie())
            .await?
            .into_data()
            .unwrap_or_default())
    })
    .await
}

#[utoipa::path(
    get,
    path = "/cart",
    tag = "Cart",
    responses(
        (status = 200, description = "Current cart", body = Cart),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    )
)]
pub async fn get_cart(State(state): State<AppState>, session: Session) -> Result<Json<Cart>, ApiError> {
    info!("GET /cart");
    Ok(Json(load_cart(&state, &session).await?))
}

#[utoipa::path(
    post,
    path = "/cart/items",
    tag = "Cart",
    request_body = AddToCartPayload,
    responses(
        (status = 201, description = "Item added", body = ActionResult),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 422, description = "Invalid item", body = ErrorResponse)
    )
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<AddToCartPayload>,
) -> Result<(StatusCode, Json<ActionResult>), ApiError> {
    info!(
        "POST /cart/items - medicine: {}, quantity: {}",
        payload.medicine_id, payload.quantity
    );
    payload.validate().map_err(FieldErrors::from)?;
    let scope = session.require_scope()?;

    let envelope = mutate(
        &state,
        scope,
        Mutation::AddToCart,
        state.backend.add_to_cart(session.cookie(), &payload),
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(ActionResult::from_envelope(&envelope, "Added to cart")),
    ))
}

#[utoipa::path(
    get,
    path = "/checkout",
    tag = "Checkout",
    responses(
        (status = 200, description = "Checkout summary", body = CheckoutView),
        (status = 303, description = "Cart is empty; redirects to /cart")
    )
)]
pub async fn checkout_page(State(state): State<AppState>, session: Session) -> Result<Response, ApiError> {
    info!("GET /checkout");
    let cart = load_cart(&state, &session).await?;
    match CheckoutView::for_cart(cart) {
        Some(view) => Ok(Json(view).into_response()),
        None => {
            info!("GET /checkout - cart is empty, redirecting to /cart");
            Ok(Redirect::to("/cart").into_response())
        }
    }
}

/// Turn the cart into an order
#[utoipa::path(
    post,
    path = "/checkout",
    tag = "Checkout",
    request_body = CheckoutForm,
    responses(
        (status = 201, description = "Order created", body = OrderDetailView),
        (status = 409, description = "An order submission is already in flight", body = ErrorResponse),
        (status = 422, description = "Invalid shipping details", body = ErrorResponse)
    )
)]
pub async fn place_order(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<CheckoutForm>,
) -> Result<(StatusCode, Json<OrderDetailView>), ApiError> {
    info!("POST /checkout");
    let payload = form.into_payload()?;
    let scope = session.require_scope()?;

    let order = mutate(
        &state,
        scope,
        Mutation::CreateOrder,
        state.backend.create_order(session.cookie(), &payload),
    )
    .await?
    .into_data()
    .ok_or_else(|| ApiError::Decode("order creation returned no order".into()))?;

    info!("POST /checkout - created order {}", order.id);
    Ok((StatusCode::CREATED, Json(OrderDetailView::of(order))))
}
