use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::info;

use super::page_data;
use crate::{
    error::{ApiError, ErrorResponse},
    models::{Medicine, MedicinePage, MedicineQuery, ReviewList},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shop", get(list_medicines))
        .route("/shop/:id", get(get_medicine))
        .route("/shop/:id/reviews", get(medicine_reviews))
}

/// Browse the catalogue
#[utoipa::path(
    get,
    path = "/shop",
    tag = "Shop",
    params(MedicineQuery),
    responses(
        (status = 200, description = "One page of medicines", body = MedicinePage),
        (status = 502, description = "Backend unreachable", body = ErrorResponse)
    )
)]
pub async fn list_medicines(
    State(state): State<AppState>,
    Query(query): Query<MedicineQuery>,
) -> Result<Json<MedicinePage>, ApiError> {
    info!("GET /shop - search: {:?}", query.search);
    let page = state
        .backend
        .list_medicines(&query)
        .await?
        .into_data()
        .unwrap_or_default();
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/shop/{id}",
    tag = "Shop",
    params(("id" = String, Path, description = "Medicine id")),
    responses(
        (status = 200, description = "Medicine detail", body = Medicine),
        (status = 404, description = "No such medicine", body = ErrorResponse)
    )
)]
pub async fn get_medicine(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Medicine>, ApiError> {
    info!("GET /shop/{id}");
    let medicine = page_data(state.backend.get_medicine(&id).await, "medicine")?;
    Ok(Json(medicine))
}

#[utoipa::path(
    get,
    path = "/shop/{id}/reviews",
    tag = "Shop",
    params(("id" = String, Path, description = "Medicine id")),
    responses(
        (status = 200, description = "Reviews and rating summary", body = ReviewList),
        (status = 404, description = "No such medicine", body = ErrorResponse)
    )
)]
pub async fn medicine_reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReviewList>, ApiError> {
    info!("GET /shop/{id}/reviews");
    let reviews = page_data(state.backend.reviews_by_medicine(&id).await, "medicine")?;
    Ok(Json(reviews))
}
