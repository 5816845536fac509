use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::info;

use super::{cached, mutate, page_data, ActionResult};
use crate::{
    cache::{Mutation, ViewKey},
    error::{ApiError, ErrorResponse},
    models::{CreatedReview, DeliveredMedicine, ReviewList},
    reviews::{pending_reviews, ReviewForm},
    session::{CurrentUser, Session},
    state::AppState,
    views::ReviewsHubView,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reviews", get(reviews_hub))
        .route("/reviews/medicines/:id", post(create_review))
        .route("/reviews/:id", delete(delete_review))
}

/// Delivered medicines awaiting a review, plus the user's reviews
#[utoipa::path(
    get,
    path = "/reviews",
    tag = "Reviews",
    responses(
        (status = 200, description = "Reviews hub", body = ReviewsHubView),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    )
)]
pub async fn reviews_hub(
    State(state): State<AppState>,
    CurrentUser { user, session }: CurrentUser,
) -> Result<Json<ReviewsHubView>, ApiError> {
    info!("GET /reviews - user: {}", user.id);
    let (delivered, reviews) = futures::future::join(
        cached(&state, &session, ViewKey::DeliveredMedicines, || async {
            Ok::<Vec<DeliveredMedicine>, ApiError>(
                state
                    .backend
                    .delivered_medicines(session.cookie())
                    .await?
                    .into_data()
                    .unwrap_or_default(),
            )
        }),
        cached(&state, &session, ViewKey::UserReviews, || async {
            Ok::<ReviewList, ApiError>(
                state
                    .backend
                    .reviews_by_user(session.cookie(), &user.id)
                    .await?
                    .into_data()
                    .unwrap_or_default(),
            )
        }),
    )
    .await;
    let reviews = reviews?.reviews;
    let pending = pending_reviews(delivered?, &reviews);

    info!(
        "GET /reviews - {} pending, {} written",
        pending.len(),
        reviews.len()
    );
    Ok(Json(ReviewsHubView { pending, reviews }))
}

#[utoipa::path(
    post,
    path = "/reviews/medicines/{id}",
    tag = "Reviews",
    params(("id" = String, Path, description = "Medicine id")),
    request_body = ReviewForm,
    responses(
        (status = 201, description = "Review created", body = CreatedReview),
        (status = 404, description = "Unknown medicine", body = ErrorResponse),
        (status = 422, description = "Invalid rating or comment", body = ErrorResponse)
    )
)]
pub async fn create_review(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(form): Json<ReviewForm>,
) -> Result<(StatusCode, Json<CreatedReview>), ApiError> {
    info!("POST /reviews/medicines/{id}");
    let payload = form.into_payload()?;
    let scope = session.require_scope()?;

    let medicine = page_data(state.backend.get_medicine(&id).await, "medicine")?;
    let created = mutate(
        &state,
        scope,
        Mutation::CreateReview {
            medicine_id: medicine.id.clone(),
        },
        state.backend.create_review(session.cookie(), &medicine.id, &payload),
    )
    .await?
    .into_data()
    .ok_or_else(|| ApiError::Decode("review creation returned no review".into()))?;

    info!("POST /reviews/medicines/{id} - review {}", created.review.id);
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    tag = "Reviews",
    params(("id" = String, Path, description = "Review id")),
    responses(
        (status = 200, description = "Review deleted", body = ActionResult),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    )
)]
pub async fn delete_review(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<ActionResult>, ApiError> {
    info!("DELETE /reviews/{id}");
    let scope = session.require_scope()?;

    let envelope = mutate(
        &state,
        scope,
        Mutation::DeleteReview {
            review_id: id.clone(),
        },
        state.backend.delete_review(session.cookie(), &id),
    )
    .await?;
    Ok(Json(ActionResult::from_envelope(&envelope, "Review deleted")))
}
