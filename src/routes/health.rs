use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::{
    error::ApiError,
    session::{Session, SessionView},
    state::AppState,
};

#[derive(Serialize, ToSchema)]
pub struct Health {
    #[schema(value_type = String, example = "ok")]
    pub status: &'static str,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/session", get(current_session))
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Server is up", body = Health))
)]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Resolve the signed-in user and their navigation menu
#[utoipa::path(
    get,
    path = "/session",
    tag = "Session",
    responses(
        (status = 200, description = "Session view; anonymous visitors get the base menu", body = SessionView),
        (status = 502, description = "Backend unreachable", body = crate::error::ErrorResponse)
    )
)]
pub async fn current_session(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<SessionView>, ApiError> {
    let user = state.backend.current_user(session.cookie()).await?;
    info!(
        "GET /session - {}",
        user.as_ref()
            .map(|user| format!("user: {} ({})", user.id, user.role))
            .unwrap_or_else(|| "anonymous".to_string())
    );
    Ok(Json(SessionView::for_user(user)))
}
