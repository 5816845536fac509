use axum::{
    extract::State,
    routing::{get, patch},
    Json, Router,
};
use tracing::info;

use super::{cached, mutate, page_data, ActionResult};
use crate::{
    cache::{Mutation, ViewKey},
    error::{ApiError, ErrorResponse},
    models::ProfileData,
    profile::{PasswordForm, ProfileForm},
    session::Session,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/profile/password", patch(change_password))
}

#[utoipa::path(
    get,
    path = "/profile",
    tag = "Profile",
    responses(
        (status = 200, description = "Profile of the signed-in user", body = ProfileData),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<ProfileData>, ApiError> {
    info!("GET /profile");
    let profile = cached(&state, &session, ViewKey::Profile, || async {
        page_data(state.backend.get_profile(session.cookie()).await, "profile")
    })
    .await?;
    Ok(Json(profile))
}

#[utoipa::path(
    put,
    path = "/profile",
    tag = "Profile",
    request_body = ProfileForm,
    responses(
        (status = 200, description = "Updated profile", body = ProfileData),
        (status = 422, description = "Invalid name or phone", body = ErrorResponse)
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<ProfileForm>,
) -> Result<Json<ProfileData>, ApiError> {
    info!("PUT /profile");
    let payload = form.into_payload()?;
    let scope = session.require_scope()?;

    let profile = mutate(
        &state,
        scope,
        Mutation::UpdateProfile,
        state.backend.update_profile(session.cookie(), &payload),
    )
    .await?
    .into_data()
    .ok_or_else(|| ApiError::Decode("profile update returned no profile".into()))?;
    Ok(Json(profile))
}

#[utoipa::path(
    patch,
    path = "/profile/password",
    tag = "Profile",
    request_body = PasswordForm,
    responses(
        (status = 200, description = "Password changed", body = ActionResult),
        (status = 422, description = "Password rules not met", body = ErrorResponse)
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<PasswordForm>,
) -> Result<Json<ActionResult>, ApiError> {
    info!("PATCH /profile/password");
    let payload = form.into_payload()?;
    let scope = session.require_scope()?;

    let envelope = mutate(
        &state,
        scope,
        Mutation::ChangePassword,
        state.backend.change_password(session.cookie(), &payload),
    )
    .await?;
    Ok(Json(ActionResult::from_envelope(
        &envelope,
        "Password changed successfully",
    )))
}
