use axum::{http::StatusCode, response::IntoResponse, BoxError, Json};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tower::timeout::error::Elapsed;
use tracing::error;
use utoipa::ToSchema;

use crate::backend::BackendError;
use crate::validation::FieldErrors;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("authentication required")]
    Unauthorized,
    #[error("{0}")]
    Conflict(String),
    #[error("this action must be confirmed")]
    ConfirmationRequired,
    #[error("{message}")]
    Backend { status: u16, message: String },
    #[error("Network error")]
    Network(String),
    #[error("unexpected response from backend")]
    Decode(String),
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub not_found: bool,
}

impl ErrorResponse {
    fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fields: None,
            not_found: false,
        }
    }
}

impl From<BackendError> for ApiError {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::Network(detail) => ApiError::Network(detail),
            BackendError::Application { status, message } => ApiError::Backend { status, message },
            BackendError::Decode { detail, .. } => ApiError::Decode(detail),
        }
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::ConfirmationRequired => StatusCode::PRECONDITION_REQUIRED,
            ApiError::Backend { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|code| code.is_client_error() || code.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            ApiError::Network(_) | ApiError::Decode(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        let body = match self {
            ApiError::Validation(fields) => ErrorResponse {
                error: "validation failed".into(),
                fields: Some(fields.into_inner()),
                not_found: false,
            },
            ApiError::NotFound(resource) => ErrorResponse {
                error: format!("{resource} not found"),
                fields: None,
                not_found: true,
            },
            ApiError::Network(detail) => {
                error!("backend unreachable: {detail}");
                ErrorResponse::message("Network error")
            }
            ApiError::Decode(detail) => {
                error!("backend response could not be decoded: {detail}");
                ErrorResponse::message("Unexpected response from backend")
            }
            other => ErrorResponse::message(other.to_string()),
        };

        (status, Json(body)).into_response()
    }
}

pub async fn handle_global_error(error: BoxError) -> impl IntoResponse {
    if error.is::<Elapsed>() {
        error!("request timed out: {error}");
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(ErrorResponse::message("request timed out")),
        )
    } else {
        error!("unhandled internal error: {error}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::message("internal server error")),
        )
    }
}
