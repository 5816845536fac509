pub mod cart;
pub mod health;
pub mod orders;
pub mod profile;
pub mod reviews;
pub mod shop;

use axum::{
    error_handling::HandleErrorLayer,
    http::{header, Method},
    Router,
};
use serde::{de::DeserializeOwned, Serialize};
use std::{future::Future, time::Instant};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::{debug, error, info};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    backend::{BackendError, Envelope},
    cache::{Mutation, ViewKey},
    config::AppConfig,
    docs::ApiDoc,
    error::{handle_global_error, ApiError},
    session::Session,
    state::AppState,
};

pub fn router(state: AppState, config: &AppConfig) -> Router {
    let origins: Vec<_> = config
        .cors
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    Router::new()
        .merge(health::routes())
        .merge(shop::routes())
        .merge(cart::routes())
        .merge(orders::routes())
        .merge(profile::routes())
        .merge(reviews::routes())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_global_error))
                .timeout(config.request_timeout),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
                .allow_credentials(true),
        )
}

/// Acknowledgement for mutations that have nothing else to render.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResult {
    pub message: String,
}

impl ActionResult {
    pub fn from_envelope<T>(envelope: &Envelope<T>, fallback: &str) -> Self {
        Self {
            message: envelope
                .message
                .clone()
                .unwrap_or_else(|| fallback.to_string()),
        }
    }
}

/// Page-level read: an absent payload or a backend 404 renders as not-found.
pub(crate) fn page_data<T>(
    result: Result<Envelope<T>, BackendError>,
    resource: &'static str,
) -> Result<T, ApiError> {
    match result {
        Ok(envelope) => envelope.into_data().ok_or(ApiError::NotFound(resource)),
        Err(BackendError::Application { status: 404, .. }) => Err(ApiError::NotFound(resource)),
        Err(err) => Err(err.into()),
    }
}

/// Serves a view from the session's cache, loading and storing it on a miss.
/// Anonymous callers always hit the backend.
pub(crate) async fn cached<T, F, Fut>(
    state: &AppState,
    session: &Session,
    key: ViewKey,
    load: F,
) -> Result<T, ApiError>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let Some(scope) = session.scope.as_deref() else {
        return load().await;
    };
    if let Some(view) = state.cache.get::<T>(scope, &key) {
        debug!("serving {key:?} from cache");
        return Ok(view);
    }
    let loaded_since = Instant::now();
    let view = load().await?;
    state.cache.put(scope, key, &view, loaded_since);
    Ok(view)
}

/// Runs one backend mutation for the session: at most one of each action per
/// target record in flight, invalidation on success, nothing touched on failure.
pub(crate) async fn mutate<T, Fut>(
    state: &AppState,
    scope: &str,
    mutation: Mutation,
    call: Fut,
) -> Result<Envelope<T>, ApiError>
where
    Fut: Future<Output = Result<Envelope<T>, BackendError>>,
{
    let action = mutation.action();
    let _ticket = state
        .guard
        .acquire(scope, &mutation.guard_key())
        .ok_or_else(|| ApiError::Conflict("A previous request is still in progress".into()))?;

    match call.await {
        Ok(envelope) => {
            let invalidated = state.cache.invalidate(scope, &mutation);
            info!(
                "{action} succeeded with {} ({invalidated} cached view(s) dropped)",
                envelope.status
            );
            Ok(envelope)
        }
        Err(err) => {
            error!("{action} failed ({}): {}", err.status(), err.message());
            Err(err.into())
        }
    }
}
