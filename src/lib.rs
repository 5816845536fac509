pub mod backend;
pub mod cache;
pub mod cancellation;
pub mod checkout;
pub mod config;
pub mod docs;
pub mod error;
pub mod guard;
pub mod models;
pub mod profile;
pub mod reviews;
pub mod routes;
pub mod session;
pub mod state;
pub mod status;
pub mod tracking;
pub mod validation;
pub mod views;

use axum::Router;

use crate::{config::AppConfig, state::AppState};

/// Builds the full application router for the given configuration.
pub fn app(config: &AppConfig) -> Router {
    routes::router(AppState::new(config), config)
}
