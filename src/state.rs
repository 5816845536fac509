use crate::{backend::BackendClient, cache::ViewCache, config::AppConfig, guard::SubmissionGuard};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub backend: BackendClient,
    pub cache: Arc<ViewCache>,
    pub guard: SubmissionGuard,
    pub session_cookie: String,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            backend: BackendClient::new(config.backend.base_url.clone(), &config.session.endpoint),
            cache: Arc::new(ViewCache::new(config.cache.ttl)),
            guard: SubmissionGuard::new(),
            session_cookie: config.session.cookie_name.clone(),
        }
    }
}
