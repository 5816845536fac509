use reqwest::Url;
use std::env;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_SESSION_COOKIE: &str = "better-auth.session_token";
const DEFAULT_SESSION_ENDPOINT: &str = "/auth/get-session";
const DEFAULT_VIEW_CACHE_TTL: u64 = 60;
const DEFAULT_REQUEST_TIMEOUT: u64 = 30;
const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub backend: BackendConfig,
    pub session: SessionConfig,
    pub cache: CacheConfig,
    pub request_timeout: Duration,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: Url,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub endpoint: String,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let backend_url =
            env::var("BACKEND_API_URL").map_err(|_| ConfigError::Missing("BACKEND_API_URL"))?;
        let base_url = parse_backend_url(&backend_url)?;

        let cookie_name =
            env::var("SESSION_COOKIE_NAME").unwrap_or_else(|_| DEFAULT_SESSION_COOKIE.into());
        let endpoint =
            env::var("SESSION_ENDPOINT").unwrap_or_else(|_| DEFAULT_SESSION_ENDPOINT.into());

        let ttl = seconds_var("VIEW_CACHE_TTL_SECONDS").unwrap_or(DEFAULT_VIEW_CACHE_TTL);
        let request_timeout =
            seconds_var("REQUEST_TIMEOUT_SECONDS").unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        // Derive CORS origins from FRONTEND_ORIGIN if not explicitly set
        let frontend_origin =
            env::var("FRONTEND_ORIGIN").unwrap_or_else(|_| DEFAULT_FRONTEND_ORIGIN.to_string());
        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or(frontend_origin)
            .split(',')
            .filter(|origin| !origin.trim().is_empty())
            .map(|origin| origin.trim().to_string())
            .collect::<Vec<_>>();

        Ok(Self {
            host,
            port,
            backend: BackendConfig { base_url },
            session: SessionConfig {
                cookie_name,
                endpoint,
            },
            cache: CacheConfig {
                ttl: Duration::from_secs(ttl),
            },
            request_timeout: Duration::from_secs(request_timeout.max(1)),
            cors: CorsConfig { allowed_origins },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn parse_backend_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim())
        .map_err(|error| ConfigError::Invalid("BACKEND_API_URL", error.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::Invalid(
            "BACKEND_API_URL",
            format!("{value} cannot be used as a base url"),
        ));
    }
    Ok(url)
}

fn seconds_var(name: &str) -> Option<u64> {
    env::var(name).ok().and_then(|value| value.trim().parse::<u64>().ok())
}
