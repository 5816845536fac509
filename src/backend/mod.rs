//! Outbound calls to the storefront REST API.
//!
//! Every call resolves to either an [`Envelope`] (2xx) or a [`BackendError`]
//! that separates transport failures (status 0) from HTTP-level rejections.

mod client;

pub use client::BackendClient;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("network error: {0}")]
    Network(String),
    #[error("backend rejected request ({status}): {message}")]
    Application { status: u16, message: String },
    #[error("could not decode backend response ({status}): {detail}")]
    Decode { status: u16, detail: String },
}

impl BackendError {
    /// HTTP status of the failure; `0` when the request never completed.
    pub fn status(&self) -> u16 {
        match self {
            BackendError::Network(_) => 0,
            BackendError::Application { status, .. } | BackendError::Decode { status, .. } => {
                *status
            }
        }
    }

    /// Human-readable message suitable for a notification.
    pub fn message(&self) -> &str {
        match self {
            BackendError::Network(_) => "Network error",
            BackendError::Application { message, .. } => message,
            BackendError::Decode { .. } => "Unexpected response from backend",
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status(), 401 | 403)
    }
}

/// Successful backend response.
#[derive(Debug, Clone)]
pub struct Envelope<T> {
    pub status: u16,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

/// Wire shape shared by every backend endpoint: `{ message?, data? }`.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ResponseBody<T> {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<T>,
}

impl<T> ResponseBody<T> {
    fn empty() -> Self {
        Self {
            message: None,
            data: None,
        }
    }
}
