//! Error types for trakt-list-sync.

use thiserror::Error;

use crate::auth::AuthError;

/// Primary error type for a sync run. Every variant aborts the run.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthError),

    #[error("Trakt API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Radarr server error - response {status}")]
    LocalServer { status: u16 },

    #[error("Could not find the list \"{0}\"")]
    ListNotFound(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SyncError {
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    /// True when the run failed before any credentials could be obtained.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
