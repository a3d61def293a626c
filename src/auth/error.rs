use thiserror::Error;

/// Failures of the Trakt OAuth lifecycle.
///
/// Pending approval and rate limiting never surface here; the authenticator
/// absorbs them by waiting and polling again.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Not found: invalid device code")]
    NotFound,
    #[error("Already used: this device code was already approved")]
    AlreadyUsed,
    #[error("Expired: the device code expired, restart the authorization")]
    Expired,
    #[error("Denied: the user explicitly denied this device code")]
    Denied,
    #[error("Authorization deadline of {expires_in_secs}s exceeded, restart the authorization")]
    DeadlineExceeded { expires_in_secs: u64 },
    #[error("Unexpected OAuth response (status {status}): {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("Invalid header value for {0}")]
    InvalidHeader(&'static str),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

impl From<std::io::Error> for AuthError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}
