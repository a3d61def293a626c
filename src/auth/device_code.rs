use std::time::Duration;

use serde::Deserialize;

use super::error::AuthError;
use super::token::TokenGrant;

/// Device-code session as issued by `/oauth/device/code`.
///
/// `issued_at` is local clock time (seconds since epoch) taken right after the
/// code was received; the polling deadline counts from there.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceCodeSession {
    pub device_code: String,
    pub user_code: String,
    pub verification_url: String,
    pub interval_secs: u64,
    pub expires_in_secs: u64,
    pub issued_at: f64,
}

impl DeviceCodeSession {
    pub fn from_response(response: DeviceCodeResponse, issued_at: f64) -> Self {
        Self {
            device_code: response.device_code,
            user_code: response.user_code,
            verification_url: response.verification_url,
            interval_secs: response.interval,
            expires_in_secs: response.expires_in,
            issued_at,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn deadline(&self) -> f64 {
        self.issued_at + self.expires_in_secs as f64
    }

    pub fn is_past_deadline(&self, now: f64) -> bool {
        now >= self.deadline()
    }
}

/// Wire shape of the device-code response.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceCodeResponse {
    pub device_code: String,
    pub user_code: String,
    pub verification_url: String,
    pub expires_in: u64,
    pub interval: u64,
}

/// Classified outcome of one `/oauth/device/token` poll.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCodePoll {
    Authorized { grant: TokenGrant },
    /// 400: the user has not approved yet.
    Pending,
    /// 429: polling too quickly.
    SlowDown,
    /// 404: invalid device code.
    NotFound,
    /// 409: code already approved.
    AlreadyUsed,
    /// 410: code expired.
    Expired,
    /// 418: user denied the code.
    Denied,
}

impl DeviceCodePoll {
    /// Classify a non-success poll status. 200 needs a body and is handled by the caller.
    pub fn from_status(status: u16, body: &str) -> Result<Self, AuthError> {
        match status {
            400 => Ok(Self::Pending),
            429 => Ok(Self::SlowDown),
            404 => Ok(Self::NotFound),
            409 => Ok(Self::AlreadyUsed),
            410 => Ok(Self::Expired),
            418 => Ok(Self::Denied),
            other => Err(AuthError::UnexpectedStatus {
                status: other,
                body: body.to_string(),
            }),
        }
    }

    /// Terminal failure carried by this outcome, if any.
    pub fn into_terminal_error(self) -> Option<AuthError> {
        match self {
            Self::NotFound => Some(AuthError::NotFound),
            Self::AlreadyUsed => Some(AuthError::AlreadyUsed),
            Self::Expired => Some(AuthError::Expired),
            Self::Denied => Some(AuthError::Denied),
            Self::Authorized { .. } | Self::Pending | Self::SlowDown => None,
        }
    }
}
