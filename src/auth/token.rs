use serde::Deserialize;
use serde_json::{json, Value};

use super::error::AuthError;
use super::store::TokenStore;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const ACCESS_TOKEN_EXPIRES_KEY: &str = "access_token_expires";

/// Subtracted from the server-declared lifetime before recording an expiry.
pub const EXPIRY_SAFETY_MARGIN_SECS: f64 = 14.0 * 24.0 * 3600.0;

/// Credential record as persisted in a [`TokenStore`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Credential {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    /// Seconds since the Unix epoch, already reduced by the safety margin.
    pub access_token_expires: Option<f64>,
}

impl Credential {
    pub fn read(store: &dyn TokenStore) -> Self {
        Self {
            access_token: read_string(store, ACCESS_TOKEN_KEY),
            refresh_token: read_string(store, REFRESH_TOKEN_KEY),
            access_token_expires: store.get(ACCESS_TOKEN_EXPIRES_KEY).and_then(as_seconds),
        }
    }

    /// Access token usable at `now`, if one is stored with a future expiry.
    pub fn valid_access_token(&self, now: f64) -> Option<&str> {
        let token = self.access_token.as_deref().filter(|t| !t.is_empty())?;
        match self.access_token_expires {
            Some(expires) if expires > now => Some(token),
            _ => None,
        }
    }

    pub fn usable_refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Token triple returned by the refresh endpoint and by a successful device poll.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
}

impl TokenGrant {
    pub fn expires_at(&self, now: f64) -> f64 {
        now + self.expires_in as f64 - EXPIRY_SAFETY_MARGIN_SECS
    }

    /// Persist the grant one field at a time and return the recorded credential.
    pub fn persist(&self, store: &dyn TokenStore, now: f64) -> Result<Credential, AuthError> {
        let expires = self.expires_at(now);
        store.set(ACCESS_TOKEN_KEY, json!(self.access_token))?;
        store.set(REFRESH_TOKEN_KEY, json!(self.refresh_token))?;
        store.set(ACCESS_TOKEN_EXPIRES_KEY, json!(expires))?;
        Ok(Credential {
            access_token: Some(self.access_token.clone()),
            refresh_token: Some(self.refresh_token.clone()),
            access_token_expires: Some(expires),
        })
    }
}

fn read_string(store: &dyn TokenStore, key: &str) -> Option<String> {
    match store.get(key)? {
        Value::String(s) => Some(s),
        _ => None,
    }
}

// Older state files may carry the expiry as a string.
fn as_seconds(value: Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
