use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;

use super::device_code::{DeviceCodePoll, DeviceCodeResponse};
use super::error::AuthError;
use super::token::TokenGrant;

pub const DEFAULT_API_URL: &str = "https://api.trakt.tv";
pub const TRAKT_API_VERSION: &str = "2";
const OOB_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

/// Result of exchanging a refresh token.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Granted(TokenGrant),
    /// The service refused the refresh token (revoked or already rotated).
    Rejected { status: u16 },
}

/// The three OAuth endpoints the authenticator talks to.
#[async_trait]
pub trait OAuthTransport: Send + Sync {
    async fn request_device_code(&self) -> Result<DeviceCodeResponse, AuthError>;
    async fn poll_device_token(&self, device_code: &str) -> Result<DeviceCodePoll, AuthError>;
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshOutcome, AuthError>;
}

/// Trakt OAuth endpoints over HTTP.
///
/// # Example
/// ```no_run
/// use trakt_list_sync::auth::TraktOAuthClient;
///
/// let oauth = TraktOAuthClient::new("client-id", "client-secret")
///     .with_api_url("https://api.trakt.tv");
/// ```
#[derive(Debug, Clone)]
pub struct TraktOAuthClient {
    client: reqwest::Client,
    api_url: String,
    client_id: String,
    client_secret: String,
}

impl TraktOAuthClient {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: DEFAULT_API_URL.to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl OAuthTransport for TraktOAuthClient {
    async fn request_device_code(&self) -> Result<DeviceCodeResponse, AuthError> {
        tracing::debug!("requesting device code");
        let resp = self
            .client
            .post(self.endpoint("oauth/device/code"))
            .json(&DeviceCodeRequest {
                client_id: &self.client_id,
            })
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AuthError::UnexpectedStatus {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }
        let body = resp.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| AuthError::InvalidResponse(format!("device code response: {e}")))
    }

    async fn poll_device_token(&self, device_code: &str) -> Result<DeviceCodePoll, AuthError> {
        let resp = self
            .client
            .post(self.endpoint("oauth/device/token"))
            .json(&DeviceTokenRequest {
                code: device_code,
                client_id: &self.client_id,
                client_secret: &self.client_secret,
            })
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), "device token poll");
        if status == StatusCode::OK {
            let grant: TokenGrant = serde_json::from_str(&body)
                .map_err(|e| AuthError::InvalidResponse(format!("device token response: {e}")))?;
            return Ok(DeviceCodePoll::Authorized { grant });
        }
        DeviceCodePoll::from_status(status.as_u16(), &body)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshOutcome, AuthError> {
        tracing::debug!("exchanging refresh token");
        let resp = self
            .client
            .post(self.endpoint("oauth/token"))
            .header("trakt-api-key", &self.client_id)
            .header("trakt-api-version", TRAKT_API_VERSION)
            .json(&RefreshRequest {
                refresh_token,
                client_id: &self.client_id,
                client_secret: &self.client_secret,
                redirect_uri: OOB_REDIRECT_URI,
                grant_type: "refresh_token",
            })
            .send()
            .await?;
        let status = resp.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            return Ok(RefreshOutcome::Rejected {
                status: status.as_u16(),
            });
        }
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(AuthError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }
        let grant: TokenGrant = serde_json::from_str(&body)
            .map_err(|e| AuthError::InvalidResponse(format!("refresh response: {e}")))?;
        Ok(RefreshOutcome::Granted(grant))
    }
}

#[derive(Debug, Serialize)]
struct DeviceCodeRequest<'a> {
    client_id: &'a str,
}

#[derive(Debug, Serialize)]
struct DeviceTokenRequest<'a> {
    code: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    redirect_uri: &'a str,
    grant_type: &'a str,
}
