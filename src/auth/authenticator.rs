use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use strum::IntoStaticStr;

use super::clock::{Clock, SystemClock};
use super::device_code::{DeviceCodePoll, DeviceCodeSession};
use super::error::AuthError;
use super::store::TokenStore;
use super::token::Credential;
use super::transport::{OAuthTransport, RefreshOutcome, TRAKT_API_VERSION};

/// Called once per device-code session with the URL and code the operator must use.
pub type DevicePrompt = Arc<dyn Fn(&DeviceCodeSession) + Send + Sync>;

/// One state of the token lifecycle.
///
/// `HaveValidToken`, `Authorized` and `DeniedOrExpired` are terminal;
/// [`Authenticator::advance`] moves every other state forward by one step.
#[derive(Debug, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthState {
    HaveValidToken { access_token: String },
    NeedRefresh { refresh_token: String },
    NeedDeviceAuth,
    /// Waiting `wait` before the next poll of `session`.
    PollingForApproval {
        session: DeviceCodeSession,
        wait: Duration,
    },
    Authorized { access_token: String },
    DeniedOrExpired(AuthError),
}

impl AuthState {
    pub fn name(&self) -> &'static str {
        self.into()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::HaveValidToken { .. } | Self::Authorized { .. } | Self::DeniedOrExpired(_)
        )
    }
}

/// Produces Trakt request headers, refreshing or re-authorizing as needed.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use trakt_list_sync::auth::{Authenticator, FileTokenStore, TraktOAuthClient};
///
/// # async fn run() -> Result<(), trakt_list_sync::auth::AuthError> {
/// let store = Arc::new(FileTokenStore::load("/tmp/trakt-state.json")?);
/// let oauth = Arc::new(TraktOAuthClient::new("client-id", "client-secret"));
/// let auth = Authenticator::new("client-id", store, oauth);
/// let headers = auth.headers().await?;
/// # Ok(())
/// # }
/// ```
pub struct Authenticator {
    client_id: String,
    store: Arc<dyn TokenStore>,
    transport: Arc<dyn OAuthTransport>,
    clock: Arc<dyn Clock>,
    prompt: DevicePrompt,
}

impl Authenticator {
    pub fn new(
        client_id: impl Into<String>,
        store: Arc<dyn TokenStore>,
        transport: Arc<dyn OAuthTransport>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            store,
            transport,
            clock: Arc::new(SystemClock),
            prompt: Arc::new(|session: &DeviceCodeSession| {
                tracing::info!(
                    url = %session.verification_url,
                    code = %session.user_code,
                    "device authorization required"
                );
            }),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_prompt(mut self, prompt: DevicePrompt) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Where the lifecycle starts given what is currently stored.
    pub fn initial_state(&self) -> AuthState {
        let credential = Credential::read(self.store.as_ref());
        if let Some(access_token) = credential.valid_access_token(self.clock.now()) {
            return AuthState::HaveValidToken {
                access_token: access_token.to_string(),
            };
        }
        match credential.usable_refresh_token() {
            Some(refresh_token) => AuthState::NeedRefresh {
                refresh_token: refresh_token.to_string(),
            },
            None => AuthState::NeedDeviceAuth,
        }
    }

    /// Perform the single step that leaves `state`.
    ///
    /// Flow-specific failures land in [`AuthState::DeniedOrExpired`]; transport
    /// and persistence failures are returned as errors.
    pub async fn advance(&self, state: AuthState) -> Result<AuthState, AuthError> {
        let next = match state {
            AuthState::NeedRefresh { refresh_token } => {
                tracing::info!("access token expired, refreshing");
                match self.transport.refresh(&refresh_token).await? {
                    RefreshOutcome::Granted(grant) => {
                        grant.persist(self.store.as_ref(), self.clock.now())?;
                        tracing::info!("new access token acquired");
                        AuthState::Authorized {
                            access_token: grant.access_token,
                        }
                    }
                    RefreshOutcome::Rejected { status } => {
                        tracing::warn!(status, "refresh token rejected, device authorization needed");
                        AuthState::NeedDeviceAuth
                    }
                }
            }
            AuthState::NeedDeviceAuth => {
                let response = self.transport.request_device_code().await?;
                let session = DeviceCodeSession::from_response(response, self.clock.now());
                (self.prompt)(&session);
                let wait = session.interval();
                AuthState::PollingForApproval { session, wait }
            }
            AuthState::PollingForApproval { session, wait } => {
                tokio::time::sleep(wait).await;
                self.poll_once(session).await?
            }
            terminal => terminal,
        };
        tracing::debug!(state = next.name(), "auth state");
        Ok(next)
    }

    async fn poll_once(&self, session: DeviceCodeSession) -> Result<AuthState, AuthError> {
        if session.is_past_deadline(self.clock.now()) {
            return Ok(AuthState::DeniedOrExpired(AuthError::DeadlineExceeded {
                expires_in_secs: session.expires_in_secs,
            }));
        }
        let outcome = self.transport.poll_device_token(&session.device_code).await?;
        let next = match outcome {
            DeviceCodePoll::Authorized { grant } => {
                grant.persist(self.store.as_ref(), self.clock.now())?;
                tracing::info!("device authorized, new tokens acquired");
                AuthState::Authorized {
                    access_token: grant.access_token,
                }
            }
            DeviceCodePoll::Pending => {
                tracing::debug!("waiting for the user to authorize");
                let wait = session.interval();
                AuthState::PollingForApproval { session, wait }
            }
            DeviceCodePoll::SlowDown => {
                tracing::warn!("polling too quickly, backing off one interval");
                let wait = session.interval() * 2;
                AuthState::PollingForApproval { session, wait }
            }
            terminal => match terminal.into_terminal_error() {
                Some(err) => AuthState::DeniedOrExpired(err),
                None => {
                    return Err(AuthError::InvalidResponse(
                        "unclassified device poll outcome".to_string(),
                    ))
                }
            },
        };
        Ok(next)
    }

    /// Drive the lifecycle to a terminal state and return a usable access token.
    pub async fn authorize(&self) -> Result<String, AuthError> {
        let mut state = self.initial_state();
        loop {
            state = match state {
                AuthState::HaveValidToken { access_token } | AuthState::Authorized { access_token } => {
                    return Ok(access_token)
                }
                AuthState::DeniedOrExpired(err) => return Err(err),
                pending => self.advance(pending).await?,
            };
        }
    }

    /// Headers for an authenticated Trakt API call.
    pub async fn headers(&self) -> Result<HeaderMap, AuthError> {
        let access_token = self.authorize().await?;
        let mut headers = self.base_headers()?;
        let bearer = HeaderValue::from_str(&format!("Bearer {access_token}"))
            .map_err(|_| AuthError::InvalidHeader("authorization"))?;
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }

    fn base_headers(&self) -> Result<HeaderMap, AuthError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "trakt-api-key",
            HeaderValue::from_str(&self.client_id)
                .map_err(|_| AuthError::InvalidHeader("trakt-api-key"))?,
        );
        headers.insert("trakt-api-version", HeaderValue::from_static(TRAKT_API_VERSION));
        Ok(headers)
    }
}
