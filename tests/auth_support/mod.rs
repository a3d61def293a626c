#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::time::Instant;
use trakt_list_sync::auth::{
    AuthError, Authenticator, Clock, DeviceCodePoll, DeviceCodeResponse, DeviceCodeSession,
    OAuthTransport, RefreshOutcome, TokenGrant, TokenStore,
};

pub const BASE_EPOCH: f64 = 1_000_000.0;

#[derive(Default)]
pub struct InMemoryTokenStore {
    entries: Mutex<BTreeMap<String, Value>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, key: &str, value: Value) {
        self.entries
            .lock()
            .expect("store lock poisoned")
            .insert(key.to_string(), value);
    }
}

impl TokenStore for InMemoryTokenStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries
            .lock()
            .expect("store lock poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), AuthError> {
        self.seed(key, value);
        Ok(())
    }

    fn snapshot(&self) -> BTreeMap<String, Value> {
        self.entries.lock().expect("store lock poisoned").clone()
    }
}

/// Epoch clock that moves with tokio's (pausable) time.
pub struct PausedClock {
    base: f64,
    start: Instant,
}

impl PausedClock {
    pub fn new(base: f64) -> Self {
        Self {
            base,
            start: Instant::now(),
        }
    }
}

impl Clock for PausedClock {
    fn now(&self) -> f64 {
        self.base + self.start.elapsed().as_secs_f64()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    DeviceCode,
    Poll { at: Instant, device_code: String },
    Refresh { refresh_token: String },
}

/// Transport returning queued outcomes; polls default to pending once the queue is empty.
#[derive(Default)]
pub struct ScriptedTransport {
    device_code: Mutex<Option<DeviceCodeResponse>>,
    polls: Mutex<VecDeque<Result<DeviceCodePoll, AuthError>>>,
    refreshes: Mutex<VecDeque<Result<RefreshOutcome, AuthError>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device_code(self, interval: u64, expires_in: u64) -> Self {
        *self.device_code.lock().unwrap() = Some(DeviceCodeResponse {
            device_code: "device-123".to_string(),
            user_code: "5055CC52".to_string(),
            verification_url: "https://trakt.tv/activate".to_string(),
            expires_in,
            interval,
        });
        self
    }

    pub fn push_poll(&self, outcome: DeviceCodePoll) {
        self.polls.lock().unwrap().push_back(Ok(outcome));
    }

    pub fn push_poll_error(&self, error: AuthError) {
        self.polls.lock().unwrap().push_back(Err(error));
    }

    pub fn push_refresh(&self, outcome: RefreshOutcome) {
        self.refreshes.lock().unwrap().push_back(Ok(outcome));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn poll_times(&self) -> Vec<Instant> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Poll { at, .. } => Some(at),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl OAuthTransport for ScriptedTransport {
    async fn request_device_code(&self) -> Result<DeviceCodeResponse, AuthError> {
        self.calls.lock().unwrap().push(Call::DeviceCode);
        self.device_code
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| AuthError::InvalidResponse("no device code scripted".to_string()))
    }

    async fn poll_device_token(&self, device_code: &str) -> Result<DeviceCodePoll, AuthError> {
        self.calls.lock().unwrap().push(Call::Poll {
            at: Instant::now(),
            device_code: device_code.to_string(),
        });
        self.polls
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(DeviceCodePoll::Pending))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshOutcome, AuthError> {
        self.calls.lock().unwrap().push(Call::Refresh {
            refresh_token: refresh_token.to_string(),
        });
        self.refreshes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AuthError::InvalidResponse("no refresh scripted".to_string())))
    }
}

/// Prompts seen by the operator.
#[derive(Default, Clone)]
pub struct PromptLog(pub Arc<Mutex<Vec<(String, String)>>>);

impl PromptLog {
    pub fn attach(&self, auth: Authenticator) -> Authenticator {
        let log = self.0.clone();
        auth.with_prompt(Arc::new(move |session: &DeviceCodeSession| {
            log.lock()
                .unwrap()
                .push((session.verification_url.clone(), session.user_code.clone()));
        }))
    }

    pub fn entries(&self) -> Vec<(String, String)> {
        self.0.lock().unwrap().clone()
    }
}

pub fn grant(access: &str, refresh: &str, expires_in: u64) -> TokenGrant {
    TokenGrant {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
        expires_in,
    }
}

pub fn seed_credential(store: &InMemoryTokenStore, access: &str, refresh: &str, expires: f64) {
    store.seed("access_token", json!(access));
    store.seed("refresh_token", json!(refresh));
    store.seed("access_token_expires", json!(expires));
}

pub fn authenticator(
    store: Arc<InMemoryTokenStore>,
    transport: Arc<ScriptedTransport>,
    clock: Arc<PausedClock>,
) -> Authenticator {
    Authenticator::new("client-id", store, transport).with_clock(clock)
}
