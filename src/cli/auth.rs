//! CLI auth command handlers for login and status.

use chrono::{DateTime, Utc};

use crate::auth::{Clock, Credential, FileTokenStore, SystemClock};
use crate::config::SyncConfig;
use crate::error::SyncError;

use super::build_authenticator;

/// Handle `trakt-list-sync auth login`.
pub async fn handle_login(config: &SyncConfig) -> Result<(), SyncError> {
    let auth = build_authenticator(config)?;
    auth.authorize().await?;
    let credential = Credential::read(auth.store().as_ref());
    println!("Authorized. {}", describe(&credential, SystemClock.now()));
    Ok(())
}

/// Handle `trakt-list-sync auth status`.
pub fn handle_status(config: &SyncConfig) -> Result<(), SyncError> {
    let store = FileTokenStore::load(config.state_path.clone())?;
    let credential = Credential::read(&store);
    println!("State file: {}", store.path().display());
    println!("{}", describe(&credential, SystemClock.now()));
    Ok(())
}

fn describe(credential: &Credential, now: f64) -> String {
    let expiry = credential
        .access_token_expires
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs as i64, 0));
    match (credential.valid_access_token(now), expiry) {
        (Some(_), Some(at)) => format!("Access token valid until {}", at.format("%Y-%m-%d %H:%M")),
        _ if credential.usable_refresh_token().is_some() => {
            "Access token expired; it will be refreshed on the next run".to_string()
        }
        _ => "Not logged in; the next run starts device authorization".to_string(),
    }
}
