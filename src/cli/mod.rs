//! CLI entry point for trakt-list-sync.

pub mod auth;
pub mod sync;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::auth::{Authenticator, DeviceCodeSession, FileTokenStore, TraktOAuthClient};
use crate::config::SyncConfig;
use crate::error::SyncError;

/// Mirror a Radarr library into Trakt lists
#[derive(Parser, Debug)]
#[command(name = "trakt-list-sync", version, about = "Mirror a Radarr library into Trakt lists")]
pub struct Cli {
    /// Path to a TOML config file (default: ~/.trakt-list-sync/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reconcile both Trakt lists with Radarr
    Sync,
    /// Trakt credential management
    Auth(AuthArgs),
}

/// Arguments for the `auth` subcommand group.
#[derive(Parser, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommands,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Obtain credentials now, running the device flow if needed
    Login,
    /// Show stored credential state
    Status,
}

/// Authenticator over the configured state file, prompting on stdout.
pub fn build_authenticator(config: &SyncConfig) -> Result<Arc<Authenticator>, SyncError> {
    let store = Arc::new(FileTokenStore::load(config.state_path.clone())?);
    let oauth = Arc::new(
        TraktOAuthClient::new(&config.client_id, &config.client_secret)
            .with_api_url(&config.api_url),
    );
    let auth = Authenticator::new(&config.client_id, store, oauth)
        .with_prompt(Arc::new(print_device_prompt));
    Ok(Arc::new(auth))
}

fn print_device_prompt(session: &DeviceCodeSession) {
    println!(
        "Go to {} and enter code {}",
        session.verification_url, session.user_code
    );
}
