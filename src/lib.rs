//! trakt-list-sync
//!
//! Keeps two Trakt lists in step with a Radarr library: "My Collection" holds
//! every downloaded movie, "Radarr Watchlist" every movie Radarr knows about.
//! Trakt access goes through a device-code OAuth flow whose tokens are cached
//! and refreshed in a small JSON state file.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use trakt_list_sync::auth::{Authenticator, FileTokenStore, TraktOAuthClient};
//! use trakt_list_sync::trakt::TraktClient;
//!
//! # async fn example() -> trakt_list_sync::error::Result<()> {
//! let store = Arc::new(FileTokenStore::load("state.json")?);
//! let oauth = Arc::new(TraktOAuthClient::new("client-id", "client-secret"));
//! let auth = Arc::new(Authenticator::new("client-id", store, oauth));
//! let trakt = TraktClient::new(auth);
//! let id = trakt.list_id("My Collection").await?;
//! println!("{:?}", trakt.list_movies(id).await?);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod radarr;
pub mod sync;
pub mod trakt;
