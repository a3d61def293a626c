//! Configuration (layered: defaults < TOML file < `.env` < environment).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::auth::transport::DEFAULT_API_URL;
use crate::error::SyncError;

pub const DEFAULT_COLLECTION_LIST: &str = "My Collection";
pub const DEFAULT_WATCHLIST_LIST: &str = "Radarr Watchlist";
const DEFAULT_SETTLE_DELAY_MS: u64 = 500;

/// Radarr connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadarrConfig {
    pub url: String,
    pub api_key: String,
}

/// Resolved settings for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncConfig {
    pub client_id: String,
    pub client_secret: String,
    pub api_url: String,
    pub radarr: Option<RadarrConfig>,
    pub state_path: PathBuf,
    pub collection_list: String,
    pub watchlist_list: String,
    /// Pause after list writes so Trakt reads see them.
    pub settle_delay: Duration,
}

/// On-disk TOML shape; every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub api_url: Option<String>,
    pub radarr_url: Option<String>,
    pub radarr_api_key: Option<String>,
    pub state_path: Option<PathBuf>,
    pub collection_list: Option<String>,
    pub watchlist_list: Option<String>,
    pub settle_delay_ms: Option<u64>,
}

impl FileConfig {
    /// Read a TOML config file; a missing file is an empty config.
    pub fn load(path: &Path) -> Result<Self, SyncError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(SyncError::Io(err)),
        };
        toml::from_str(&raw).map_err(|e| {
            SyncError::Configuration(format!("invalid config file {}: {e}", path.display()))
        })
    }
}

impl SyncConfig {
    /// Load from `path` (or the default location) and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, SyncError> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(default_config_path);
        let file = FileConfig::load(&path)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Merge file values with environment lookups; the environment wins.
    pub fn resolve(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SyncError> {
        let pick = |var: &str, from_file: Option<String>| {
            env(var).filter(|v| !v.trim().is_empty()).or(from_file)
        };

        let client_id = pick("TRAKT_CLIENT_ID", file.client_id)
            .ok_or_else(|| SyncError::Configuration("TRAKT_CLIENT_ID is not set".to_string()))?;
        let client_secret = pick("TRAKT_CLIENT_SECRET", file.client_secret).ok_or_else(|| {
            SyncError::Configuration("TRAKT_CLIENT_SECRET is not set".to_string())
        })?;
        let api_url =
            pick("TRAKT_API_URL", file.api_url).unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let radarr = match (
            pick("RADARR_URL", file.radarr_url),
            pick("RADARR_API_KEY", file.radarr_api_key),
        ) {
            (Some(url), Some(api_key)) => Some(RadarrConfig { url, api_key }),
            _ => None,
        };

        let state_path = env("TRAKT_SYNC_STATE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .or(file.state_path)
            .unwrap_or_else(default_state_path);

        Ok(Self {
            client_id,
            client_secret,
            api_url,
            radarr,
            state_path,
            collection_list: file
                .collection_list
                .unwrap_or_else(|| DEFAULT_COLLECTION_LIST.to_string()),
            watchlist_list: file
                .watchlist_list
                .unwrap_or_else(|| DEFAULT_WATCHLIST_LIST.to_string()),
            settle_delay: Duration::from_millis(
                file.settle_delay_ms.unwrap_or(DEFAULT_SETTLE_DELAY_MS),
            ),
        })
    }

    /// Radarr settings, required by the `sync` command only.
    pub fn require_radarr(&self) -> Result<&RadarrConfig, SyncError> {
        self.radarr.as_ref().ok_or_else(|| {
            SyncError::Configuration("RADARR_URL and RADARR_API_KEY must be set".to_string())
        })
    }
}

fn app_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".trakt-list-sync"))
        .unwrap_or_else(|| PathBuf::from(".trakt-list-sync"))
}

pub fn default_config_path() -> PathBuf {
    app_dir().join("config.toml")
}

pub fn default_state_path() -> PathBuf {
    app_dir().join("state.json")
}
