//! Read-only view of the Radarr movie library.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::config::RadarrConfig;
use crate::error::{Result, SyncError};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RadarrMovie {
    imdb_id: Option<String>,
    #[serde(default)]
    downloaded: bool,
}

/// Movies known to Radarr, by IMDb id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Library {
    /// Movies with a file on disk.
    pub downloaded: BTreeSet<String>,
    /// Every monitored or known movie, downloaded or not.
    pub all: BTreeSet<String>,
}

pub struct RadarrClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl RadarrClient {
    pub fn new(config: &RadarrConfig) -> Result<Self> {
        // Radarr usually sits on the LAN; never route it through a proxy.
        let client = reqwest::Client::builder().no_proxy().build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub async fn library(&self) -> Result<Library> {
        let url = format!("{}/api/movie", self.url.trim_end_matches('/'));
        let resp = self
            .client
            .get(url)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SyncError::LocalServer {
                status: status.as_u16(),
            });
        }
        let movies: Vec<RadarrMovie> = resp.json().await?;

        let mut library = Library::default();
        for movie in movies {
            let Some(imdb) = movie.imdb_id.filter(|id| !id.is_empty()) else {
                continue;
            };
            if movie.downloaded {
                library.downloaded.insert(imdb.clone());
            }
            library.all.insert(imdb);
        }
        tracing::info!(
            downloaded = library.downloaded.len(),
            total = library.all.len(),
            "read Radarr library"
        );
        Ok(library)
    }
}
