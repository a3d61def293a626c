//! Authenticated Trakt list operations.

pub mod types;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::auth::transport::DEFAULT_API_URL;
use crate::auth::Authenticator;
use crate::error::{Result, SyncError};

pub use types::{ListItem, MoviesPayload, TraktList};
use types::{CreateList, UpdateList};

/// Key under which a resolved list id is cached in the token store.
pub fn list_id_key(name: &str) -> String {
    format!("list-id:{name}")
}

/// Trakt client for the signed-in user's custom lists.
///
/// Every call asks the [`Authenticator`] for fresh headers first.
pub struct TraktClient {
    client: reqwest::Client,
    api_url: String,
    auth: Arc<Authenticator>,
    settle_delay: Duration,
}

impl TraktClient {
    pub fn new(auth: Arc<Authenticator>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: DEFAULT_API_URL.to_string(),
            auth,
            settle_delay: Duration::from_millis(500),
        }
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Trakt id of the list called `name`, creating the list if needed.
    ///
    /// Resolved ids are cached in the token store and never looked up again.
    pub async fn list_id(&self, name: &str) -> Result<u64> {
        let key = list_id_key(name);
        if let Some(id) = self.auth.store().get(&key).and_then(|v| v.as_u64()) {
            return Ok(id);
        }

        let mut lists: Vec<TraktList> = self.get("users/me/lists").await?;
        if !lists.iter().any(|l| l.name == name) {
            tracing::info!(list = name, "creating list");
            self.send_json(Method::POST, "users/me/lists", &CreateList { name })
                .await?;
            self.settle().await;
            lists = self.get("users/me/lists").await?;
        }

        let id = lists
            .iter()
            .find(|l| l.name == name)
            .map(|l| l.ids.trakt)
            .ok_or_else(|| SyncError::ListNotFound(name.to_string()))?;
        self.auth.store().set(&key, json!(id))?;
        Ok(id)
    }

    /// IMDb ids of the movies on a list.
    pub async fn list_movies(&self, list_id: u64) -> Result<BTreeSet<String>> {
        let items: Vec<ListItem> = self.get(&format!("users/me/lists/{list_id}/items")).await?;
        Ok(items
            .into_iter()
            .filter_map(|item| item.movie.and_then(|m| m.ids.imdb))
            .collect())
    }

    pub async fn add_movies(&self, list_id: u64, imdb_ids: &BTreeSet<String>) -> Result<Value> {
        self.send_json(
            Method::POST,
            &format!("users/me/lists/{list_id}/items"),
            &MoviesPayload::from_imdb(imdb_ids),
        )
        .await
    }

    pub async fn remove_movies(&self, list_id: u64, imdb_ids: &BTreeSet<String>) -> Result<Value> {
        self.send_json(
            Method::POST,
            &format!("users/me/lists/{list_id}/items/remove"),
            &MoviesPayload::from_imdb(imdb_ids),
        )
        .await
    }

    pub async fn update_description(&self, list_id: u64, description: &str) -> Result<()> {
        self.send_json(
            Method::PUT,
            &format!("users/me/lists/{list_id}"),
            &UpdateList { description },
        )
        .await?;
        self.settle().await;
        Ok(())
    }

    async fn settle(&self) {
        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let headers = self.auth.headers().await?;
        tracing::debug!(path, "GET");
        let resp = self.client.get(self.url(path)).headers(headers).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(SyncError::api(status.as_u16(), body));
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Value> {
        let headers = self.auth.headers().await?;
        tracing::debug!(method = method.as_str(), path, "sending");
        let resp = self
            .client
            .request(method, self.url(path))
            .headers(headers)
            .json(body)
            .send()
            .await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(SyncError::api(status.as_u16(), text));
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}
