//! Reconcile Trakt lists against the Radarr library. Local state always wins.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::error::Result;
use crate::radarr::RadarrClient;
use crate::trakt::TraktClient;

/// Changes needed to make a remote list equal to the local set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListDiff {
    pub to_add: BTreeSet<String>,
    pub to_remove: BTreeSet<String>,
}

impl ListDiff {
    pub fn between(local: &BTreeSet<String>, remote: &BTreeSet<String>) -> Self {
        Self {
            to_add: local.difference(remote).cloned().collect(),
            to_remove: remote.difference(local).cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// What a run did to one list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListReport {
    pub name: String,
    pub list_id: u64,
    pub added: BTreeSet<String>,
    pub removed: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub collection: ListReport,
    pub watchlist: ListReport,
}

pub struct Syncer {
    trakt: TraktClient,
    radarr: RadarrClient,
    collection_list: String,
    watchlist_list: String,
}

impl Syncer {
    pub fn new(
        trakt: TraktClient,
        radarr: RadarrClient,
        collection_list: impl Into<String>,
        watchlist_list: impl Into<String>,
    ) -> Self {
        Self {
            trakt,
            radarr,
            collection_list: collection_list.into(),
            watchlist_list: watchlist_list.into(),
        }
    }

    /// Mirror downloaded movies into the collection list and every known movie
    /// into the watchlist list, stamping both descriptions with `today`.
    pub async fn run(&self, today: NaiveDate) -> Result<SyncReport> {
        let description = format!("Updated at {}", today.format("%Y-%m-%d"));

        let collection_id = self.trakt.list_id(&self.collection_list).await?;
        self.trakt
            .update_description(collection_id, &description)
            .await?;
        let watchlist_id = self.trakt.list_id(&self.watchlist_list).await?;
        self.trakt
            .update_description(watchlist_id, &description)
            .await?;

        let library = self.radarr.library().await?;
        let remote_collection = self.trakt.list_movies(collection_id).await?;
        let remote_watchlist = self.trakt.list_movies(watchlist_id).await?;

        let collection = self
            .apply(
                &self.collection_list,
                collection_id,
                ListDiff::between(&library.downloaded, &remote_collection),
            )
            .await?;
        let watchlist = self
            .apply(
                &self.watchlist_list,
                watchlist_id,
                ListDiff::between(&library.all, &remote_watchlist),
            )
            .await?;

        Ok(SyncReport {
            collection,
            watchlist,
        })
    }

    async fn apply(&self, name: &str, list_id: u64, diff: ListDiff) -> Result<ListReport> {
        for imdb in &diff.to_add {
            tracing::info!(list = name, imdb = %imdb, "in Radarr but not in Trakt, adding");
        }
        if !diff.to_add.is_empty() {
            let response = self.trakt.add_movies(list_id, &diff.to_add).await?;
            tracing::debug!(list = name, %response, "add response");
        }

        for imdb in &diff.to_remove {
            tracing::info!(list = name, imdb = %imdb, "in Trakt but not in Radarr, removing");
        }
        if !diff.to_remove.is_empty() {
            let response = self.trakt.remove_movies(list_id, &diff.to_remove).await?;
            tracing::debug!(list = name, %response, "remove response");
        }

        Ok(ListReport {
            name: name.to_string(),
            list_id,
            added: diff.to_add,
            removed: diff.to_remove,
        })
    }
}
