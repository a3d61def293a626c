//! `trakt-list-sync sync` handler.

use chrono::Local;

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::radarr::RadarrClient;
use crate::sync::{ListReport, Syncer};
use crate::trakt::TraktClient;

use super::build_authenticator;

pub async fn handle_sync(config: &SyncConfig) -> Result<(), SyncError> {
    let radarr = RadarrClient::new(config.require_radarr()?)?;
    let auth = build_authenticator(config)?;
    let trakt = TraktClient::new(auth)
        .with_api_url(&config.api_url)
        .with_settle_delay(config.settle_delay);
    let syncer = Syncer::new(
        trakt,
        radarr,
        &config.collection_list,
        &config.watchlist_list,
    );

    let report = syncer.run(Local::now().date_naive()).await?;
    print_report(&report.collection);
    print_report(&report.watchlist);
    Ok(())
}

fn print_report(report: &ListReport) {
    println!(
        "{} (#{}): {} added, {} removed",
        report.name,
        report.list_id,
        report.added.len(),
        report.removed.len()
    );
    for imdb in &report.added {
        println!("  + {imdb}");
    }
    for imdb in &report.removed {
        println!("  - {imdb}");
    }
}
