//! trakt-list-sync binary entry point.

use clap::Parser;
use trakt_list_sync::cli::{AuthCommands, Cli, Commands};
use trakt_list_sync::config::SyncConfig;
use trakt_list_sync::error::SyncError;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), SyncError> {
    let config = SyncConfig::load(cli.config.as_deref())?;
    match cli.command {
        Commands::Sync => trakt_list_sync::cli::sync::handle_sync(&config).await,
        Commands::Auth(auth_args) => match auth_args.command {
            AuthCommands::Login => trakt_list_sync::cli::auth::handle_login(&config).await,
            AuthCommands::Status => trakt_list_sync::cli::auth::handle_status(&config),
        },
    }
}
