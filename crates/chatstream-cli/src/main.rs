mod cli;
mod commands;
mod paths;

use anyhow::Result;
use chatstream_core::{ApiClient, ClientConfig};
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let client = ApiClient::new(ClientConfig::new(&cli.api_url));
    let db_path = paths::resolve_database_path(cli.db_path.as_deref())?;

    match cli.command {
        Commands::Ping => commands::ping(&client).await,
        Commands::Chat { session, bot } => {
            commands::chat::run(&client, &db_path, session, bot).await
        }
        Commands::Session { command } => commands::sessions::run(&client, &db_path, command).await,
        Commands::Bot { command } => commands::bots::run(&client, command).await,
    }
}
