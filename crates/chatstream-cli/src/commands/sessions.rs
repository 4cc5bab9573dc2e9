//! Stored session management.

use std::path::Path;

use anyhow::Result;
use chatstream_core::models::ChatRole;
use chatstream_core::{ApiClient, SessionStore};
use comfy_table::Table;

use crate::cli::SessionCommands;
use crate::commands::format_timestamp;

pub async fn run(client: &ApiClient, db_path: &Path, command: SessionCommands) -> Result<()> {
    let storage = chatstream_storage::Storage::new(db_path)?;
    let store = SessionStore::new(storage.get_db())?;

    match command {
        SessionCommands::List => list(&store),
        SessionCommands::Show { id } => show(&store, &id),
        SessionCommands::Delete { id } => delete(client, &store, &id).await,
    }
}

fn list(store: &SessionStore) -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["ID", "TITLE", "MESSAGES", "UPDATED"]);
    for summary in store.list_summaries()? {
        table.add_row(vec![
            summary.id,
            summary.title,
            summary.message_count.to_string(),
            format_timestamp(summary.updated_at),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn show(store: &SessionStore, id: &str) -> Result<()> {
    let Some(session) = store.get(id)? else {
        anyhow::bail!("session {id} not found");
    };

    println!("{} ({})", session.title, format_timestamp(session.updated_at));
    for message in &session.messages {
        let prefix = match message.role {
            ChatRole::User => "you",
            ChatRole::Assistant => "bot",
        };
        println!("{prefix}> {}", message.content);
    }
    Ok(())
}

async fn delete(client: &ApiClient, store: &SessionStore, id: &str) -> Result<()> {
    // Server-side memory goes with the local snapshot, best effort.
    if let Err(e) = client.clear_chat_history(id).await {
        tracing::debug!(error = %e, "server-side history clear failed");
    }

    if store.delete(id)? {
        println!("Deleted session {id}");
    } else {
        println!("No stored session {id}");
    }
    Ok(())
}
