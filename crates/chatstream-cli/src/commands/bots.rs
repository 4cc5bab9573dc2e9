//! RAG bot management.

use anyhow::Result;
use chatstream_core::models::{ProcessingProgress, RagBot};
use chatstream_core::{ApiClient, UploadOptions};
use comfy_table::Table;

use crate::cli::BotCommands;

pub async fn run(client: &ApiClient, command: BotCommands) -> Result<()> {
    match command {
        BotCommands::Create { name, description } => {
            let bot = client.create_bot(&name, &description).await?;
            println!("Created bot {} ({})", bot.name, bot.id);
        }
        BotCommands::List => {
            let bots = client.list_bots().await?;
            let mut table = Table::new();
            table.set_header(vec!["ID", "NAME", "STATUS", "DOCS", "CREATED"]);
            for bot in bots {
                table.add_row(vec![
                    bot.id,
                    bot.name,
                    bot.status.as_str().to_string(),
                    bot.document_count.to_string(),
                    bot.created_at,
                ]);
            }
            println!("{table}");
        }
        BotCommands::Show { id } => {
            let bot = client.get_bot(&id).await?;
            print_bot(&bot);
        }
        BotCommands::Delete { id } => {
            client.delete_bot(&id).await?;
            println!("Deleted bot {id}");
        }
        BotCommands::Upload { id, file, wait } => {
            let mut print_progress = |progress: &ProcessingProgress| {
                println!(
                    "  [{}/{}] {}",
                    progress.completed_steps, progress.total_steps, progress.message
                );
            };
            let options = UploadOptions {
                wait_for_ready: wait,
                on_progress: if wait { Some(&mut print_progress) } else { None },
            };
            client.upload_document_with(&id, &file, options).await?;

            if wait {
                println!("Document ingested.");
            } else {
                println!("Document uploaded; processing continues in the background.");
            }
        }
        BotCommands::Status { id } => {
            let report = client.bot_status(&id).await?;
            println!("status: {}", report.status.as_str());
            if let Some(progress) = report.processing_progress {
                println!(
                    "progress: [{}/{}] {}",
                    progress.completed_steps, progress.total_steps, progress.message
                );
            }
            if let Some(message) = report.error_message {
                println!("error: {message}");
            }
        }
    }
    Ok(())
}

fn print_bot(bot: &RagBot) {
    println!("{} ({})", bot.name, bot.id);
    if !bot.description.is_empty() {
        println!("{}", bot.description);
    }
    println!("status: {}  created: {}", bot.status.as_str(), bot.created_at);

    if bot.documents.is_empty() {
        println!("no documents");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec!["FILENAME", "CHUNKS", "ADDED"]);
    for document in &bot.documents {
        table.add_row(vec![
            document.filename.clone(),
            document.chunk_count.to_string(),
            document.added_at.clone(),
        ]);
    }
    println!("{table}");
}
