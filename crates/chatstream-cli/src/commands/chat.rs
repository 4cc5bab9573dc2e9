//! Interactive streaming chat.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use chatstream_core::models::{ChatMessage, ChatRole};
use chatstream_core::{ApiClient, SessionStore, Transcript};
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(
    client: &ApiClient,
    db_path: &Path,
    session: Option<String>,
    bot: Option<String>,
) -> Result<()> {
    let storage = chatstream_storage::Storage::new(db_path)?;
    let store = SessionStore::new(storage.get_db())?;

    let mut transcript = match session {
        Some(id) => Transcript::resume(store, &id)?,
        None => Transcript::new(store),
    };

    for message in &transcript.active().messages {
        print_message(message);
    }
    println!(
        "Connected to {} - type 'quit' to leave, 'clear' to start over.",
        client.config().base_url
    );

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        print!("you> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        match input {
            "quit" | "exit" => break,
            "clear" => {
                // Server-side memory goes with the local transcript.
                if let Err(e) = client
                    .clear_chat_history(transcript.identity().effective())
                    .await
                {
                    tracing::debug!(error = %e, "server-side history clear failed");
                }
                let id = transcript.active().id.clone();
                transcript.delete(&id)?;
                println!("Started a new session.");
                continue;
            }
            _ => {}
        }

        transcript.push_user(input)?;
        transcript.begin_assistant_stream()?;

        print!("bot> ");
        std::io::stdout().flush()?;

        let mut printed = 0usize;
        let result = client
            .send_message(
                input,
                transcript.identity_mut(),
                bot.as_deref(),
                |accumulated| {
                    print!("{}", &accumulated[printed..]);
                    let _ = std::io::stdout().flush();
                    printed = accumulated.len();
                },
            )
            .await;

        println!();
        match result {
            Ok(reply) => transcript.finalize_assistant(reply)?,
            Err(e) => {
                transcript.abort_assistant_stream()?;
                eprintln!("error: {e}");
            }
        }
    }

    Ok(())
}

fn print_message(message: &ChatMessage) {
    let prefix = match message.role {
        ChatRole::User => "you",
        ChatRole::Assistant => "bot",
    };
    println!("{prefix}> {}", message.content);
}
