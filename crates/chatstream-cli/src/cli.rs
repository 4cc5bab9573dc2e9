use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "chatstream")]
#[command(version, about = "ChatStream - streaming chat and RAG bot client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL
    #[arg(
        long,
        global = true,
        env = "CHATSTREAM_API_URL",
        default_value = "http://localhost:8000"
    )]
    pub api_url: String,

    /// Database path (defaults to ~/.chatstream/chatstream.db)
    #[arg(long, global = true, env = "CHATSTREAM_DB_PATH")]
    pub db_path: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that the backend is reachable
    Ping,

    /// Interactive streaming chat
    Chat {
        /// Resume a stored session by id
        #[arg(long)]
        session: Option<String>,

        /// Answer from a RAG bot's knowledge base
        #[arg(long)]
        bot: Option<String>,
    },

    /// Stored session management
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },

    /// RAG bot management
    Bot {
        #[command(subcommand)]
        command: BotCommands,
    },
}

#[derive(Subcommand)]
pub enum SessionCommands {
    /// List stored sessions, most recent first
    List,

    /// Print a stored session transcript
    Show { id: String },

    /// Delete a stored session (also clears server-side history)
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum BotCommands {
    /// Create a bot
    Create {
        name: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// List bots
    List,

    /// Show one bot and its documents
    Show { id: String },

    /// Delete a bot and all its data
    Delete { id: String },

    /// Upload a document into a bot's knowledge base
    Upload {
        id: String,
        file: PathBuf,

        /// Block until the bot is ready again, printing progress
        #[arg(long)]
        wait: bool,
    },

    /// Show ingestion status
    Status { id: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
