//! Data models shared across the client

mod bot;
mod chat_session;
mod identity;

pub use bot::{BotStatus, BotStatusReport, DocumentInfo, ProcessingProgress, RagBot};
pub use chat_session::{
    ChatMessage, ChatRole, ChatSession, ChatSessionSummary, MAX_TITLE_CHARS, STREAMING_MESSAGE_ID,
    derive_title,
};
pub use identity::SessionIdentity;
