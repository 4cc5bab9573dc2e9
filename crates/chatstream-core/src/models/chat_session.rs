//! Chat session models for conversation persistence.

use serde::{Deserialize, Serialize};

/// Maximum derived title length in characters, excluding the ellipsis marker.
pub const MAX_TITLE_CHARS: usize = 30;

/// Reserved id of the transient placeholder shown while a reply streams.
pub const STREAMING_MESSAGE_ID: &str = "streaming";

const UNTITLED: &str = "New chat";

/// Role of a chat message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// Single chat message in a session.
///
/// Immutable once created, except the streaming placeholder (reserved id),
/// which grows until it is replaced by the finalized message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: i64,
}

impl ChatMessage {
    fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }

    /// The transient placeholder appended while a reply is still streaming.
    pub fn streaming_placeholder() -> Self {
        Self {
            id: STREAMING_MESSAGE_ID.to_string(),
            role: ChatRole::Assistant,
            content: String::new(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn is_streaming_placeholder(&self) -> bool {
        self.id == STREAMING_MESSAGE_ID
    }
}

/// Chat session representing a persisted conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ChatSession {
    pub fn new() -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: UNTITLED.to_string(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_placeholder_title(&self) -> bool {
        self.title == UNTITLED
    }

    /// Append a message. The first user message of an untitled session
    /// derives the session title.
    pub fn add_message(&mut self, message: ChatMessage) {
        if message.role == ChatRole::User && self.has_placeholder_title() {
            self.title = derive_title(&message.content);
        }
        self.updated_at = chrono::Utc::now().timestamp_millis();
        self.messages.push(message);
    }

    /// Append the streaming placeholder. At most one exists per session.
    pub fn begin_streaming(&mut self) {
        if self.streaming_index().is_none() {
            self.messages.push(ChatMessage::streaming_placeholder());
        }
        self.updated_at = chrono::Utc::now().timestamp_millis();
    }

    /// Replace the placeholder content with the accumulated text so far.
    pub fn update_streaming(&mut self, content: &str) {
        if let Some(idx) = self.streaming_index() {
            self.messages[idx].content = content.to_string();
            self.updated_at = chrono::Utc::now().timestamp_millis();
        }
    }

    /// Replace the placeholder with a finalized assistant message.
    pub fn finalize_streaming(&mut self, content: impl Into<String>) {
        let finalized = ChatMessage::assistant(content);
        match self.streaming_index() {
            Some(idx) => self.messages[idx] = finalized,
            None => self.messages.push(finalized),
        }
        self.updated_at = chrono::Utc::now().timestamp_millis();
    }

    /// Drop the placeholder without finalizing (failed turn).
    pub fn abort_streaming(&mut self) {
        if let Some(idx) = self.streaming_index() {
            self.messages.remove(idx);
            self.updated_at = chrono::Utc::now().timestamp_millis();
        }
    }

    fn streaming_index(&self) -> Option<usize> {
        self.messages
            .iter()
            .position(|m| m.is_streaming_placeholder())
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Lightweight listing form of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSessionSummary {
    pub id: String,
    pub title: String,
    pub message_count: usize,
    pub last_message_preview: Option<String>,
    pub updated_at: i64,
}

impl From<&ChatSession> for ChatSessionSummary {
    fn from(session: &ChatSession) -> Self {
        Self {
            id: session.id.clone(),
            title: session.title.clone(),
            message_count: session.messages.len(),
            last_message_preview: session.messages.last().map(|m| derive_title(&m.content)),
            updated_at: session.updated_at,
        }
    }
}

/// Derive a session title from the first user message.
///
/// Truncates to [`MAX_TITLE_CHARS`] characters on a char boundary, appending
/// an ellipsis marker only when truncation happened.
pub fn derive_title(message: &str) -> String {
    match message.char_indices().nth(MAX_TITLE_CHARS) {
        Some((idx, _)) => format!("{}...", &message[..idx]),
        None => message.to_string(),
    }
}
