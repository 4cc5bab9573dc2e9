//! Typed session persistence and transcript bookkeeping.
//!
//! Wraps the byte-level storage from `chatstream-storage` with the crate's
//! models, and keeps the active conversation's append-only transcript in
//! sync with its stored snapshot.

use std::sync::Arc;

use anyhow::Result;
use redb::Database;

use crate::models::{ChatMessage, ChatSession, ChatSessionSummary, SessionIdentity};

/// Typed chat session storage wrapper around
/// `chatstream_storage::ChatSessionStorage`, with automatic JSON
/// serialization.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: chatstream_storage::ChatSessionStorage,
}

impl SessionStore {
    pub fn new(db: Arc<Database>) -> Result<Self> {
        Ok(Self {
            inner: chatstream_storage::ChatSessionStorage::new(db)?,
        })
    }

    /// Save a session snapshot (create or update).
    pub fn save(&self, session: &ChatSession) -> Result<()> {
        let json = serde_json::to_vec(session)?;
        self.inner.put_raw(&session.id, &json)
    }

    /// Get a session by ID.
    pub fn get(&self, id: &str) -> Result<Option<ChatSession>> {
        match self.inner.get_raw(id)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// List all sessions, sorted by updated_at descending (most recent
    /// first).
    pub fn list(&self) -> Result<Vec<ChatSession>> {
        let mut sessions = Vec::new();
        for (_, bytes) in self.inner.list_raw()? {
            sessions.push(serde_json::from_slice::<ChatSession>(&bytes)?);
        }

        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        Ok(sessions)
    }

    /// List all sessions as summaries.
    pub fn list_summaries(&self) -> Result<Vec<ChatSessionSummary>> {
        Ok(self.list()?.iter().map(ChatSessionSummary::from).collect())
    }

    /// Delete a session.
    pub fn delete(&self, id: &str) -> Result<bool> {
        self.inner.delete(id)
    }

    /// Check if a session exists.
    pub fn exists(&self, id: &str) -> Result<bool> {
        self.inner.exists(id)
    }

    /// Count stored sessions.
    pub fn count(&self) -> Result<usize> {
        self.inner.count()
    }
}

/// Append-only transcript bookkeeping for the active conversation.
///
/// Every mutation persists a full snapshot of the active session, so the
/// stored copy is never more than one message behind the in-memory one.
pub struct Transcript {
    store: SessionStore,
    active: ChatSession,
    identity: SessionIdentity,
}

impl Transcript {
    /// Start with a fresh session.
    pub fn new(store: SessionStore) -> Self {
        let active = ChatSession::new();
        let identity = SessionIdentity::with_local_id(&active.id);
        Self {
            store,
            active,
            identity,
        }
    }

    /// Resume a stored session, or start fresh when the id is unknown.
    pub fn resume(store: SessionStore, session_id: &str) -> Result<Self> {
        let active = store.get(session_id)?.unwrap_or_default();
        let identity = SessionIdentity::with_local_id(&active.id);
        Ok(Self {
            store,
            active,
            identity,
        })
    }

    pub fn active(&self) -> &ChatSession {
        &self.active
    }

    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    pub fn identity_mut(&mut self) -> &mut SessionIdentity {
        &mut self.identity
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Append a user message, deriving the session title on the first one.
    pub fn push_user(&mut self, content: impl Into<String>) -> Result<()> {
        self.active.add_message(ChatMessage::user(content));
        self.store.save(&self.active)
    }

    /// Append the streaming placeholder.
    pub fn begin_assistant_stream(&mut self) -> Result<()> {
        self.active.begin_streaming();
        self.store.save(&self.active)
    }

    /// Update the placeholder with the accumulated reply so far.
    pub fn update_assistant_stream(&mut self, content: &str) -> Result<()> {
        self.active.update_streaming(content);
        self.store.save(&self.active)
    }

    /// Replace the placeholder with the finalized assistant message.
    pub fn finalize_assistant(&mut self, content: impl Into<String>) -> Result<()> {
        self.active.finalize_streaming(content);
        self.store.save(&self.active)
    }

    /// Drop the placeholder after a failed turn.
    pub fn abort_assistant_stream(&mut self) -> Result<()> {
        self.active.abort_streaming();
        self.store.save(&self.active)
    }

    /// Delete a session. Deleting the active one starts a fresh session
    /// with a new id and an empty transcript.
    pub fn delete(&mut self, session_id: &str) -> Result<bool> {
        let deleted = self.store.delete(session_id)?;
        if session_id == self.active.id {
            self.active = ChatSession::new();
            self.identity = SessionIdentity::with_local_id(&self.active.id);
        }
        Ok(deleted)
    }

    /// List stored sessions as summaries, most recent first.
    pub fn sessions(&self) -> Result<Vec<ChatSessionSummary>> {
        self.store.list_summaries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn setup() -> (SessionStore, tempfile::TempDir) {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Arc::new(Database::create(db_path).unwrap());
        let store = SessionStore::new(db).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_save_and_get() {
        let (store, _temp_dir) = setup();

        let mut session = ChatSession::new();
        session.add_message(ChatMessage::user("Hello!"));
        store.save(&session).unwrap();

        let retrieved = store.get(&session.id).unwrap().unwrap();
        assert_eq!(retrieved.title, "Hello!");
        assert_eq!(retrieved.messages.len(), 1);
    }

    #[test]
    fn test_get_nonexistent() {
        let (store, _temp_dir) = setup();

        let result = store.get("nonexistent").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_list_sorted_by_updated_at() {
        let (store, _temp_dir) = setup();

        let mut session1 = ChatSession::new();
        session1.updated_at = 1000;
        let mut session2 = ChatSession::new();
        session2.updated_at = 3000;
        let mut session3 = ChatSession::new();
        session3.updated_at = 2000;

        store.save(&session1).unwrap();
        store.save(&session2).unwrap();
        store.save(&session3).unwrap();

        let sessions = store.list().unwrap();
        assert_eq!(sessions.len(), 3);
        assert_eq!(sessions[0].updated_at, 3000);
        assert_eq!(sessions[1].updated_at, 2000);
        assert_eq!(sessions[2].updated_at, 1000);
    }

    #[test]
    fn test_transcript_persists_every_mutation() {
        let (store, _temp_dir) = setup();
        let mut transcript = Transcript::new(store.clone());
        let id = transcript.active().id.clone();

        transcript.push_user("Hello there, how are you?").unwrap();
        let stored = store.get(&id).unwrap().unwrap();
        assert_eq!(stored.messages.len(), 1);
        assert_eq!(stored.title, "Hello there, how are you?");

        transcript.begin_assistant_stream().unwrap();
        transcript.update_assistant_stream("I'm").unwrap();
        let stored = store.get(&id).unwrap().unwrap();
        assert_eq!(stored.messages.len(), 2);
        assert_eq!(stored.messages[1].content, "I'm");

        transcript.finalize_assistant("I'm fine, thanks!").unwrap();
        let stored = store.get(&id).unwrap().unwrap();
        assert_eq!(stored.messages.len(), 2);
        assert_eq!(stored.messages[1].content, "I'm fine, thanks!");
        assert!(!stored.messages[1].is_streaming_placeholder());
    }

    #[test]
    fn test_abort_removes_placeholder_from_store() {
        let (store, _temp_dir) = setup();
        let mut transcript = Transcript::new(store.clone());
        let id = transcript.active().id.clone();

        transcript.push_user("hi").unwrap();
        transcript.begin_assistant_stream().unwrap();
        transcript.abort_assistant_stream().unwrap();

        let stored = store.get(&id).unwrap().unwrap();
        assert_eq!(stored.messages.len(), 1);
    }

    #[test]
    fn test_deleting_active_session_starts_fresh() {
        let (store, _temp_dir) = setup();
        let mut transcript = Transcript::new(store.clone());

        transcript.push_user("hello").unwrap();
        let old_id = transcript.active().id.clone();

        let deleted = transcript.delete(&old_id).unwrap();
        assert!(deleted);

        assert_ne!(transcript.active().id, old_id);
        assert!(transcript.active().messages.is_empty());
        assert_eq!(transcript.identity().effective(), transcript.active().id);
        assert!(!store.exists(&old_id).unwrap());
    }

    #[test]
    fn test_deleting_other_session_keeps_active() {
        let (store, _temp_dir) = setup();

        let other = ChatSession::new();
        store.save(&other).unwrap();

        let mut transcript = Transcript::new(store.clone());
        transcript.push_user("hello").unwrap();
        let active_id = transcript.active().id.clone();

        transcript.delete(&other.id).unwrap();
        assert_eq!(transcript.active().id, active_id);
        assert_eq!(transcript.active().messages.len(), 1);
    }

    #[test]
    fn test_resume_unknown_id_starts_fresh() {
        let (store, _temp_dir) = setup();

        let transcript = Transcript::resume(store, "missing").unwrap();
        assert!(transcript.active().messages.is_empty());
        assert_ne!(transcript.active().id, "missing");
    }

    #[test]
    fn test_resume_restores_transcript() {
        let (store, _temp_dir) = setup();

        let mut original = Transcript::new(store.clone());
        original.push_user("remember me").unwrap();
        let id = original.active().id.clone();
        drop(original);

        let resumed = Transcript::resume(store, &id).unwrap();
        assert_eq!(resumed.active().id, id);
        assert_eq!(resumed.active().messages.len(), 1);
        assert_eq!(resumed.identity().effective(), id);
    }
}
