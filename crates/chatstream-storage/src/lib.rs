//! ChatStream Storage - low-level persistence layer.
//!
//! This crate provides the persistence layer for ChatStream, using redb as
//! the embedded database. It exposes byte-level APIs so the core crate can
//! layer its own typed models on top without a circular dependency.
//!
//! # Tables
//!
//! - `chat_sessions` - chat session snapshots, one entry per session id

pub mod chat_session;

use anyhow::Result;
use redb::Database;
use std::path::Path;
use std::sync::Arc;

pub use chat_session::ChatSessionStorage;

/// Central storage manager that initializes all storage subsystems
pub struct Storage {
    db: Arc<Database>,
    pub chat_sessions: ChatSessionStorage,
}

impl Storage {
    /// Create a new storage instance at the given path.
    ///
    /// This will create the database file if it doesn't exist and initialize
    /// all required tables.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let db = Arc::new(Database::create(path)?);
        let chat_sessions = ChatSessionStorage::new(db.clone())?;

        Ok(Self { db, chat_sessions })
    }

    /// Get a reference to the underlying database
    pub fn get_db(&self) -> Arc<Database> {
        self.db.clone()
    }
}
