//! Chat session storage - byte-level API for chat session persistence.
//!
//! Each entry is one serialized session snapshot keyed by session id. The
//! table name is the fixed namespace under which every snapshot lives.

use anyhow::Result;
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use std::sync::Arc;

const CHAT_SESSIONS_TABLE: TableDefinition<&str, &[u8]> =
    TableDefinition::new("chat_sessions");

/// Low-level chat session storage with byte-level API
#[derive(Debug, Clone)]
pub struct ChatSessionStorage {
    db: Arc<Database>,
}

impl ChatSessionStorage {
    pub fn new(db: Arc<Database>) -> Result<Self> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(CHAT_SESSIONS_TABLE)?;
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Store a raw session snapshot, replacing any previous one.
    pub fn put_raw(&self, id: &str, data: &[u8]) -> Result<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CHAT_SESSIONS_TABLE)?;
            table.insert(id, data)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get a raw session snapshot by ID
    pub fn get_raw(&self, id: &str) -> Result<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CHAT_SESSIONS_TABLE)?;

        if let Some(data) = table.get(id)? {
            Ok(Some(data.value().to_vec()))
        } else {
            Ok(None)
        }
    }

    /// List all raw session snapshots
    pub fn list_raw(&self) -> Result<Vec<(String, Vec<u8>)>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CHAT_SESSIONS_TABLE)?;

        let mut sessions = Vec::new();
        for item in table.iter()? {
            let (key, value) = item?;
            sessions.push((key.value().to_string(), value.value().to_vec()));
        }

        Ok(sessions)
    }

    /// Check if a session exists
    pub fn exists(&self, id: &str) -> Result<bool> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CHAT_SESSIONS_TABLE)?;
        Ok(table.get(id)?.is_some())
    }

    /// Count stored sessions
    pub fn count(&self) -> Result<usize> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CHAT_SESSIONS_TABLE)?;
        Ok(table.len()? as usize)
    }

    /// Delete a session by ID
    pub fn delete(&self, id: &str) -> Result<bool> {
        let write_txn = self.db.begin_write()?;
        let existed = {
            let mut table = write_txn.open_table(CHAT_SESSIONS_TABLE)?;
            table.remove(id)?.is_some()
        };
        write_txn.commit()?;
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn create_test_storage() -> ChatSessionStorage {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Arc::new(Database::create(db_path).unwrap());
        ChatSessionStorage::new(db).unwrap()
    }

    #[test]
    fn test_put_and_get_raw() {
        let storage = create_test_storage();

        let data = b"session snapshot";
        storage.put_raw("session-001", data).unwrap();

        let retrieved = storage.get_raw("session-001").unwrap();
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap(), data);
    }

    #[test]
    fn test_put_replaces_previous_snapshot() {
        let storage = create_test_storage();

        storage.put_raw("session-001", b"first").unwrap();
        storage.put_raw("session-001", b"second").unwrap();

        let retrieved = storage.get_raw("session-001").unwrap();
        assert_eq!(retrieved.unwrap(), b"second");
        assert_eq!(storage.count().unwrap(), 1);
    }

    #[test]
    fn test_get_nonexistent() {
        let storage = create_test_storage();

        let result = storage.get_raw("nonexistent").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_list_raw() {
        let storage = create_test_storage();

        storage.put_raw("session-001", b"data1").unwrap();
        storage.put_raw("session-002", b"data2").unwrap();

        let sessions = storage.list_raw().unwrap();
        assert_eq!(sessions.len(), 2);
    }

    #[test]
    fn test_exists_and_delete() {
        let storage = create_test_storage();

        assert!(!storage.exists("session-001").unwrap());

        storage.put_raw("session-001", b"data").unwrap();
        assert!(storage.exists("session-001").unwrap());

        let deleted = storage.delete("session-001").unwrap();
        assert!(deleted);
        assert!(!storage.exists("session-001").unwrap());

        // Deleting again should return false
        let deleted_again = storage.delete("session-001").unwrap();
        assert!(!deleted_again);
    }

    #[test]
    fn test_count() {
        let storage = create_test_storage();

        assert_eq!(storage.count().unwrap(), 0);

        storage.put_raw("session-001", b"data1").unwrap();
        storage.put_raw("session-002", b"data2").unwrap();
        assert_eq!(storage.count().unwrap(), 2);
    }
}
