//! RAG bot models mirroring the backend wire format.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a bot's knowledge base.
///
/// Moves monotonically through creating → processing → ready | error; a
/// terminal status only changes again on an explicit re-upload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BotStatus {
    Creating,
    Processing,
    Ready,
    Error,
}

impl BotStatus {
    /// Terminal statuses stop the status poller.
    pub fn is_terminal(self) -> bool {
        matches!(self, BotStatus::Ready | BotStatus::Error)
    }

    /// Wire-format name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            BotStatus::Creating => "creating",
            BotStatus::Processing => "processing",
            BotStatus::Ready => "ready",
            BotStatus::Error => "error",
        }
    }
}

/// Progress detail reported while a document is being ingested
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingProgress {
    pub current_step: String,
    pub total_steps: u32,
    pub completed_steps: u32,
    pub message: String,
}

/// A document ingested into a bot's knowledge base
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub filename: String,
    pub added_at: String,
    #[serde(rename = "chunks")]
    pub chunk_count: u32,
}

/// A RAG bot as reported by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagBot {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: String,
    #[serde(default)]
    pub documents: Vec<DocumentInfo>,
    #[serde(default)]
    pub document_count: u32,
    pub status: BotStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_progress: Option<ProcessingProgress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Typed decode of `GET /bots/{id}/status`
#[derive(Debug, Clone, Deserialize)]
pub struct BotStatusReport {
    pub status: BotStatus,
    #[serde(default)]
    pub processing_progress: Option<ProcessingProgress>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_terminality() {
        assert!(BotStatus::Ready.is_terminal());
        assert!(BotStatus::Error.is_terminal());
        assert!(!BotStatus::Creating.is_terminal());
        assert!(!BotStatus::Processing.is_terminal());
    }

    #[test]
    fn test_status_report_decodes_wire_format() {
        let report: BotStatusReport = serde_json::from_str(
            r#"{
                "status": "processing",
                "processing_progress": {
                    "current_step": "Splitting document",
                    "total_steps": 3,
                    "completed_steps": 1,
                    "message": "Splitting into chunks"
                },
                "error_message": null
            }"#,
        )
        .unwrap();

        assert_eq!(report.status, BotStatus::Processing);
        let progress = report.processing_progress.unwrap();
        assert_eq!(progress.completed_steps, 1);
        assert_eq!(progress.total_steps, 3);
    }

    #[test]
    fn test_bot_decodes_document_chunk_key() {
        let bot: RagBot = serde_json::from_str(
            r#"{
                "id": "bot-1",
                "name": "Handbook",
                "description": "",
                "created_at": "2026-01-05T10:00:00",
                "documents": [
                    {"filename": "guide.pdf", "added_at": "2026-01-05T10:05:00", "chunks": 42}
                ],
                "document_count": 1,
                "status": "ready"
            }"#,
        )
        .unwrap();

        assert_eq!(bot.documents[0].chunk_count, 42);
        assert_eq!(bot.status, BotStatus::Ready);
        assert!(bot.processing_progress.is_none());
    }

    #[test]
    fn test_unknown_status_fails_loudly() {
        let result = serde_json::from_str::<BotStatusReport>(r#"{"status": "paused"}"#);
        assert!(result.is_err());
    }
}
