//! ChatStream Core - typed client for a streaming chat and RAG bot backend.
//!
//! The backend speaks two small protocols this crate implements the client
//! side of:
//!
//! - a streaming chat transport (`POST /chat/stream`) whose response body is
//!   a sequence of `data: <fragment>` frames ending in a `data: [DONE]`
//!   sentinel, reconciled after completion against the canonical message
//!   endpoint;
//! - an asynchronous ingestion flow (`POST /bots/{id}/documents` plus
//!   `GET /bots/{id}/status`) tracked to completion by fixed-interval
//!   polling.
//!
//! Around those, the crate keeps the client-side conversation transcript:
//! append-only sessions persisted through `chatstream-storage`, with
//! auto-derived titles and most-recent-first listing.

pub mod bots;
pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod session;

mod http_client;

pub use bots::{ALLOWED_EXTENSIONS, ProgressCallback, UploadOptions, validate_document_filename};
pub use chat::{ChatTurn, HistoryMessage, SESSION_ID_HEADER};
pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use session::{SessionStore, Transcript};
