//! Error types for the client

use std::time::Duration;

use thiserror::Error;

/// Client error types
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document processing failed: {0}")]
    JobFailed(String),

    #[error("gave up polling after {waited:?}")]
    PollTimeout { waited: Duration },

    #[error("unsupported file type: {0}")]
    UnsupportedFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Turn a non-2xx response into an [`ClientError::Api`], consuming the body.
pub(crate) async fn response_to_error(response: reqwest::Response) -> ClientError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();

    // Truncate error bodies so a large response does not flood logs.
    const MAX_ERROR_BODY: usize = 512;
    let message = if body.chars().count() > MAX_ERROR_BODY {
        let truncated: String = body.chars().take(MAX_ERROR_BODY).collect();
        format!("{}... [truncated]", truncated)
    } else {
        body
    };

    ClientError::Api { status, message }
}
