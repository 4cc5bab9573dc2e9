//! RAG bot management: CRUD, document upload, and status polling.

use std::path::Path;

use serde::Serialize;
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use crate::client::ApiClient;
use crate::error::{ClientError, Result, response_to_error};
use crate::models::{BotStatus, BotStatusReport, ProcessingProgress, RagBot};

/// File extensions the backend accepts for ingestion.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["pdf", "md", "xlsx", "xls"];

/// Failure message used when the server reports an error without detail.
const GENERIC_JOB_FAILURE: &str = "document processing failed";

#[derive(Serialize)]
struct CreateBotRequest<'a> {
    name: &'a str,
    description: &'a str,
}

/// Callback observing ingestion progress while polling.
pub type ProgressCallback<'a> = &'a mut (dyn FnMut(&ProcessingProgress) + Send);

/// Options controlling the upload flow.
///
/// Waiting for readiness and observing progress are independent choices: a
/// progress callback without `wait_for_ready` is never invoked, and waiting
/// without a callback polls silently.
#[derive(Default)]
pub struct UploadOptions<'a> {
    pub wait_for_ready: bool,
    pub on_progress: Option<ProgressCallback<'a>>,
}

/// Check a filename against the accepted ingestion formats.
///
/// Runs client-side so an unsupported file never costs a round trip.
pub fn validate_document_filename(filename: &str) -> Result<()> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(ClientError::UnsupportedFile(filename.to_string())),
    }
}

impl ApiClient {
    /// Create a bot.
    pub async fn create_bot(&self, name: &str, description: &str) -> Result<RagBot> {
        let body = CreateBotRequest { name, description };
        let response = self.http.post(self.url("/bots")).json(&body).send().await?;
        Self::decode_json(response).await
    }

    /// List all bots, newest first.
    pub async fn list_bots(&self) -> Result<Vec<RagBot>> {
        let response = self.http.get(self.url("/bots")).send().await?;
        Self::decode_json(response).await
    }

    /// Fetch one bot by id.
    pub async fn get_bot(&self, bot_id: &str) -> Result<RagBot> {
        let response = self
            .http
            .get(self.url(&format!("/bots/{bot_id}")))
            .send()
            .await?;
        Self::decode_json(response).await
    }

    /// Delete a bot and all its data.
    pub async fn delete_bot(&self, bot_id: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!("/bots/{bot_id}")))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(response_to_error(response).await);
        }
        Ok(())
    }

    /// Fetch the current ingestion status of a bot.
    pub async fn bot_status(&self, bot_id: &str) -> Result<BotStatusReport> {
        let response = self
            .http
            .get(self.url(&format!("/bots/{bot_id}/status")))
            .send()
            .await?;
        Self::decode_json(response).await
    }

    /// Upload a document into a bot's knowledge base.
    ///
    /// The extension is validated locally before any network call.
    pub async fn upload_document(&self, bot_id: &str, file: &Path) -> Result<()> {
        let filename = file
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ClientError::UnsupportedFile(file.display().to_string()))?
            .to_string();
        validate_document_filename(&filename)?;

        let bytes = tokio::fs::read(file).await?;
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.clone());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(self.url(&format!("/bots/{bot_id}/documents")))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(response_to_error(response).await);
        }
        info!(bot_id, filename = %filename, "document uploaded");
        Ok(())
    }

    /// Upload a document, then optionally wait for the bot to become ready.
    pub async fn upload_document_with(
        &self,
        bot_id: &str,
        file: &Path,
        options: UploadOptions<'_>,
    ) -> Result<()> {
        self.upload_document(bot_id, file).await?;
        if options.wait_for_ready {
            self.wait_until_ready(bot_id, options.on_progress).await?;
        }
        Ok(())
    }

    /// Poll the bot's status until a terminal state.
    ///
    /// The progress callback fires only for `processing` reports that carry
    /// progress detail. A transport or decode failure of any single poll
    /// fails the whole wait; the configured deadline bounds the total time
    /// spent polling.
    pub async fn wait_until_ready(
        &self,
        bot_id: &str,
        mut on_progress: Option<ProgressCallback<'_>>,
    ) -> Result<()> {
        let interval = self.config.poll_interval;
        let deadline = self.config.poll_deadline;
        let started = Instant::now();

        loop {
            let report = self.bot_status(bot_id).await?;

            match report.status {
                BotStatus::Ready => {
                    debug!(bot_id, "bot ready");
                    return Ok(());
                }
                BotStatus::Error => {
                    let message = report
                        .error_message
                        .filter(|m| !m.is_empty())
                        .unwrap_or_else(|| GENERIC_JOB_FAILURE.to_string());
                    return Err(ClientError::JobFailed(message));
                }
                BotStatus::Processing => {
                    if let (Some(callback), Some(progress)) =
                        (&mut on_progress, &report.processing_progress)
                    {
                        callback(progress);
                    }
                }
                BotStatus::Creating => {}
            }

            if let Some(deadline) = deadline {
                let waited = started.elapsed();
                if waited >= deadline {
                    return Err(ClientError::PollTimeout { waited });
                }
            }

            sleep(interval).await;
        }
    }
}
