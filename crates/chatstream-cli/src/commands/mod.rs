pub mod bots;
pub mod chat;
pub mod sessions;

use anyhow::Result;
use chatstream_core::ApiClient;

pub async fn ping(client: &ApiClient) -> Result<()> {
    let message = client.ping().await?;
    println!("{message}");
    Ok(())
}

pub(crate) fn format_timestamp(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ms.to_string())
}
