use anyhow::Result;
use std::path::PathBuf;

const CHATSTREAM_DIR: &str = ".chatstream";
const DB_FILE: &str = "chatstream.db";

/// Environment variable to override the ChatStream directory.
const CHATSTREAM_DIR_ENV: &str = "CHATSTREAM_DIR";

/// Resolve the ChatStream data directory.
/// Priority: CHATSTREAM_DIR env var > ~/.chatstream/
fn resolve_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(CHATSTREAM_DIR_ENV)
        && !dir.trim().is_empty()
    {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(CHATSTREAM_DIR))
        .ok_or_else(|| anyhow::anyhow!("Failed to determine home directory"))
}

/// Resolve the database path, creating the data directory if needed.
///
/// An explicit override wins over the resolved default location.
pub fn resolve_database_path(override_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(PathBuf::from(path));
    }
    let dir = resolve_data_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join(DB_FILE))
}
