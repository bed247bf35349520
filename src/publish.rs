use chrono::{DateTime, SecondsFormat, Utc};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{BackupError, Result};
use crate::transport::Transport;

/// Multipart payload sent to the webhook: one file part and one text part
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookMessage {
    pub file_field: &'static str,
    pub file_name: String,
    pub content_type: &'static str,
    pub file_bytes: Vec<u8>,
    pub text_field: &'static str,
    pub content: String,
}

/// File name for a backup taken at `at`, e.g.
/// `tile_backup_2025-10-19T08-05-09-123Z.png`
pub fn backup_file_name(at: DateTime<Utc>) -> String {
    let timestamp = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("tile_backup_{}.png", timestamp)
}

/// Write the composite into `dir`, creating the directory if needed
pub async fn save_backup(dir: &Path, file_name: &str, png: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .await
        .map_err(|source| BackupError::Persist {
            path: dir.to_path_buf(),
            source,
        })?;

    let path = dir.join(file_name);
    fs::write(&path, png)
        .await
        .map_err(|source| BackupError::Persist {
            path: path.clone(),
            source,
        })?;

    info!("Saved backup to {}", path.display());
    Ok(path)
}

/// Build the webhook message announcing a backup taken at `at`
pub fn backup_message(file_name: &str, png: Vec<u8>, at: DateTime<Utc>) -> WebhookMessage {
    WebhookMessage {
        file_field: "file",
        file_name: file_name.to_string(),
        content_type: "image/png",
        file_bytes: png,
        text_field: "content",
        // Discord renders <t:SECONDS:F> as a full local date and time
        content: format!("Backup created at <t:{}:F>", at.timestamp()),
    }
}

/// Send the message to the webhook.
///
/// A missing or blank webhook URL fails before anything goes on the wire.
pub async fn publish_backup<T: Transport>(
    transport: &T,
    webhook_url: Option<&str>,
    message: &WebhookMessage,
) -> Result<()> {
    let url = match webhook_url.map(str::trim) {
        Some(url) if !url.is_empty() => url,
        _ => return Err(BackupError::MissingWebhook),
    };

    transport
        .post_multipart(url, message)
        .await
        .map_err(BackupError::Publish)?;

    info!("Posted {} to webhook", message.file_name);
    Ok(())
}
