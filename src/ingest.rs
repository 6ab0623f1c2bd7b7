//! Log ingestion
//!
//! Turns an uploaded log (a request body or a local file) into text and
//! asks the completion service for a one-shot summary. Summaries are
//! independent of every chat transcript.

use crate::error::{FailureReport, Result, TroubleshootError};
use crate::prompts::{build_log_summary_prompt, LOG_SUMMARY_SYSTEM_PROMPT};
use crate::providers::{extract_text, CompletionAdapter, Message};
use anyhow::Context;
use serde::Serialize;
use std::path::Path;

/// Text substituted for a log that could not be read
pub const UNREADABLE_PLACEHOLDER: &str = "<unable to read file>";

/// Decode raw log bytes to text
///
/// Valid UTF-8 is used as-is. Anything else is decoded as Latin-1, which
/// maps every byte to one character and cannot fail.
///
/// # Examples
///
/// ```
/// use troubleshoot::ingest::decode_log;
///
/// assert_eq!(decode_log(b"eth0 down"), "eth0 down");
/// assert_eq!(decode_log(&[0x63, 0x61, 0x66, 0xE9]), "café");
/// ```
pub fn decode_log(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(e) => {
            tracing::warn!(
                "Log is not valid UTF-8 ({}), decoding as Latin-1",
                e
            );
            bytes.iter().map(|&b| b as char).collect()
        }
    }
}

/// Whether a file name carries one of the accepted extensions
///
/// Comparison is case-insensitive; names without an extension are rejected.
pub fn is_supported_log_file(name: &str, allowed_extensions: &[String]) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            allowed_extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Reject a file name whose extension is not accepted
///
/// # Errors
///
/// Returns [`TroubleshootError::FileLoad`] naming the accepted extensions
pub fn check_log_file(name: &str, allowed_extensions: &[String]) -> Result<()> {
    if is_supported_log_file(name, allowed_extensions) {
        Ok(())
    } else {
        Err(TroubleshootError::FileLoad(format!(
            "Unsupported log file '{}'. Accepted extensions: {}",
            name,
            allowed_extensions.join(", ")
        ))
        .into())
    }
}

/// Decode an in-memory payload, substituting the placeholder when too large
pub fn read_log_bytes(bytes: &[u8], max_bytes: usize) -> String {
    if bytes.len() > max_bytes {
        tracing::warn!(
            "Log payload of {} bytes exceeds limit of {} bytes",
            bytes.len(),
            max_bytes
        );
        return UNREADABLE_PLACEHOLDER.to_string();
    }
    decode_log(bytes)
}

/// Read and decode a log file
///
/// Never fails: a missing or unreadable file, or one larger than
/// `max_bytes`, reads as [`UNREADABLE_PLACEHOLDER`].
pub async fn read_log_file(path: &Path, max_bytes: usize) -> String {
    match load_bytes(path, max_bytes).await {
        Ok(bytes) => decode_log(&bytes),
        Err(e) => {
            tracing::warn!("Unable to read log file {}: {:#}", path.display(), e);
            UNREADABLE_PLACEHOLDER.to_string()
        }
    }
}

async fn load_bytes(path: &Path, max_bytes: usize) -> Result<Vec<u8>> {
    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > max_bytes as u64 {
        return Err(TroubleshootError::FileLoad(format!(
            "{} bytes exceeds limit of {} bytes",
            metadata.len(),
            max_bytes
        ))
        .into());
    }
    Ok(tokio::fs::read(path).await?)
}

/// The two messages of a summary request
pub fn summary_messages(log_text: &str) -> Vec<Message> {
    vec![
        Message::system(LOG_SUMMARY_SYSTEM_PROMPT),
        Message::user(build_log_summary_prompt(log_text)),
    ]
}

/// Ask the completion service to summarize a decoded log
///
/// # Errors
///
/// Returns the adapter's failure with summary context attached
pub async fn summarize_log(
    adapter: &dyn CompletionAdapter,
    model: &str,
    log_text: &str,
) -> Result<String> {
    tracing::debug!("Requesting log summary for {} chars", log_text.len());

    let raw = adapter
        .complete(&summary_messages(log_text), model)
        .await
        .context("Error calling the completion service for log summary")?;

    Ok(extract_text(&raw))
}

/// Decoded log plus its summary outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogReport {
    /// Decoded text (or the placeholder)
    pub content: String,
    /// Summary, when the request succeeded
    pub summary: Option<String>,
    /// Set when the request failed
    pub failure: Option<FailureReport>,
}

/// Summarize already-decoded text, capturing any failure in the report
pub async fn ingest_log(adapter: &dyn CompletionAdapter, model: &str, content: String) -> LogReport {
    match summarize_log(adapter, model, &content).await {
        Ok(summary) => LogReport {
            content,
            summary: Some(summary),
            failure: None,
        },
        Err(err) => {
            tracing::error!("Log summary failed: {:#}", err);
            LogReport {
                content,
                summary: None,
                failure: Some(FailureReport::from_error(&err)),
            }
        }
    }
}
