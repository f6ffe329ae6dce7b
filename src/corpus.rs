//! Streaming access to the newline-delimited corpus.
//!
//! One record per line; a record's ordinal is its 1-based position in the
//! stream and is assigned by the caller while consuming the line stream.

use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::wrappers::LinesStream;

/// Open a corpus file as an async stream of lines.
pub async fn open_lines(path: &Path) -> Result<LinesStream<BufReader<File>>> {
    let file = File::open(path)
        .await
        .with_context(|| format!("failed to open corpus: {}", path.display()))?;
    Ok(LinesStream::new(BufReader::new(file).lines()))
}

/// Pull the message body out of one corpus record.
///
/// A missing or non-string text field reads as an empty message; a line
/// that is not valid JSON is an error so the caller can apply its
/// malformed-record policy.
pub fn message_text(line: &str, text_field: &str) -> Result<String> {
    let record: serde_json::Value =
        serde_json::from_str(line).context("record line is not valid JSON")?;
    Ok(record
        .get(text_field)
        .and_then(|value| value.as_str())
        .unwrap_or_default()
        .to_string())
}
