//! Back-fill pass: re-join classified sentences to their full source
//! messages by corpus ordinal.
//!
//! Instead of rescanning the corpus per classified entry, the wanted
//! ordinals are gathered first and the corpus is traversed exactly once,
//! keeping only the messages those ordinals name.

use crate::corpus;
use crate::profile::LanguageProfile;
use anyhow::{Context, Result};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, warn};

/// Configuration for one back-fill pass
#[derive(Debug, Clone)]
pub struct BackfillConfig {
    /// Category output file from a classification pass
    pub classified: PathBuf,
    /// The corpus the classification pass ran over
    pub corpus: PathBuf,
    /// Augmented output file
    pub out: PathBuf,
    /// Show a progress spinner during the corpus scan
    pub show_progress: bool,
}

/// One parsed label line from a classified output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    pub ordinal: u64,
    pub sentence: String,
}

/// Counters for one back-fill pass
#[derive(Debug, Clone, Serialize)]
pub struct BackfillSummary {
    /// Label lines successfully parsed from the classified file
    pub classified_lines: u64,
    /// Non-empty lines that failed to parse and were skipped
    pub skipped_lines: u64,
    /// Entries joined with their full message
    pub resolved: u64,
    /// Entries whose ordinal had no message in the corpus
    pub missing: u64,
}

/// Parse one `"<label> <ordinal>: <sentence>"` line.
///
/// The ordinal is the last whitespace-separated word before the first
/// `": "`. Companion lines ("Full tweet: ...") and separator lines fail the
/// parse by construction.
pub fn parse_classified_line(line: &str) -> Option<ClassifiedLine> {
    let (prefix, sentence) = line.split_once(": ")?;
    let ordinal = prefix.split_whitespace().last()?.parse().ok()?;
    Some(ClassifiedLine {
        ordinal,
        sentence: sentence.to_string(),
    })
}

/// Join every classified sentence with its full source message.
///
/// Unresolvable ordinals (past the end of the corpus, malformed records,
/// or empty messages) are soft misses: the pair is skipped and counted,
/// never fatal.
pub async fn run_backfill(
    config: &BackfillConfig,
    profile: &LanguageProfile,
) -> Result<BackfillSummary> {
    info!(
        "Starting back-fill of {} from {}",
        config.classified.display(),
        config.corpus.display()
    );

    let (entries, skipped_lines) = load_classified(config).await?;
    let wanted: HashSet<u64> = entries.iter().map(|entry| entry.ordinal).collect();
    let messages = collect_messages(config, profile, &wanted).await?;

    let file = File::create(&config.out)
        .await
        .with_context(|| format!("failed to create output file: {}", config.out.display()))?;
    let mut writer = BufWriter::new(file);

    let mut resolved: u64 = 0;
    let mut missing: u64 = 0;
    for entry in &entries {
        match messages.get(&entry.ordinal) {
            Some(message) => {
                let augmented = format!("{}\n{}: {}\n", entry.sentence, entry.ordinal, message);
                writer.write_all(augmented.as_bytes()).await?;
                resolved += 1;
            }
            None => {
                debug!("No corpus message for ordinal {}", entry.ordinal);
                missing += 1;
            }
        }
    }
    writer.flush().await?;

    info!(
        "Back-fill complete: {} entries, {} resolved, {} missing",
        entries.len(),
        resolved,
        missing
    );

    Ok(BackfillSummary {
        classified_lines: entries.len() as u64,
        skipped_lines,
        resolved,
        missing,
    })
}

/// Read the classified file, keeping parsed label lines in file order
async fn load_classified(config: &BackfillConfig) -> Result<(Vec<ClassifiedLine>, u64)> {
    let mut lines = corpus::open_lines(&config.classified).await?;
    let mut entries = Vec::new();
    let mut skipped: u64 = 0;

    while let Some(line) = lines.next().await {
        let line = line.context("failed to read classified file")?;
        if line.trim().is_empty() || line.starts_with("Full tweet:") {
            // Companion and separator lines are part of the entry format
            continue;
        }
        match parse_classified_line(&line) {
            Some(entry) => entries.push(entry),
            None => {
                warn!("Skipping unparseable classified line: {}", line);
                skipped += 1;
            }
        }
    }

    Ok((entries, skipped))
}

/// One pass over the corpus, keeping only the messages the wanted ordinals
/// name. Empty messages stay out of the map so they resolve as misses.
async fn collect_messages(
    config: &BackfillConfig,
    profile: &LanguageProfile,
    wanted: &HashSet<u64>,
) -> Result<HashMap<u64, String>> {
    let mut lines = corpus::open_lines(&config.corpus).await?;
    let mut messages = HashMap::with_capacity(wanted.len());
    let progress = scan_progress(config.show_progress)?;

    let mut ordinal: u64 = 0;
    while let Some(line) = lines.next().await {
        let line =
            line.with_context(|| format!("failed to read corpus record {}", ordinal + 1))?;
        ordinal += 1;
        progress.inc(1);

        if !wanted.contains(&ordinal) {
            continue;
        }
        match corpus::message_text(&line, &profile.text_field) {
            Ok(text) if !text.is_empty() => {
                messages.insert(ordinal, text);
            }
            Ok(_) => debug!("Record {} has an empty message", ordinal),
            Err(e) => warn!("Malformed corpus record {}: {}", ordinal, e),
        }
    }
    progress.finish_and_clear();

    Ok(messages)
}

fn scan_progress(show: bool) -> Result<ProgressBar> {
    if !show {
        return Ok(ProgressBar::hidden());
    }
    let progress = ProgressBar::new_spinner();
    progress.set_style(ProgressStyle::with_template(
        "{spinner} scanning corpus {pos} records {per_sec}",
    )?);
    progress.enable_steady_tick(Duration::from_millis(100));
    Ok(progress)
}
