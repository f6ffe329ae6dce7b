//! Single-pass corpus traversal: segment each message, classify each
//! candidate sentence, route accepted sentences to category files, and log
//! rejections. Processing is strictly sequential by record ordinal; the
//! back-fill pass depends on ordinals matching input order.

use crate::annotator::Annotator;
use crate::classifier::{classify, Outcome};
use crate::corpus;
use crate::profile::LanguageProfile;
use crate::segmenter;
use crate::stats::{self, CollectionStats};
use anyhow::{Context, Result};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::{info, warn};

/// Configuration for one classification pass
#[derive(Debug, Clone)]
pub struct ClassifyConfig {
    /// Newline-delimited corpus to traverse
    pub input: PathBuf,
    /// Output file for rising declaratives
    pub rd_out: PathBuf,
    /// Output file for polar questions
    pub pq_out: PathBuf,
    /// Append-only rejection log
    pub rejected_out: PathBuf,
    /// Abort on the first malformed record or annotator failure
    pub fail_fast: bool,
    /// Show a progress spinner during the pass
    pub show_progress: bool,
}

/// End-of-run counters and per-collection statistics
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub records: u64,
    pub malformed_records: u64,
    pub annotator_failures: u64,
    pub total_sentences: u64,
    pub rd_count: u64,
    pub pq_count: u64,
    pub rejected_count: u64,
    pub dataset: CollectionStats,
    pub questions: CollectionStats,
    pub rising_declaratives: CollectionStats,
    pub polar_questions: CollectionStats,
}

/// HTML-style escaping for sentences and messages in category files.
/// Keeps every output line single-line and safe to re-parse.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Traverse the corpus once and classify every candidate sentence.
///
/// Output files are created at pipeline start and flushed at the end;
/// partial output survives an abort. Malformed records and annotator
/// failures are skipped with a warning unless `fail_fast` is set.
pub async fn run_classification<A: Annotator>(
    config: &ClassifyConfig,
    profile: &LanguageProfile,
    annotator: &mut A,
) -> Result<RunSummary> {
    info!(
        "Starting classification pass over {} ({})",
        config.input.display(),
        profile.language
    );

    let mut lines = corpus::open_lines(&config.input).await?;

    let mut rd_writer = create_writer(&config.rd_out).await?;
    let mut pq_writer = create_writer(&config.pq_out).await?;
    let mut rejected_writer = create_writer(&config.rejected_out).await?;

    let progress = record_progress(config.show_progress)?;

    let mut ordinal: u64 = 0;
    let mut malformed_records: u64 = 0;
    let mut annotator_failures: u64 = 0;
    let mut total_sentences: u64 = 0;
    let mut rd_count: u64 = 0;
    let mut pq_count: u64 = 0;
    let mut rejected_count: u64 = 0;

    let mut all_sentences: Vec<String> = Vec::new();
    let mut question_sentences: Vec<String> = Vec::new();
    let mut rd_sentences: Vec<String> = Vec::new();
    let mut pq_sentences: Vec<String> = Vec::new();

    while let Some(line) = lines.next().await {
        // A corpus read error is fatal regardless of policy: ordinals past
        // this point could no longer match input order
        let line =
            line.with_context(|| format!("failed to read corpus record {}", ordinal + 1))?;
        ordinal += 1;
        progress.inc(1);

        let message = match corpus::message_text(&line, &profile.text_field) {
            Ok(text) => text,
            Err(e) => {
                if config.fail_fast {
                    return Err(e.context(format!("malformed corpus record {ordinal}")));
                }
                warn!("Skipping malformed corpus record {}: {}", ordinal, e);
                malformed_records += 1;
                continue;
            }
        };

        for sentence in segmenter::segment(&message) {
            // Empty candidates from degenerate segmentation are dropped here,
            // not in the segmenter
            if sentence.is_empty() {
                continue;
            }

            total_sentences += 1;
            all_sentences.push(sentence.clone());
            if sentence.ends_with('?') {
                question_sentences.push(sentence.clone());
            }

            let annotation = match annotator.annotate(&sentence) {
                Ok(annotation) => annotation,
                Err(e) => {
                    if config.fail_fast {
                        return Err(
                            e.context(format!("annotator failed on record {ordinal}"))
                        );
                    }
                    warn!(
                        "Skipping sentence from record {} after annotator failure: {}",
                        ordinal, e
                    );
                    annotator_failures += 1;
                    continue;
                }
            };

            match classify(&sentence, &annotation, profile) {
                Outcome::RisingDeclarative(text) => {
                    rd_count += 1;
                    rd_sentences.push(text.clone());
                    write_category_entry(&mut rd_writer, "RD", ordinal, &text, &message).await?;
                }
                Outcome::PolarQuestion(text) => {
                    pq_count += 1;
                    pq_sentences.push(text.clone());
                    write_category_entry(&mut pq_writer, "PQ", ordinal, &text, &message).await?;
                }
                Outcome::Rejected(reason) => {
                    rejected_count += 1;
                    // Best-effort append; a failed log write never fails the pass
                    let entry = format!("Rejected due to {reason}: {sentence}\n");
                    if let Err(e) = rejected_writer.write_all(entry.as_bytes()).await {
                        warn!("Failed to append rejection log entry: {}", e);
                    }
                }
            }
        }
    }

    rd_writer.flush().await?;
    pq_writer.flush().await?;
    if let Err(e) = rejected_writer.flush().await {
        warn!("Failed to flush rejection log: {}", e);
    }
    progress.finish_and_clear();

    info!(
        "Classification pass complete: {} records, {} sentences, {} RD, {} PQ, {} rejected",
        ordinal, total_sentences, rd_count, pq_count, rejected_count
    );

    Ok(RunSummary {
        records: ordinal,
        malformed_records,
        annotator_failures,
        total_sentences,
        rd_count,
        pq_count,
        rejected_count,
        dataset: stats::aggregate(&all_sentences, annotator)?,
        questions: stats::aggregate(&question_sentences, annotator)?,
        rising_declaratives: stats::aggregate(&rd_sentences, annotator)?,
        polar_questions: stats::aggregate(&pq_sentences, annotator)?,
    })
}

async fn create_writer(path: &PathBuf) -> Result<BufWriter<File>> {
    let file = File::create(path)
        .await
        .with_context(|| format!("failed to create output file: {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn record_progress(show: bool) -> Result<ProgressBar> {
    if !show {
        return Ok(ProgressBar::hidden());
    }
    let progress = ProgressBar::new_spinner();
    progress.set_style(ProgressStyle::with_template(
        "{spinner} {pos} records {per_sec} ({elapsed})",
    )?);
    progress.enable_steady_tick(Duration::from_millis(100));
    Ok(progress)
}

/// One accepted sentence in a category file: the labeled sentence line, the
/// escaped full message for traceability, and a blank separator line
async fn write_category_entry<W: AsyncWrite + Unpin>(
    writer: &mut W,
    label: &str,
    ordinal: u64,
    sentence: &str,
    full_message: &str,
) -> Result<()> {
    let entry = format!(
        "{} {}: {}\nFull tweet: {}\n\n",
        label,
        ordinal,
        escape_text(sentence),
        escape_text(full_message)
    );
    writer.write_all(entry.as_bytes()).await?;
    Ok(())
}
