use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use uptalk::backfill::{self, BackfillConfig, BackfillSummary};
use uptalk::pipeline::{self, ClassifyConfig, RunSummary};
use uptalk::profile::{Language, LanguageProfile};
use uptalk::stats::CollectionStats;
use uptalk::ProcessAnnotator;

#[derive(Parser, Debug)]
#[command(name = "uptalk")]
#[command(about = "Classify rising declaratives and polar questions in a social-media corpus")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Traverse a corpus once, classifying every candidate sentence
    Classify {
        /// Newline-delimited corpus (one JSON record per line)
        #[arg(long)]
        input: PathBuf,

        /// Language profile selecting lexicons and default output paths
        #[arg(long, default_value = "en")]
        language: Language,

        /// External annotator command (sentence in, JSON token array out)
        #[arg(long)]
        annotator_cmd: String,

        /// Rising-declarative output file (default: rd_<lang>.txt)
        #[arg(long)]
        rd_out: Option<PathBuf>,

        /// Polar-question output file (default: pq_<lang>.txt)
        #[arg(long)]
        pq_out: Option<PathBuf>,

        /// Rejection log file (default: rejected_<lang>.txt)
        #[arg(long)]
        rejected_out: Option<PathBuf>,

        /// Write the run summary as JSON to this path
        #[arg(long)]
        stats_out: Option<PathBuf>,

        /// Suppress the console progress spinner
        #[arg(long)]
        no_progress: bool,

        /// Abort on the first malformed record or annotator failure
        #[arg(long)]
        fail_fast: bool,
    },

    /// Join classified sentences back to their full source messages
    Backfill {
        /// Category output file from a classification pass
        #[arg(long)]
        classified: PathBuf,

        /// The corpus the classification pass ran over
        #[arg(long)]
        corpus: PathBuf,

        /// Augmented output file
        #[arg(long)]
        out: PathBuf,

        /// Language profile (selects the corpus text field)
        #[arg(long, default_value = "en")]
        language: Language,

        /// Suppress the console progress spinner
        #[arg(long)]
        no_progress: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // WHY: structured JSON logging keeps diagnostics separable from the
    // operator summary printed to stdout
    tracing_subscriber::fmt().with_target(false).json().init();

    let cli = Cli::parse();

    match cli.command {
        Command::Classify {
            input,
            language,
            annotator_cmd,
            rd_out,
            pq_out,
            rejected_out,
            stats_out,
            no_progress,
            fail_fast,
        } => {
            if !input.exists() {
                anyhow::bail!("Input corpus does not exist: {}", input.display());
            }

            let profile = LanguageProfile::for_language(language);
            let config = ClassifyConfig {
                input,
                rd_out: rd_out.unwrap_or_else(|| profile.default_rd_path()),
                pq_out: pq_out.unwrap_or_else(|| profile.default_pq_path()),
                rejected_out: rejected_out.unwrap_or_else(|| profile.default_rejected_path()),
                fail_fast,
                show_progress: !no_progress,
            };

            info!(?config, "Parsed classification configuration");

            let mut annotator = ProcessAnnotator::spawn(&annotator_cmd)?;
            let summary = pipeline::run_classification(&config, &profile, &mut annotator).await?;

            print_summary(&summary);

            if let Some(stats_path) = stats_out {
                let json = serde_json::to_string_pretty(&summary)?;
                tokio::fs::write(&stats_path, json).await?;
                info!("Wrote run summary to {}", stats_path.display());
            }
        }

        Command::Backfill {
            classified,
            corpus,
            out,
            language,
            no_progress,
        } => {
            if !classified.exists() {
                anyhow::bail!("Classified file does not exist: {}", classified.display());
            }
            if !corpus.exists() {
                anyhow::bail!("Corpus does not exist: {}", corpus.display());
            }

            let profile = LanguageProfile::for_language(language);
            let config = BackfillConfig {
                classified,
                corpus,
                out,
                show_progress: !no_progress,
            };

            info!(?config, "Parsed back-fill configuration");

            let summary = backfill::run_backfill(&config, &profile).await?;
            print_backfill_summary(&summary);
        }
    }

    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("Total records processed: {}", summary.records);
    if summary.malformed_records > 0 {
        println!("Malformed records skipped: {}", summary.malformed_records);
    }
    if summary.annotator_failures > 0 {
        println!("Annotator failures skipped: {}", summary.annotator_failures);
    }
    println!("Total sentences analyzed: {}", summary.total_sentences);
    println!("Total RDs found: {}", summary.rd_count);
    println!("Total PQs found: {}", summary.pq_count);
    println!("Total rejected: {}", summary.rejected_count);
    println!();

    print_collection_stats("Dataset Statistics", &summary.dataset);
    print_collection_stats("Question Sentences Statistics", &summary.questions);
    if summary.rd_count > 0 {
        print_collection_stats("RD Statistics", &summary.rising_declaratives);
    }
    if summary.pq_count > 0 {
        print_collection_stats("PQ Statistics", &summary.polar_questions);
    }
}

fn print_collection_stats(description: &str, stats: &CollectionStats) {
    println!("{description}:");
    println!("  total sentences: {}", stats.sentences);
    println!("  total words: {}", stats.total_tokens);
    println!("  avg sentence length: {:.2}", stats.mean_tokens);
    println!();
}

fn print_backfill_summary(summary: &BackfillSummary) {
    println!("Classified entries: {}", summary.classified_lines);
    println!("Resolved with full message: {}", summary.resolved);
    if summary.missing > 0 {
        println!("Unresolved ordinals: {}", summary.missing);
    }
    if summary.skipped_lines > 0 {
        println!("Unparseable lines skipped: {}", summary.skipped_lines);
    }
}
