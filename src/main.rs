use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tasksift::{
    evaluate_dataset, load_dataset, read_transcript, stages::detect_language, ExtractorConfig,
    HumanTaskList, TaskExtractor, TaskReport,
};

#[derive(Parser)]
#[command(name = "tasksift")]
#[command(author, version, about = "Action item extraction from meeting transcripts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract action items from a transcript
    Extract {
        /// Input transcript file (plain text); reads stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for the JSON report; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file for a human-readable task list
        #[arg(long)]
        human_readable: Option<PathBuf>,

        /// Skip every model (heuristic scoring and enrichment only)
        #[arg(long)]
        heuristics_only: bool,

        /// Entailment acceptance threshold (0-1), overrides ENTAIL_THRESHOLD
        #[arg(long)]
        threshold: Option<f64>,

        /// JSON lexicon file, overrides LEXICON_PATH
        #[arg(long)]
        lexicon: Option<PathBuf>,

        /// Resolve relative deadlines against this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show segmentation and candidates without scoring or enrichment
    Analyze {
        /// Input transcript file (plain text); reads stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// JSON lexicon file, overrides LEXICON_PATH
        #[arg(long)]
        lexicon: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Score the extractor against a labelled dataset
    Evaluate {
        /// Dataset file (JSON array of {transcript, expected})
        #[arg(short, long)]
        dataset: PathBuf,

        /// Resolve relative deadlines against this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// JSON lexicon file, overrides LEXICON_PATH
        #[arg(long)]
        lexicon: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            input,
            output,
            human_readable,
            heuristics_only,
            threshold,
            lexicon,
            date,
            verbose,
        } => {
            setup_logging(verbose);
            extract(
                input,
                output,
                human_readable,
                heuristics_only,
                threshold,
                lexicon,
                date,
            )
            .await
        }
        Commands::Analyze {
            input,
            lexicon,
            verbose,
        } => {
            setup_logging(verbose);
            analyze(input, lexicon)
        }
        Commands::Evaluate {
            dataset,
            date,
            lexicon,
            verbose,
        } => {
            setup_logging(verbose);
            evaluate(dataset, date, lexicon).await
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable
fn setup_logging(verbose: bool) {
    let level = if verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn load_config(lexicon: Option<PathBuf>) -> Result<ExtractorConfig> {
    let mut config = ExtractorConfig::from_env().context("Invalid configuration")?;
    if lexicon.is_some() {
        config.lexicon_path = lexicon;
    }
    Ok(config)
}

async fn extract(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    human_readable: Option<PathBuf>,
    heuristics_only: bool,
    threshold: Option<f64>,
    lexicon: Option<PathBuf>,
    date: Option<NaiveDate>,
) -> Result<()> {
    let mut config = load_config(lexicon)?;
    if let Some(threshold) = threshold {
        if !(0.0..=1.0).contains(&threshold) {
            bail!("--threshold must be within [0, 1], got {}", threshold);
        }
        config.entail_threshold = threshold;
    }
    if heuristics_only {
        info!("Skipping model loading (--heuristics-only)");
        config = config.heuristics_only();
    }

    info!("Loading transcript from {:?}", input.as_deref().unwrap_or(Path::new("stdin")));
    let text = read_transcript(input.as_deref())?;

    let extractor = TaskExtractor::new(config).context("Failed to initialise extractor")?;
    extractor.startup().await;

    let today = date.unwrap_or_else(|| Utc::now().date_naive());
    let tasks = extractor
        .extract_tasks_on(&text, today)
        .await
        .context("Extraction failed")?;
    extractor.shutdown().await;

    if let Some(path) = &human_readable {
        HumanTaskList::new(&tasks).write_file(path)?;
        info!("Human-readable output written to {:?}", path);
    }

    let report = TaskReport::new(tasks, detect_language(&text), today, heuristics_only);
    match &output {
        Some(path) => {
            report.write_json(path)?;
            info!("Output written to {:?}", path);
        }
        None => println!("{}", report.to_json()?),
    }

    info!("Complete: {} action items", report.metadata.total_tasks);
    Ok(())
}

fn analyze(input: Option<PathBuf>, lexicon: Option<PathBuf>) -> Result<()> {
    let text = read_transcript(input.as_deref())?;
    let extractor = TaskExtractor::new(load_config(lexicon)?.heuristics_only())
        .context("Failed to initialise extractor")?;
    let analysis = extractor.analyze(&text);

    println!("Transcript Analysis");
    println!("===================");
    println!("Language: {}", analysis.language);
    println!("Characters: {}", text.chars().count());
    println!();

    println!("Sentences ({})", analysis.sentences.len());
    println!("---------");
    for (index, sentence) in analysis.sentences.iter().enumerate() {
        let cue = if extractor.lexicon().has_verb_cue(sentence) { "*" } else { " " };
        println!("{} {:>3}. {}", cue, index + 1, sentence);
    }
    println!();

    println!("Candidates ({})", analysis.candidates.len());
    println!("----------");
    for candidate in &analysis.candidates {
        println!("- {}", candidate);
    }

    Ok(())
}

async fn evaluate(
    dataset: PathBuf,
    date: Option<NaiveDate>,
    lexicon: Option<PathBuf>,
) -> Result<()> {
    info!("Loading dataset from {:?}", dataset);
    let samples = load_dataset(&dataset)?;

    let mut config = load_config(lexicon)?;
    config.llm.disabled = true;

    let extractor = TaskExtractor::new(config).context("Failed to initialise extractor")?;
    extractor.startup().await;

    let today = date.unwrap_or_else(|| Utc::now().date_naive());
    let report = evaluate_dataset(&extractor, &samples, today)
        .await
        .context("Evaluation failed")?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
