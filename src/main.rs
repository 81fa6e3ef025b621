//! motifscan - Motif analysis command-line tool
//!
//! Analyzes a symbolic score (JSON note-sequence model) for recurring
//! melodic/rhythmic motifs and writes a JSON report of motifs and their
//! located instances.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use motifscan::config::AnalysisConfig;
use motifscan::report;
use motifscan::services::{load_score, AnalysisAggregator, FuzzyMatcher, MotifDetector};

/// Command-line arguments for motifscan
#[derive(Parser, Debug)]
#[command(name = "motifscan")]
#[command(about = "Analyze symbolic scores for recurring musical motifs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a score file for motifs
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Path to the score JSON file
    input: PathBuf,

    /// Output JSON file path (default: print to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Optional TOML configuration file; command-line flags override it
    #[arg(long, env = "MOTIFSCAN_CONFIG")]
    config: Option<PathBuf>,

    /// Minimum notes in a motif
    #[arg(long)]
    min_length: Option<usize>,

    /// Maximum notes in a motif
    #[arg(long)]
    max_length: Option<usize>,

    /// Minimum times a pattern must occur to become a motif
    #[arg(long)]
    min_occurrences: Option<usize>,

    /// Semitone tolerance for interval matching
    #[arg(long)]
    interval_tolerance: Option<u32>,

    /// Normalized duration tolerance for rhythm matching (0.0 = exact)
    #[arg(long)]
    rhythm_tolerance: Option<f64>,

    /// Minimum confidence for instance matching
    #[arg(long)]
    min_confidence: Option<f64>,

    /// Weight of the interval sub-score in combined confidence
    #[arg(long)]
    interval_weight: Option<f64>,
}

impl AnalyzeArgs {
    /// Resolve the effective configuration: file (or defaults), then flags
    fn resolve_config(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_toml_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => AnalysisConfig::default(),
        };

        if let Some(min_length) = self.min_length {
            config.detection.min_length = min_length;
        }
        if let Some(max_length) = self.max_length {
            config.detection.max_length = max_length;
        }
        if let Some(min_occurrences) = self.min_occurrences {
            config.detection.min_occurrences = min_occurrences;
        }
        if let Some(interval_tolerance) = self.interval_tolerance {
            config.matching.interval_tolerance = interval_tolerance;
        }
        if let Some(rhythm_tolerance) = self.rhythm_tolerance {
            config.matching.rhythm_tolerance = rhythm_tolerance;
        }
        if let Some(min_confidence) = self.min_confidence {
            config.matching.min_confidence = min_confidence;
        }
        if let Some(interval_weight) = self.interval_weight {
            config.matching.interval_weight = interval_weight;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "motifscan=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Analyze(args) => run_analyze(&args),
    }
}

fn run_analyze(args: &AnalyzeArgs) -> Result<()> {
    let config = args.resolve_config()?;

    let score = load_score(&args.input)
        .with_context(|| format!("failed to load score {}", args.input.display()))?;
    info!(
        "Loaded {} notes across {} parts",
        score.total_notes(),
        score.parts.len()
    );
    if let Some(work) = &score.meta.work {
        info!("Work: {}", work);
    }
    if let Some(composer) = &score.meta.composer {
        info!("Composer: {}", composer);
    }

    info!(
        "Detecting motifs (length {}-{})",
        config.detection.min_length, config.detection.max_length
    );
    let detector = MotifDetector::new(config.detection.clone())?;
    let motifs = detector.detect(&score)?;
    info!("Found {} recurring motifs", motifs.len());

    let matcher = FuzzyMatcher::new(config.matching.clone())?;
    let mut instances = Vec::new();
    for motif in &motifs {
        let found = matcher.find_instances(motif, &score)?;
        info!(
            "{}: {} instances - {}",
            motif.id,
            found.len(),
            motif.description
        );
        instances.extend(found);
    }
    info!("Total instances found: {}", instances.len());

    let analysis_notes = format!(
        "Detected with min_length={}, max_length={}, min_occurrences={}",
        config.detection.min_length, config.detection.max_length, config.detection.min_occurrences
    );
    let analysis =
        AnalysisAggregator::assemble(&score.meta, motifs, instances, Some(&analysis_notes))?;

    match &args.output {
        Some(path) => {
            report::save_json(&analysis, path)
                .with_context(|| format!("failed to write report {}", path.display()))?;
            info!("Results saved to {}", path.display());
        }
        None => println!("{}", report::to_json_string(&analysis)?),
    }

    Ok(())
}
