use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rift_meta::config::AppConfig;
use rift_meta::models::{CohortKey, MetaSummary};
use rift_meta::pipeline::AggregationPipeline;
use rift_meta::source::DataLakeSource;
use rift_meta::storage::{ArtifactKind, FsArtifactSink, ParquetWriter, StorageConfig};

#[derive(Parser)]
#[command(name = "rift-meta")]
#[command(about = "Champion meta aggregation over ranked match records")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate a cohort's matches and write the artifacts
    Aggregate {
        /// Game version (e.g. "15.20")
        #[arg(long)]
        patch: Option<String>,

        /// Queue label
        #[arg(long)]
        queue: Option<String>,

        /// Aggregate but don't write anything
        #[arg(long)]
        dry_run: bool,

        /// Skip the Parquet export
        #[arg(long)]
        no_parquet: bool,
    },

    /// Print the stored executive summary for a cohort
    Summary {
        /// Game version (e.g. "15.20")
        #[arg(long)]
        patch: Option<String>,

        /// Queue label
        #[arg(long)]
        queue: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level;
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting rift-meta v{}", env!("CARGO_PKG_VERSION"));

    let storage = StorageConfig::new(config.data_dir.clone());

    match cli.command {
        Commands::Aggregate {
            patch,
            queue,
            dry_run,
            no_parquet,
        } => {
            let cohort = select_cohort(&mut config, patch, queue)?;

            let source = Arc::new(DataLakeSource::new(storage.clone(), config.source.clone()));
            let sink = Arc::new(
                FsArtifactSink::new(storage.data_dir.clone())
                    .with_pretty(config.output.pretty_json),
            );

            let mut pipeline = AggregationPipeline::new(source, sink).with_dry_run(dry_run);
            if config.output.write_parquet && !no_parquet {
                pipeline = pipeline.with_parquet(ParquetWriter::new(storage.clone()));
            }

            let report = pipeline.run(&cohort).await?;

            println!("Aggregation complete for {}", report.cohort);
            println!("  Matches processed:    {}", report.matches_processed);
            println!("  Champions analyzed:   {}", report.champions_analyzed);
            println!("  Participants skipped: {}", report.participants_skipped);
            println!("  Duplicates dropped:   {}", report.duplicates_dropped);
            println!("  Load failures:        {}", report.load_failures);
            println!("  Input fingerprint:    {}", report.input_fingerprint);
            println!("  Duration:             {:?}", report.duration);
            if report.aggregation_files.is_empty() {
                println!("  No artifacts written");
            } else {
                println!("  Artifacts:");
                for key in &report.aggregation_files {
                    println!("    {}", key);
                }
            }
            if let Some(path) = &report.parquet_export {
                println!("  Parquet export:       {}", path.display());
            }
        }

        Commands::Summary { patch, queue } => {
            let cohort = select_cohort(&mut config, patch, queue)?;
            let path = storage
                .aggregated_dir(&cohort)
                .join(ArtifactKind::MetaSummary.filename());

            let contents = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("No summary found at {:?}", path))?;
            let summary: MetaSummary = serde_json::from_str(&contents)
                .with_context(|| format!("Invalid summary at {:?}", path))?;

            print_summary(&summary);
        }
    }

    Ok(())
}

/// Apply CLI cohort overrides and validate the result.
fn select_cohort(
    config: &mut AppConfig,
    patch: Option<String>,
    queue: Option<String>,
) -> Result<CohortKey> {
    if let Some(patch) = patch {
        config.cohort.patch = patch;
    }
    if let Some(queue) = queue {
        config.cohort.queue_type = queue;
    }
    config.validate()?;
    Ok(config.cohort.key())
}

fn print_summary(summary: &MetaSummary) {
    println!(
        "Patch {}: {} matches, {} champions ({} reliability)",
        summary.patch,
        summary.total_matches_analyzed,
        summary.champions_with_data,
        summary.reliability_assessment
    );
    println!(
        "Collected {}",
        summary.data_collection_date.format("%Y-%m-%d %H:%M UTC")
    );

    let overview = &summary.meta_overview;

    println!("\nTop win rate:");
    for e in &overview.top_10_by_win_rate {
        println!(
            "  {:>2}. {:<16} {:>6.2}%  pick {:>5.2}%  KDA {:.2}  {}",
            e.rank, e.champion, e.win_rate, e.pick_rate, e.avg_kda, e.primary_position
        );
    }

    println!("\nTop pick rate:");
    for e in &overview.top_10_by_pick_rate {
        println!(
            "  {:>2}. {:<16} {:>6.2}%  win {:>6.2}%  games {}",
            e.rank, e.champion, e.pick_rate, e.win_rate, e.games
        );
    }

    println!("\nTop gold efficiency:");
    for e in &overview.top_10_gold_efficient {
        println!(
            "  {:>2}. {:<16} {:>6.2}  gold/min {:.2}  {}",
            e.rank, e.champion, e.gold_efficiency, e.avg_gold_per_min, e.primary_position
        );
    }

    println!("\nTop vision control:");
    for e in &overview.top_10_vision_control {
        println!(
            "  {:>2}. {:<16} {:>5.2}/min  score {:.1}  {}",
            e.rank, e.champion, e.avg_vision_per_min, e.avg_vision_score, e.primary_position
        );
    }

    println!("\nRole economy:");
    for (role, economy) in summary.role_economy.iter() {
        println!(
            "  {:<8} gold/min {:>7.2}  vision/min {:>5.2}  win {:>6.2}%",
            role, economy.avg_gold_per_min, economy.avg_vision_per_min, economy.win_rate
        );
    }

    let objectives = &summary.objective_importance;
    println!("\nObjective win rates:");
    for (name, record) in [
        ("first_blood", &objectives.first_blood),
        ("first_tower", &objectives.first_tower),
        ("first_dragon", &objectives.first_dragon),
        ("first_baron", &objectives.first_baron),
    ] {
        println!(
            "  {:<12} {:>6.2}%  ({} games)",
            name, record.win_rate, record.games
        );
    }

    println!();
    for note in &summary.data_quality_notes {
        println!("{}", note);
    }
}
