//! Aggregation pipeline.
//!
//! Coordinates one run for a cohort:
//! 1. Fetch match records from the source
//! 2. Parse and deduplicate them
//! 3. Run the five reducers concurrently
//! 4. Compose the executive summary
//! 5. Store the artifacts (and optionally the Parquet export)

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::task::spawn_blocking;
use tracing::{debug, info, warn};

use crate::calculate::{
    aggregate_champion_stats, aggregate_item_builds, aggregate_matchups,
    aggregate_objective_correlations, aggregate_role_meta, compose_summary, Aggregates,
};
use crate::models::{ingest, CohortKey, InputFingerprint, ParsedMatch};
use crate::source::{RecordSource, SourceError};
use crate::storage::{ArtifactKind, ArtifactSink, ParquetWriter, StorageError};

/// Errors that can abort a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Aggregation task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Result of an aggregation run.
#[derive(Debug, Clone)]
pub struct AggregationReport {
    pub cohort: CohortKey,
    pub matches_processed: usize,
    pub champions_analyzed: usize,
    pub participants_skipped: usize,
    pub duplicates_dropped: usize,
    pub load_failures: usize,
    pub input_fingerprint: InputFingerprint,
    /// Sink keys written, in write order. Empty for zero input or dry runs.
    pub aggregation_files: Vec<String>,
    pub parquet_export: Option<PathBuf>,
    pub duration: Duration,
}

/// Run every reducer as its own blocking task over a shared match slice.
pub async fn aggregate_concurrently(
    matches: Arc<[ParsedMatch]>,
) -> Result<Aggregates, PipelineError> {
    let m = Arc::clone(&matches);
    let champions = spawn_blocking(move || aggregate_champion_stats(&m));
    let m = Arc::clone(&matches);
    let roles = spawn_blocking(move || aggregate_role_meta(&m));
    let m = Arc::clone(&matches);
    let builds = spawn_blocking(move || aggregate_item_builds(&m));
    let m = Arc::clone(&matches);
    let matchups = spawn_blocking(move || aggregate_matchups(&m));
    let m = Arc::clone(&matches);
    let objectives = spawn_blocking(move || aggregate_objective_correlations(&m));

    let (champion_stats, role_meta, item_builds, matchups, objectives) =
        tokio::try_join!(champions, roles, builds, matchups, objectives)?;

    Ok(Aggregates {
        champion_stats,
        role_meta,
        item_builds,
        matchups,
        objectives,
    })
}

/// Source-to-sink aggregation for one cohort at a time.
pub struct AggregationPipeline {
    source: Arc<dyn RecordSource>,
    sink: Arc<dyn ArtifactSink>,
    parquet: Option<ParquetWriter>,
    dry_run: bool,
}

impl AggregationPipeline {
    pub fn new(source: Arc<dyn RecordSource>, sink: Arc<dyn ArtifactSink>) -> Self {
        Self {
            source,
            sink,
            parquet: None,
            dry_run: false,
        }
    }

    /// Also export the champion table as Parquet.
    pub fn with_parquet(mut self, writer: ParquetWriter) -> Self {
        self.parquet = Some(writer);
        self
    }

    /// Aggregate but don't store anything.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run the full pipeline for a cohort.
    pub async fn run(&self, cohort: &CohortKey) -> Result<AggregationReport, PipelineError> {
        let start = Instant::now();
        info!(
            "Starting aggregation for cohort {} from {} source",
            cohort,
            self.source.name()
        );

        let batch = self.source.fetch(cohort).await?;
        let load_failures = batch.failed;

        let outcome = ingest(batch.records);
        let participants_skipped = outcome.participants_skipped();
        let duplicates_dropped = outcome.duplicates_dropped();
        if !outcome.skipped.is_empty() {
            warn!(
                "Skipped {} malformed participants and {} duplicate matches",
                participants_skipped, duplicates_dropped
            );
        }
        for reason in &outcome.skipped {
            debug!("Skipped during ingestion: {}", reason);
        }

        let input_fingerprint = InputFingerprint::generate(
            outcome.matches.iter().filter_map(|m| m.match_id.as_deref()),
        );
        let matches: Arc<[ParsedMatch]> = outcome.matches.into();

        let mut report = AggregationReport {
            cohort: cohort.clone(),
            matches_processed: matches.len(),
            champions_analyzed: 0,
            participants_skipped,
            duplicates_dropped,
            load_failures,
            input_fingerprint,
            aggregation_files: Vec::new(),
            parquet_export: None,
            duration: Duration::ZERO,
        };

        if matches.is_empty() {
            warn!("No matches found for cohort {}, nothing to aggregate", cohort);
            report.duration = start.elapsed();
            return Ok(report);
        }

        let aggregates = aggregate_concurrently(Arc::clone(&matches)).await?;
        let summary = compose_summary(
            cohort,
            &aggregates.champion_stats,
            &aggregates.role_meta,
            &aggregates.objectives,
            matches.len(),
        );
        report.champions_analyzed = aggregates.champion_stats.len();

        let documents = [
            (
                ArtifactKind::ChampionStats,
                to_document(&aggregates.champion_stats)?,
            ),
            (ArtifactKind::RoleMeta, to_document(&aggregates.role_meta)?),
            (ArtifactKind::ItemBuilds, to_document(&aggregates.item_builds)?),
            (ArtifactKind::MatchupData, to_document(&aggregates.matchups)?),
            (
                ArtifactKind::ObjectiveCorrelations,
                to_document(&aggregates.objectives)?,
            ),
            (ArtifactKind::MetaSummary, to_document(&summary)?),
        ];

        if self.dry_run {
            info!(
                "Dry run: aggregated {} matches, {} champions; skipping {} artifacts",
                report.matches_processed,
                report.champions_analyzed,
                documents.len()
            );
        } else {
            for (kind, document) in &documents {
                let key = kind.key(cohort);
                self.sink.store(&key, document).await?;
                report.aggregation_files.push(key);
            }

            if let Some(writer) = &self.parquet {
                let writer = writer.clone();
                let cohort = cohort.clone();
                let champions = aggregates.champion_stats;
                let path =
                    spawn_blocking(move || writer.write_champion_stats(&cohort, &champions))
                        .await??;
                report.parquet_export = Some(path);
            }
        }

        report.duration = start.elapsed();
        info!(
            "Aggregation completed: {} matches, {} champions, {} artifacts to {} in {:?}",
            report.matches_processed,
            report.champions_analyzed,
            report.aggregation_files.len(),
            self.sink.name(),
            report.duration
        );

        Ok(report)
    }
}

fn to_document<T: Serialize>(value: &T) -> Result<Value, PipelineError> {
    Ok(serde_json::to_value(value)?)
}
