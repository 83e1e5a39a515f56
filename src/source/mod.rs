//! Match record sources.
//!
//! A source supplies the raw match documents for one cohort. Unreadable
//! documents are counted and logged, never fatal: the run continues with
//! whatever loaded.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, error, info, warn};

use crate::config::SourceConfig;
use crate::models::{CohortKey, MatchRecord};
use crate::storage::StorageConfig;

/// Errors that prevent a source from listing its documents at all.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Invalid match file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Records loaded for a cohort, plus load accounting.
#[derive(Debug, Clone, Default)]
pub struct SourceBatch {
    pub records: Vec<MatchRecord>,
    /// Documents the source tried to load
    pub attempted: usize,
    /// Documents that could not be read or parsed
    pub failed: usize,
}

impl SourceBatch {
    pub fn from_records(records: Vec<MatchRecord>) -> Self {
        Self {
            attempted: records.len(),
            failed: 0,
            records,
        }
    }

    /// Share of attempted documents that failed to load.
    pub fn failure_ratio(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            self.failed as f64 / self.attempted as f64
        }
    }
}

/// Supplier of match records.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Source identifier for logging.
    fn name(&self) -> &'static str;

    /// Load every record for the cohort. May return zero records.
    async fn fetch(&self, cohort: &CohortKey) -> Result<SourceBatch, SourceError>;
}

/// A fixed set of records, independent of cohort.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<MatchRecord>,
}

impl StaticSource {
    pub fn new(records: Vec<MatchRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl RecordSource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch(&self, _cohort: &CohortKey) -> Result<SourceBatch, SourceError> {
        Ok(SourceBatch::from_records(self.records.clone()))
    }
}

/// Counts load failures, logging the first few individually.
struct LoadTracker {
    batch: SourceBatch,
    max_logged: usize,
}

impl LoadTracker {
    fn new(max_logged: usize) -> Self {
        Self {
            batch: SourceBatch::default(),
            max_logged,
        }
    }

    fn loaded(&mut self, record: MatchRecord) {
        self.batch.attempted += 1;
        self.batch.records.push(record);
    }

    fn failed(&mut self, location: &str, reason: impl std::fmt::Display) {
        self.batch.attempted += 1;
        self.batch.failed += 1;
        if self.batch.failed <= self.max_logged {
            warn!("Error loading {}: {}", location, reason);
        }
    }

    fn finish(self, warn_ratio: f64) -> SourceBatch {
        let batch = self.batch;
        if batch.failed > self.max_logged {
            warn!("{} total match documents failed to load", batch.failed);
        }
        if batch.failed > 0 && batch.failure_ratio() > warn_ratio {
            error!(
                "{} of {} match documents failed to load ({:.1}%), above the {:.1}% threshold",
                batch.failed,
                batch.attempted,
                batch.failure_ratio() * 100.0,
                warn_ratio * 100.0
            );
        }
        batch
    }
}

/// Reads `matches/{patch}/{queue}/` under the data directory.
///
/// `*.json` files hold one match each; `*.jsonl` files hold one match per
/// line. Files are read in path order.
pub struct DataLakeSource {
    storage: StorageConfig,
    config: SourceConfig,
}

impl DataLakeSource {
    pub fn new(storage: StorageConfig, config: SourceConfig) -> Self {
        Self { storage, config }
    }

    /// List match files for the cohort, sorted by path.
    pub fn match_files(&self, cohort: &CohortKey) -> Result<Vec<PathBuf>, SourceError> {
        let dir = self.storage.matches_dir(cohort);
        let escaped = glob::Pattern::escape(&dir.to_string_lossy());

        let mut files = Vec::new();
        for ext in ["json", "jsonl"] {
            let pattern = format!("{}/*.{}", escaped, ext);
            for entry in glob::glob(&pattern)? {
                match entry {
                    Ok(path) => files.push(path),
                    Err(e) => warn!("Skipping unreadable match file entry: {}", e),
                }
            }
        }

        files.sort();
        Ok(files)
    }

    async fn load_json(&self, path: &Path, tracker: &mut LoadTracker) {
        let location = path.display().to_string();
        match fs::read_to_string(path).await {
            Ok(contents) => match serde_json::from_str::<MatchRecord>(&contents) {
                Ok(record) => tracker.loaded(record),
                Err(e) => tracker.failed(&location, e),
            },
            Err(e) => tracker.failed(&location, e),
        }
    }

    async fn load_jsonl(&self, path: &Path, tracker: &mut LoadTracker) {
        let contents = match fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) => {
                tracker.failed(&path.display().to_string(), e);
                return;
            }
        };

        for (i, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<MatchRecord>(line) {
                Ok(record) => tracker.loaded(record),
                Err(e) => tracker.failed(&format!("{} line {}", path.display(), i + 1), e),
            }
        }
    }
}

#[async_trait]
impl RecordSource for DataLakeSource {
    fn name(&self) -> &'static str {
        "data-lake"
    }

    async fn fetch(&self, cohort: &CohortKey) -> Result<SourceBatch, SourceError> {
        let dir = self.storage.matches_dir(cohort);
        if !dir.exists() {
            warn!("No match directory for cohort {} at {:?}", cohort, dir);
            return Ok(SourceBatch::default());
        }

        let files = self.match_files(cohort)?;
        info!("Found {} match files for cohort {}", files.len(), cohort);

        let mut tracker = LoadTracker::new(self.config.max_logged_failures);
        for path in &files {
            let is_jsonl = path.extension().is_some_and(|ext| ext == "jsonl");
            if is_jsonl {
                self.load_jsonl(path, &mut tracker).await;
            } else {
                self.load_json(path, &mut tracker).await;
            }
        }

        let batch = tracker.finish(self.config.failure_warn_ratio);
        debug!(
            "Loaded {} of {} match documents from {:?}",
            batch.records.len(),
            batch.attempted,
            dir
        );
        Ok(batch)
    }
}
