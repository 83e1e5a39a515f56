//! Filesystem data lake operations.
//!
//! Layout under the data directory:
//! - `matches/{patch}/{queue}/`: raw match documents (`*.json`, `*.jsonl`)
//! - `aggregated/{patch}/{queue}/`: JSON artifacts
//! - `parquet/{patch}/{queue}/`: analytics exports

mod parquet;
mod sink;

pub use self::parquet::ParquetWriter;
pub use sink::{ArtifactSink, FsArtifactSink, MemorySink};

use std::path::PathBuf;
use thiserror::Error;

use crate::models::CohortKey;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn matches_dir(&self, cohort: &CohortKey) -> PathBuf {
        self.data_dir.join(cohort.match_prefix())
    }

    pub fn aggregated_dir(&self, cohort: &CohortKey) -> PathBuf {
        self.data_dir.join(cohort.aggregate_prefix())
    }

    pub fn parquet_dir(&self) -> PathBuf {
        self.data_dir.join("parquet")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// The six artifacts written per cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    ChampionStats,
    RoleMeta,
    ItemBuilds,
    MatchupData,
    ObjectiveCorrelations,
    MetaSummary,
}

impl ArtifactKind {
    /// Get the filename for this artifact.
    pub fn filename(&self) -> &'static str {
        match self {
            ArtifactKind::ChampionStats => "champion_stats.json",
            ArtifactKind::RoleMeta => "role_meta.json",
            ArtifactKind::ItemBuilds => "item_builds.json",
            ArtifactKind::MatchupData => "matchup_data.json",
            ArtifactKind::ObjectiveCorrelations => "objective_correlations.json",
            ArtifactKind::MetaSummary => "meta_summary.json",
        }
    }

    /// Sink key for this artifact within a cohort.
    pub fn key(&self, cohort: &CohortKey) -> String {
        format!("{}/{}", cohort.aggregate_prefix(), self.filename())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_paths() {
        let config = StorageConfig::new(PathBuf::from("/data"));
        let cohort = CohortKey::ranked("15.20");

        assert_eq!(
            config.matches_dir(&cohort),
            PathBuf::from("/data/matches/15.20/RANKED_SOLO")
        );
        assert_eq!(
            config.aggregated_dir(&cohort),
            PathBuf::from("/data/aggregated/15.20/RANKED_SOLO")
        );
        assert_eq!(config.parquet_dir(), PathBuf::from("/data/parquet"));
    }

    #[test]
    fn test_storage_config_default() {
        let config = StorageConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }

    #[test]
    fn test_artifact_keys() {
        let cohort = CohortKey::ranked("15.20");
        assert_eq!(
            ArtifactKind::MetaSummary.key(&cohort),
            "aggregated/15.20/RANKED_SOLO/meta_summary.json"
        );

        assert_eq!(ArtifactKind::ChampionStats.filename(), "champion_stats.json");
        assert_eq!(
            ArtifactKind::ObjectiveCorrelations.key(&CohortKey::new("14.1", "RANKED_FLEX")),
            "aggregated/14.1/RANKED_FLEX/objective_correlations.json"
        );
    }
}
