//! Parquet export for analytics.
//!
//! The champion table is exported alongside the JSON artifacts so it can be
//! queried with columnar tools. Parquet files are derived output and are
//! rewritten on every run.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use tracing::info;

use super::{StorageConfig, StorageError};
use crate::models::{CohortKey, EntityStats, EntityStatsTable};

/// File the champion table is written to within a cohort directory.
const CHAMPION_STATS_FILE: &str = "champion_stats.parquet";

/// Arrow schema of the champion table, one row per champion.
fn champion_stats_schema() -> Schema {
    Schema::new(vec![
        Field::new("champion", DataType::Utf8, false),
        Field::new("patch", DataType::Utf8, false),
        Field::new("queue_type", DataType::Utf8, false),
        Field::new("games_played", DataType::UInt32, false),
        Field::new("wins", DataType::UInt32, false),
        Field::new("win_rate", DataType::Float64, false),
        Field::new("pick_rate", DataType::Float64, false),
        Field::new("avg_kda", DataType::Float64, false),
        Field::new("avg_damage_per_min", DataType::Float64, false),
        Field::new("avg_cs_per_min", DataType::Float64, false),
        Field::new("avg_gold_per_min", DataType::Float64, false),
        Field::new("gold_efficiency", DataType::Float64, false),
        Field::new("avg_vision_per_min", DataType::Float64, false),
        Field::new("primary_position", DataType::Utf8, false),
        Field::new("position_flexibility", DataType::UInt32, false),
    ])
}

fn parquet_err(e: impl std::fmt::Display) -> StorageError {
    StorageError::Parquet(e.to_string())
}

/// Writes the champion table as snappy-compressed Parquet.
#[derive(Debug, Clone)]
pub struct ParquetWriter {
    config: StorageConfig,
}

impl ParquetWriter {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    /// `parquet/{patch}/{queue}/champion_stats.parquet` under the data dir.
    pub fn champion_stats_path(&self, cohort: &CohortKey) -> PathBuf {
        self.config
            .parquet_dir()
            .join(&cohort.patch)
            .join(&cohort.queue_type)
            .join(CHAMPION_STATS_FILE)
    }

    /// Ensure the directory exists.
    fn ensure_dir(&self, path: &Path) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Write the champion table to Parquet, one row per champion.
    pub fn write_champion_stats(
        &self,
        cohort: &CohortKey,
        champions: &EntityStatsTable,
    ) -> Result<PathBuf, StorageError> {
        let path = self.champion_stats_path(cohort);
        self.ensure_dir(&path)?;

        let schema = Arc::new(champion_stats_schema());
        let rows = champions.len();

        let names: Vec<&str> = champions.keys().map(String::as_str).collect();
        let patches: Vec<&str> = vec![cohort.patch.as_str(); rows];
        let queues: Vec<&str> = vec![cohort.queue_type.as_str(); rows];
        let stats: Vec<_> = champions.values().collect();

        let u32_col = |f: fn(&EntityStats) -> u32| -> ArrayRef {
            Arc::new(UInt32Array::from(stats.iter().map(|s| f(s)).collect::<Vec<_>>()))
        };
        let f64_col = |f: fn(&EntityStats) -> f64| -> ArrayRef {
            Arc::new(Float64Array::from(stats.iter().map(|s| f(s)).collect::<Vec<_>>()))
        };
        let positions: Vec<&str> = stats.iter().map(|s| s.primary_position.as_str()).collect();

        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(names)) as ArrayRef,
                Arc::new(StringArray::from(patches)) as ArrayRef,
                Arc::new(StringArray::from(queues)) as ArrayRef,
                u32_col(|s| s.games_played),
                u32_col(|s| s.wins),
                f64_col(|s| s.win_rate),
                f64_col(|s| s.pick_rate),
                f64_col(|s| s.avg_kda),
                f64_col(|s| s.avg_damage_per_min),
                f64_col(|s| s.avg_cs_per_min),
                f64_col(|s| s.avg_gold_per_min),
                f64_col(|s| s.gold_efficiency),
                f64_col(|s| s.avg_vision_per_min),
                Arc::new(StringArray::from(positions)) as ArrayRef,
                u32_col(|s| s.position_flexibility),
            ],
        )
        .map_err(parquet_err)?;

        self.write_batch(&path, &schema, &batch)?;

        info!("Wrote {} champions to {:?}", rows, path);
        Ok(path)
    }

    /// Write a record batch to a Parquet file.
    fn write_batch(
        &self,
        path: &Path,
        schema: &Arc<Schema>,
        batch: &RecordBatch,
    ) -> Result<(), StorageError> {
        let file = File::create(path)?;

        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();

        let mut writer =
            ArrowWriter::try_new(file, schema.clone(), Some(props)).map_err(parquet_err)?;
        writer.write(batch).map_err(parquet_err)?;
        writer.close().map_err(parquet_err)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::aggregate_champion_stats;
    use crate::models::{ParsedMatch, ParsedParticipant, TeamSide};
    use arrow::array::Array;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> StorageConfig {
        StorageConfig::new(temp_dir.path().to_path_buf())
    }

    fn participant(champion: &str) -> ParsedParticipant {
        ParsedParticipant {
            champion: Some(champion.to_string()),
            win: true,
            team: Some(TeamSide::Blue),
            position: Some("MIDDLE".to_string()),
            gold_earned: 10000.0,
            damage_dealt: 20000.0,
            ..Default::default()
        }
    }

    fn read_back(path: &Path) -> Vec<RecordBatch> {
        ParquetRecordBatchReaderBuilder::try_new(File::open(path).unwrap())
            .unwrap()
            .build()
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_champion_stats_schema() {
        let schema = champion_stats_schema();
        assert_eq!(schema.fields().len(), 15);
        assert!(schema.field_with_name("champion").is_ok());
        assert!(schema.field_with_name("gold_efficiency").is_ok());
    }

    #[test]
    fn test_write_and_read_champion_stats() {
        let temp_dir = TempDir::new().unwrap();
        let writer = ParquetWriter::new(test_config(&temp_dir));
        let cohort = CohortKey::ranked("15.20");

        let matches = vec![ParsedMatch {
            participants: vec![participant("Ahri"), participant("Syndra"), participant("Ahri")],
            ..Default::default()
        }];
        let champions = aggregate_champion_stats(&matches);

        let path = writer.write_champion_stats(&cohort, &champions).unwrap();
        assert!(path.ends_with("parquet/15.20/RANKED_SOLO/champion_stats.parquet"));
        assert_eq!(path, writer.champion_stats_path(&cohort));

        let batches = read_back(&path);
        assert_eq!(batches.iter().map(|b| b.num_rows()).sum::<usize>(), 2);
        assert_eq!(batches[0].num_columns(), 15);

        let names = batches[0]
            .column(0)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(names.value(0), "Ahri");
        assert_eq!(names.value(1), "Syndra");
    }

    #[test]
    fn test_write_empty_table() {
        let temp_dir = TempDir::new().unwrap();
        let writer = ParquetWriter::new(test_config(&temp_dir));

        let path = writer
            .write_champion_stats(&CohortKey::ranked("15.20"), &EntityStatsTable::new())
            .unwrap();

        let rows: usize = read_back(&path).iter().map(|b| b.num_rows()).sum();
        assert_eq!(rows, 0);
    }
}
