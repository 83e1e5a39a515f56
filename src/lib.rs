//! # Rift Meta
//!
//! Champion meta aggregation over ranked match records.
//!
//! ## Architecture
//!
//! - **models**: Match records, parsed participants, output tables and summary
//! - **source**: Record sources (local data lake, static)
//! - **calculate**: The five reducers and the summary composer
//! - **storage**: Artifact sinks and Parquet export
//! - **pipeline**: Source-to-sink orchestration with a run report
//! - **config**: Configuration loading and validation

pub mod calculate;
pub mod config;
pub mod models;
pub mod pipeline;
pub mod source;
pub mod storage;

pub use models::*;
