//! Core data models for the meta aggregator.

mod cohort;
mod ids;
mod match_record;
mod ordered;
mod stats;
mod summary;

pub use cohort::*;
pub use ids::*;
pub use match_record::*;
pub use ordered::*;
pub use stats::*;
pub use summary::*;
