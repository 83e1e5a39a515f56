//! Cohort keys: the game-version/queue partition a run aggregates over.

use serde::{Deserialize, Serialize};

/// Default ranked queue label.
pub const DEFAULT_QUEUE: &str = "RANKED_SOLO";

/// Identifies one partition of the match corpus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CohortKey {
    /// Game version, e.g. "15.20"
    pub patch: String,

    /// Queue label, e.g. "RANKED_SOLO"
    #[serde(default = "default_queue")]
    pub queue_type: String,
}

fn default_queue() -> String {
    DEFAULT_QUEUE.to_string()
}

impl CohortKey {
    pub fn new(patch: impl Into<String>, queue_type: impl Into<String>) -> Self {
        Self {
            patch: patch.into(),
            queue_type: queue_type.into(),
        }
    }

    /// Cohort on the default ranked queue.
    pub fn ranked(patch: impl Into<String>) -> Self {
        Self::new(patch, DEFAULT_QUEUE)
    }

    /// Relative prefix where raw match documents for this cohort live.
    pub fn match_prefix(&self) -> String {
        format!("matches/{}/{}", self.patch, self.queue_type)
    }

    /// Relative prefix where aggregated artifacts for this cohort are written.
    pub fn aggregate_prefix(&self) -> String {
        format!("aggregated/{}/{}", self.patch, self.queue_type)
    }
}

impl std::fmt::Display for CohortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.patch, self.queue_type)
    }
}
