//! Statistics calculation engine.
//!
//! Five independent reducers fold over the parsed match set:
//! - Champion stats (per-entity combat, economy, vision, pick rate)
//! - Role meta (per-position economy and top champions)
//! - Item builds (most common normalized item sets per champion)
//! - Matchups (lane-opponent win rates)
//! - Objective correlations (first-objective win rates)
//!
//! The summary composer ranks their outputs into the executive summary.
//! Reducers never read each other's output, so they may run in any order or
//! concurrently with identical results.

mod build;
mod entity;
mod matchup;
mod objective;
mod role;
mod summary;

pub use build::aggregate_item_builds;
pub use entity::aggregate_champion_stats;
pub use matchup::{aggregate_matchups, MIN_MATCHUP_GAMES};
pub use objective::aggregate_objective_correlations;
pub use role::aggregate_role_meta;
pub use summary::{compose_summary, RECOMMENDED_MATCHES, SUMMARY_MIN_GAMES};

use crate::models::{
    BuildStatsTable, EntityStatsTable, MatchupTable, ObjectiveStats, ParsedMatch, RoleStatsTable,
};

/// Round to a fixed number of decimal places. Exact halves go to the even
/// neighbour.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// `part / whole * 100`, rounded to 2 decimals. Zero when `whole` is zero.
pub fn percentage(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round_to(part as f64 / whole as f64 * 100.0, 2)
    }
}

/// `total / games`, rounded. Zero when `games` is zero.
pub fn per_game(total: f64, games: u32, decimals: i32) -> f64 {
    if games == 0 {
        0.0
    } else {
        round_to(total / games as f64, decimals)
    }
}

/// Arithmetic mean of precomputed samples.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningMean {
    sum: f64,
    count: u32,
}

impl RunningMean {
    pub fn push(&mut self, sample: f64) {
        self.sum += sample;
        self.count += 1;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Mean rounded to 2 decimals, zero with no samples.
    pub fn mean(&self) -> f64 {
        per_game(self.sum, self.count, 2)
    }
}

/// Outputs of all five reducers for one cohort.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregates {
    pub champion_stats: EntityStatsTable,
    pub role_meta: RoleStatsTable,
    pub item_builds: BuildStatsTable,
    pub matchups: MatchupTable,
    pub objectives: ObjectiveStats,
}

/// Run every reducer sequentially.
pub fn aggregate_all(matches: &[ParsedMatch]) -> Aggregates {
    Aggregates {
        champion_stats: aggregate_champion_stats(matches),
        role_meta: aggregate_role_meta(matches),
        item_builds: aggregate_item_builds(matches),
        matchups: aggregate_matchups(matches),
        objectives: aggregate_objective_correlations(matches),
    }
}
