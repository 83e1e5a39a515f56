//! Executive meta summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ObjectiveStats, OrderedMap};

/// Coarse confidence label derived from the number of matches analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reliability {
    High,
    Medium,
    Low,
    #[serde(rename = "Very Low")]
    VeryLow,
}

impl Reliability {
    pub fn from_match_count(matches: usize) -> Self {
        if matches >= 300 {
            Reliability::High
        } else if matches >= 150 {
            Reliability::Medium
        } else if matches >= 50 {
            Reliability::Low
        } else {
            Reliability::VeryLow
        }
    }
}

impl std::fmt::Display for Reliability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reliability::High => write!(f, "High"),
            Reliability::Medium => write!(f, "Medium"),
            Reliability::Low => write!(f, "Low"),
            Reliability::VeryLow => write!(f, "Very Low"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinRateEntry {
    pub rank: usize,
    pub champion: String,
    pub win_rate: f64,
    pub pick_rate: f64,
    pub avg_kda: f64,
    pub primary_position: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickRateEntry {
    pub rank: usize,
    pub champion: String,
    pub pick_rate: f64,
    pub win_rate: f64,
    pub games: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldEfficiencyEntry {
    pub rank: usize,
    pub champion: String,
    pub gold_efficiency: f64,
    pub avg_gold_per_min: f64,
    pub avg_damage: f64,
    pub primary_position: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisionEntry {
    pub rank: usize,
    pub champion: String,
    pub avg_vision_per_min: f64,
    pub avg_vision_score: f64,
    pub primary_position: String,
}

/// Ranked champion lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaOverview {
    pub top_10_by_win_rate: Vec<WinRateEntry>,
    pub top_10_by_pick_rate: Vec<PickRateEntry>,
    pub top_10_gold_efficient: Vec<GoldEfficiencyEntry>,
    pub top_10_vision_control: Vec<VisionEntry>,
}

/// Economy digest for one role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleEconomy {
    pub avg_gold_per_min: f64,
    pub avg_vision_per_min: f64,
    pub win_rate: f64,
}

/// The executive summary artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaSummary {
    pub patch: String,
    pub total_matches_analyzed: usize,
    pub champions_with_data: usize,
    pub data_collection_date: DateTime<Utc>,
    pub reliability_assessment: Reliability,
    pub meta_overview: MetaOverview,
    pub role_economy: OrderedMap<String, RoleEconomy>,
    pub objective_importance: ObjectiveStats,
    pub data_quality_notes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reliability_breakpoints() {
        assert_eq!(Reliability::from_match_count(0), Reliability::VeryLow);
        assert_eq!(Reliability::from_match_count(49), Reliability::VeryLow);
        assert_eq!(Reliability::from_match_count(50), Reliability::Low);
        assert_eq!(Reliability::from_match_count(149), Reliability::Low);
        assert_eq!(Reliability::from_match_count(150), Reliability::Medium);
        assert_eq!(Reliability::from_match_count(299), Reliability::Medium);
        assert_eq!(Reliability::from_match_count(300), Reliability::High);
    }

    #[test]
    fn test_reliability_serialization() {
        let json = serde_json::to_string(&Reliability::VeryLow).unwrap();
        assert_eq!(json, "\"Very Low\"");

        let parsed: Reliability = serde_json::from_str("\"Medium\"").unwrap();
        assert_eq!(parsed, Reliability::Medium);
    }

    #[test]
    fn test_reliability_display() {
        assert_eq!(format!("{}", Reliability::High), "High");
        assert_eq!(format!("{}", Reliability::VeryLow), "Very Low");
    }
}
