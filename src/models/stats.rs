//! Aggregated statistics documents.
//!
//! Each table serializes to one self-contained JSON artifact.

use serde::{Deserialize, Serialize};

use super::{Objective, OrderedMap};

/// Per-champion aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityStats {
    pub games_played: u32,
    pub wins: u32,
    /// Percentage, 2 decimals
    pub win_rate: f64,
    /// Share of all champion picks, percentage
    pub pick_rate: f64,

    // Combat
    pub avg_kills: f64,
    pub avg_deaths: f64,
    pub avg_assists: f64,
    pub avg_kda: f64,
    pub avg_damage: f64,
    pub avg_damage_per_min: f64,

    // Farming
    pub avg_cs: f64,
    pub avg_cs_per_min: f64,

    // Economy
    pub avg_gold_earned: f64,
    pub avg_gold_per_min: f64,
    /// Damage dealt per 1000 gold earned
    pub gold_efficiency: f64,

    // Vision
    pub avg_vision_score: f64,
    pub avg_vision_per_min: f64,

    pub primary_position: String,
    /// Roles seen in at least 10% of this champion's games
    pub position_flexibility: u32,
}

/// A champion's share of a role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleChampion {
    pub champion: String,
    pub games: u32,
    pub pick_rate_in_role: f64,
}

/// Per-role aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleStats {
    pub games_played: u32,
    pub win_rate: f64,
    pub avg_gold: f64,
    pub avg_gold_per_min: f64,
    pub avg_vision_score: f64,
    pub avg_vision_per_min: f64,
    pub avg_damage: f64,
    pub avg_cs: f64,
    pub top_champions: Vec<RoleChampion>,
}

/// One normalized item set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemBuild {
    pub items: Vec<u32>,
    pub games: u32,
    pub pick_rate: f64,
}

/// Most common builds for a champion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildStats {
    pub total_games: u32,
    pub top_builds: Vec<ItemBuild>,
}

/// Games, wins and win rate for one pairing or objective.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WinRecord {
    pub games: u32,
    pub wins: u32,
    pub win_rate: f64,
}

impl WinRecord {
    pub fn new(games: u32, wins: u32) -> Self {
        Self {
            games,
            wins,
            win_rate: crate::calculate::percentage(wins, games),
        }
    }
}

/// First-objective win correlations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveStats {
    pub first_blood: WinRecord,
    pub first_tower: WinRecord,
    pub first_dragon: WinRecord,
    pub first_baron: WinRecord,
}

impl ObjectiveStats {
    pub fn get(&self, objective: Objective) -> &WinRecord {
        match objective {
            Objective::FirstBlood => &self.first_blood,
            Objective::FirstTower => &self.first_tower,
            Objective::FirstDragon => &self.first_dragon,
            Objective::FirstBaron => &self.first_baron,
        }
    }

    pub fn get_mut(&mut self, objective: Objective) -> &mut WinRecord {
        match objective {
            Objective::FirstBlood => &mut self.first_blood,
            Objective::FirstTower => &mut self.first_tower,
            Objective::FirstDragon => &mut self.first_dragon,
            Objective::FirstBaron => &mut self.first_baron,
        }
    }
}

/// Champion → stats.
pub type EntityStatsTable = OrderedMap<String, EntityStats>;

/// Role label → stats.
pub type RoleStatsTable = OrderedMap<String, RoleStats>;

/// Champion → top builds.
pub type BuildStatsTable = OrderedMap<String, BuildStats>;

/// Champion → opponent → record.
pub type MatchupTable = OrderedMap<String, OrderedMap<String, WinRecord>>;
