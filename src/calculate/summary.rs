//! Executive meta summary composition.

use chrono::Utc;

use crate::models::{
    CohortKey, EntityStats, EntityStatsTable, GoldEfficiencyEntry, MetaOverview, MetaSummary,
    ObjectiveStats, PickRateEntry, Reliability, RoleEconomy, RoleStatsTable, VisionEntry,
    WinRateEntry,
};

/// Champions need this many games to appear in the win rate, gold
/// efficiency and vision rankings.
pub const SUMMARY_MIN_GAMES: u32 = 5;

/// Match count considered sufficient for reliable analysis.
pub const RECOMMENDED_MATCHES: usize = 500;

const TOP_N: usize = 10;

/// Rank champions descending by `metric`, keeping the first ten.
/// Ties keep table order.
fn top_ten<F>(
    champions: &EntityStatsTable,
    min_games: u32,
    metric: F,
) -> Vec<(&String, &EntityStats)>
where
    F: FnMut(&EntityStats) -> f64,
{
    champions
        .ranked_by(metric)
        .into_iter()
        .filter(|(_, stats)| stats.games_played >= min_games)
        .take(TOP_N)
        .collect()
}

fn quality_notes(total_matches: usize, reliability: Reliability, champions: usize) -> Vec<String> {
    vec![
        format!(
            "Sample size: {} matches - {} reliability",
            total_matches, reliability
        ),
        if total_matches >= RECOMMENDED_MATCHES {
            "Sample size is sufficient for reliable analysis".to_string()
        } else {
            format!("Recommended minimum: {} matches", RECOMMENDED_MATCHES)
        },
        format!("Current data covers {} unique champions", champions),
    ]
}

/// Build the executive summary from the champion, role and objective tables.
pub fn compose_summary(
    cohort: &CohortKey,
    champions: &EntityStatsTable,
    roles: &RoleStatsTable,
    objectives: &ObjectiveStats,
    total_matches: usize,
) -> MetaSummary {
    let reliability = Reliability::from_match_count(total_matches);

    let top_10_by_win_rate = top_ten(champions, SUMMARY_MIN_GAMES, |s| s.win_rate)
        .into_iter()
        .enumerate()
        .map(|(i, (champion, stats))| WinRateEntry {
            rank: i + 1,
            champion: champion.clone(),
            win_rate: stats.win_rate,
            pick_rate: stats.pick_rate,
            avg_kda: stats.avg_kda,
            primary_position: stats.primary_position.clone(),
        })
        .collect();

    let top_10_by_pick_rate = top_ten(champions, 0, |s| s.pick_rate)
        .into_iter()
        .enumerate()
        .map(|(i, (champion, stats))| PickRateEntry {
            rank: i + 1,
            champion: champion.clone(),
            pick_rate: stats.pick_rate,
            win_rate: stats.win_rate,
            games: stats.games_played,
        })
        .collect();

    let top_10_gold_efficient = top_ten(champions, SUMMARY_MIN_GAMES, |s| s.gold_efficiency)
        .into_iter()
        .enumerate()
        .map(|(i, (champion, stats))| GoldEfficiencyEntry {
            rank: i + 1,
            champion: champion.clone(),
            gold_efficiency: stats.gold_efficiency,
            avg_gold_per_min: stats.avg_gold_per_min,
            avg_damage: stats.avg_damage,
            primary_position: stats.primary_position.clone(),
        })
        .collect();

    let top_10_vision_control = top_ten(champions, SUMMARY_MIN_GAMES, |s| s.avg_vision_per_min)
        .into_iter()
        .enumerate()
        .map(|(i, (champion, stats))| VisionEntry {
            rank: i + 1,
            champion: champion.clone(),
            avg_vision_per_min: stats.avg_vision_per_min,
            avg_vision_score: stats.avg_vision_score,
            primary_position: stats.primary_position.clone(),
        })
        .collect();

    let role_economy = roles
        .iter()
        .map(|(role, stats)| {
            (
                role.clone(),
                RoleEconomy {
                    avg_gold_per_min: stats.avg_gold_per_min,
                    avg_vision_per_min: stats.avg_vision_per_min,
                    win_rate: stats.win_rate,
                },
            )
        })
        .collect();

    MetaSummary {
        patch: cohort.patch.clone(),
        total_matches_analyzed: total_matches,
        champions_with_data: champions.len(),
        data_collection_date: Utc::now(),
        reliability_assessment: reliability,
        meta_overview: MetaOverview {
            top_10_by_win_rate,
            top_10_by_pick_rate,
            top_10_gold_efficient,
            top_10_vision_control,
        },
        role_economy,
        objective_importance: *objectives,
        data_quality_notes: quality_notes(total_matches, reliability, champions.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::fixtures::{game, player};
    use crate::calculate::{aggregate_champion_stats, aggregate_role_meta};
    use crate::models::{ParsedMatch, TeamSide, WinRecord};

    fn stats(games: u32, wins: u32, pick_rate: f64) -> EntityStats {
        EntityStats {
            games_played: games,
            wins,
            win_rate: crate::calculate::percentage(wins, games),
            pick_rate,
            avg_kills: 0.0,
            avg_deaths: 0.0,
            avg_assists: 0.0,
            avg_kda: 0.0,
            avg_damage: 0.0,
            avg_damage_per_min: 0.0,
            avg_cs: 0.0,
            avg_cs_per_min: 0.0,
            avg_gold_earned: 0.0,
            avg_gold_per_min: 0.0,
            gold_efficiency: 0.0,
            avg_vision_score: 0.0,
            avg_vision_per_min: 0.0,
            primary_position: "TOP".to_string(),
            position_flexibility: 1,
        }
    }

    #[test]
    fn test_empty_summary() {
        let summary = compose_summary(
            &CohortKey::ranked("15.20"),
            &EntityStatsTable::new(),
            &RoleStatsTable::new(),
            &ObjectiveStats::default(),
            0,
        );

        assert_eq!(summary.patch, "15.20");
        assert_eq!(summary.champions_with_data, 0);
        assert_eq!(summary.total_matches_analyzed, 0);
        assert_eq!(summary.reliability_assessment, Reliability::VeryLow);
        assert!(summary.meta_overview.top_10_by_pick_rate.is_empty());
        assert!(summary.role_economy.is_empty());

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["reliability_assessment"], "Very Low");
    }

    #[test]
    fn test_win_rate_ranking_applies_game_floor() {
        let mut champions = EntityStatsTable::new();
        champions.insert("Fluke".to_string(), stats(2, 2, 10.0));
        champions.insert("Steady".to_string(), stats(10, 6, 50.0));
        champions.insert("Solid".to_string(), stats(5, 4, 40.0));

        let summary = compose_summary(
            &CohortKey::ranked("15.20"),
            &champions,
            &RoleStatsTable::new(),
            &ObjectiveStats::default(),
            60,
        );

        let by_win: Vec<(usize, &str)> = summary
            .meta_overview
            .top_10_by_win_rate
            .iter()
            .map(|e| (e.rank, e.champion.as_str()))
            .collect();
        assert_eq!(by_win, vec![(1, "Solid"), (2, "Steady")]);

        let by_pick: Vec<&str> = summary
            .meta_overview
            .top_10_by_pick_rate
            .iter()
            .map(|e| e.champion.as_str())
            .collect();
        assert_eq!(by_pick, vec!["Steady", "Solid", "Fluke"]);
        assert_eq!(summary.reliability_assessment, Reliability::Low);
    }

    #[test]
    fn test_rankings_capped_at_ten_with_stable_ties() {
        let mut champions = EntityStatsTable::new();
        for i in 0..12 {
            champions.insert(format!("C{}", i), stats(5, 3, 5.0));
        }

        let summary = compose_summary(
            &CohortKey::ranked("15.20"),
            &champions,
            &RoleStatsTable::new(),
            &ObjectiveStats::default(),
            12,
        );

        let pick = &summary.meta_overview.top_10_by_pick_rate;
        assert_eq!(pick.len(), 10);
        assert_eq!(pick[0].champion, "C0");
        assert_eq!(pick[9].champion, "C9");
        assert_eq!(pick[9].rank, 10);
    }

    #[test]
    fn test_role_economy_and_objectives_carried() {
        let matches: Vec<ParsedMatch> = (0..5)
            .map(|_| {
                game(vec![
                    player("Ahri", "MIDDLE", TeamSide::Blue, true),
                    player("Zed", "MIDDLE", TeamSide::Red, false),
                ])
            })
            .collect();
        let champions = aggregate_champion_stats(&matches);
        let roles = aggregate_role_meta(&matches);
        let objectives = ObjectiveStats {
            first_blood: WinRecord::new(3, 2),
            ..Default::default()
        };

        let summary = compose_summary(
            &CohortKey::ranked("15.20"),
            &champions,
            &roles,
            &objectives,
            matches.len(),
        );

        assert_eq!(summary.role_economy.get("MIDDLE").unwrap().win_rate, 50.0);
        assert_eq!(summary.objective_importance, objectives);
        assert_eq!(summary.meta_overview.top_10_by_win_rate[0].champion, "Ahri");
        assert_eq!(summary.meta_overview.top_10_by_win_rate[0].win_rate, 100.0);
    }

    #[test]
    fn test_quality_notes() {
        let notes = quality_notes(600, Reliability::High, 42);
        assert_eq!(notes[0], "Sample size: 600 matches - High reliability");
        assert_eq!(notes[1], "Sample size is sufficient for reliable analysis");
        assert_eq!(notes[2], "Current data covers 42 unique champions");

        let notes = quality_notes(10, Reliability::VeryLow, 3);
        assert_eq!(notes[1], "Recommended minimum: 500 matches");
    }
}
