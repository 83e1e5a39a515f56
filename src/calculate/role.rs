//! Per-role meta.

use crate::models::{OrderedMap, ParsedMatch, RoleChampion, RoleStats, RoleStatsTable};

use super::{per_game, percentage, RunningMean};

/// Champions listed per role.
pub const TOP_CHAMPIONS_PER_ROLE: usize = 10;

#[derive(Debug, Default)]
struct RoleTally {
    games: u32,
    wins: u32,
    gold: f64,
    vision: f64,
    damage: f64,
    cs: f64,
    gold_per_min: RunningMean,
    vision_per_min: RunningMean,
    champions: OrderedMap<String, u32>,
}

impl RoleTally {
    fn finish(&self) -> RoleStats {
        let games = self.games;

        let mut ranked: Vec<(&String, u32)> =
            self.champions.iter().map(|(c, &n)| (c, n)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        let top_champions = ranked
            .into_iter()
            .take(TOP_CHAMPIONS_PER_ROLE)
            .map(|(champion, count)| RoleChampion {
                champion: champion.clone(),
                games: count,
                pick_rate_in_role: percentage(count, games),
            })
            .collect();

        RoleStats {
            games_played: games,
            win_rate: percentage(self.wins, games),
            avg_gold: per_game(self.gold, games, 0),
            avg_gold_per_min: self.gold_per_min.mean(),
            avg_vision_score: per_game(self.vision, games, 1),
            avg_vision_per_min: self.vision_per_min.mean(),
            avg_damage: per_game(self.damage, games, 0),
            avg_cs: per_game(self.cs, games, 1),
            top_champions,
        }
    }
}

/// Aggregate statistics by role. Participants without a usable position are
/// skipped; participants without a champion still count toward role totals.
pub fn aggregate_role_meta(matches: &[ParsedMatch]) -> RoleStatsTable {
    let mut tallies: OrderedMap<String, RoleTally> = OrderedMap::new();

    for game in matches {
        for p in &game.participants {
            let Some(position) = &p.position else {
                continue;
            };

            let role = tallies.get_or_insert_with(position.clone(), RoleTally::default);
            role.games += 1;
            if p.win {
                role.wins += 1;
            }
            role.gold += p.gold_earned;
            role.vision += p.vision_score;
            role.damage += p.damage_dealt;
            role.cs += p.total_cs;
            role.gold_per_min.push(p.per_minute.gold);
            role.vision_per_min.push(p.per_minute.vision);

            if let Some(champion) = &p.champion {
                *role.champions.get_or_insert_with(champion.clone(), || 0) += 1;
            }
        }
    }

    tallies
        .iter()
        .filter(|(_, tally)| tally.games > 0)
        .map(|(position, tally)| (position.clone(), tally.finish()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::fixtures::{game, player};
    use crate::models::TeamSide;

    #[test]
    fn test_role_totals() {
        let mut a = player("Ahri", "MIDDLE", TeamSide::Blue, true);
        a.gold_earned = 12000.0;
        a.per_minute.gold = 400.0;
        let mut b = player("Zed", "MIDDLE", TeamSide::Red, false);
        b.gold_earned = 10000.0;
        b.per_minute.gold = 350.0;

        let table = aggregate_role_meta(&[game(vec![a, b])]);
        let mid = table.get("MIDDLE").unwrap();

        assert_eq!(mid.games_played, 2);
        assert_eq!(mid.win_rate, 50.0);
        assert_eq!(mid.avg_gold, 11000.0);
        assert_eq!(mid.avg_gold_per_min, 375.0);
        assert_eq!(mid.top_champions.len(), 2);
        assert_eq!(mid.top_champions[0].pick_rate_in_role, 50.0);
    }

    #[test]
    fn test_missing_role_skipped() {
        let table = aggregate_role_meta(&[game(vec![
            player("Garen", "", TeamSide::Blue, true),
            player("Darius", "TOP", TeamSide::Red, false),
        ])]);

        assert_eq!(table.len(), 1);
        assert!(table.contains_key("TOP"));
    }

    #[test]
    fn test_unknown_champion_counts_toward_role_only() {
        let mut unknown = player("x", "JUNGLE", TeamSide::Blue, true);
        unknown.champion = None;
        let table = aggregate_role_meta(&[game(vec![
            unknown,
            player("Vi", "JUNGLE", TeamSide::Red, false),
        ])]);

        let jungle = table.get("JUNGLE").unwrap();
        assert_eq!(jungle.games_played, 2);
        assert_eq!(jungle.top_champions.len(), 1);
        assert_eq!(jungle.top_champions[0].champion, "Vi");
        assert_eq!(jungle.top_champions[0].pick_rate_in_role, 50.0);
    }

    #[test]
    fn test_top_champions_ranked_with_stable_ties() {
        let players = vec![
            player("Lulu", "UTILITY", TeamSide::Blue, true),
            player("Nami", "UTILITY", TeamSide::Red, true),
            player("Thresh", "UTILITY", TeamSide::Blue, true),
            player("Thresh", "UTILITY", TeamSide::Red, true),
            player("Nami", "UTILITY", TeamSide::Blue, true),
            player("Lulu", "UTILITY", TeamSide::Red, true),
            player("Thresh", "UTILITY", TeamSide::Blue, true),
        ];

        let table = aggregate_role_meta(&[game(players)]);
        let names: Vec<&str> = table
            .get("UTILITY")
            .unwrap()
            .top_champions
            .iter()
            .map(|c| c.champion.as_str())
            .collect();
        assert_eq!(names, vec!["Thresh", "Lulu", "Nami"]);
    }

    #[test]
    fn test_top_champions_capped_at_ten() {
        let players = (0..15)
            .map(|i| player(&format!("Champ{}", i), "TOP", TeamSide::Blue, true))
            .collect();

        let table = aggregate_role_meta(&[game(players)]);
        let top = &table.get("TOP").unwrap().top_champions;
        assert_eq!(top.len(), TOP_CHAMPIONS_PER_ROLE);
        assert_eq!(top[0].champion, "Champ0");
    }
}
