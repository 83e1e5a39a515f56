//! Popular item builds per champion.

use crate::models::{BuildStats, BuildStatsTable, ItemBuild, OrderedMap, ParsedMatch};

use super::percentage;

/// Builds listed per champion.
pub const TOP_BUILDS_PER_CHAMPION: usize = 5;

/// Count normalized item sets per champion and keep the most common ones.
/// Participants without a champion or without items are skipped.
pub fn aggregate_item_builds(matches: &[ParsedMatch]) -> BuildStatsTable {
    let mut builds: OrderedMap<String, OrderedMap<Vec<u32>, u32>> = OrderedMap::new();

    for game in matches {
        for p in &game.participants {
            let Some(champion) = &p.champion else {
                continue;
            };
            if p.items.is_empty() {
                continue;
            }

            *builds
                .get_or_insert_with(champion.clone(), OrderedMap::new)
                .get_or_insert_with(p.build(), || 0) += 1;
        }
    }

    builds
        .iter()
        .filter_map(|(champion, counts)| {
            let total_games: u32 = counts.values().sum();
            if total_games == 0 {
                return None;
            }

            let mut ranked: Vec<(&Vec<u32>, u32)> =
                counts.iter().map(|(items, &n)| (items, n)).collect();
            ranked.sort_by(|a, b| b.1.cmp(&a.1));

            let top_builds = ranked
                .into_iter()
                .take(TOP_BUILDS_PER_CHAMPION)
                .map(|(items, games)| ItemBuild {
                    items: items.clone(),
                    games,
                    pick_rate: percentage(games, total_games),
                })
                .collect();

            Some((
                champion.clone(),
                BuildStats {
                    total_games,
                    top_builds,
                },
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::fixtures::{game, player};
    use crate::models::{ParsedParticipant, TeamSide};

    fn with_items(champion: &str, items: &[u32]) -> ParsedParticipant {
        let mut p = player(champion, "TOP", TeamSide::Blue, true);
        p.items = items.to_vec();
        p
    }

    #[test]
    fn test_item_order_does_not_split_builds() {
        let table = aggregate_item_builds(&[game(vec![
            with_items("Garen", &[3, 1, 2]),
            with_items("Garen", &[1, 2, 3]),
        ])]);

        let garen = table.get("Garen").unwrap();
        assert_eq!(garen.total_games, 2);
        assert_eq!(garen.top_builds.len(), 1);
        assert_eq!(garen.top_builds[0].items, vec![1, 2, 3]);
        assert_eq!(garen.top_builds[0].games, 2);
        assert_eq!(garen.top_builds[0].pick_rate, 100.0);
    }

    #[test]
    fn test_duplicate_items_are_a_multiset() {
        let table = aggregate_item_builds(&[game(vec![
            with_items("Vayne", &[1055, 1055, 3006]),
            with_items("Vayne", &[1055, 3006]),
        ])]);

        assert_eq!(table.get("Vayne").unwrap().top_builds.len(), 2);
    }

    #[test]
    fn test_skips_empty_items_and_unknown_champion() {
        let mut unknown = with_items("x", &[1, 2]);
        unknown.champion = None;

        let table = aggregate_item_builds(&[game(vec![unknown, with_items("Lux", &[])])]);
        assert!(table.is_empty());
    }

    #[test]
    fn test_top_five_with_stable_ties() {
        let mut players = Vec::new();
        for build in 1..=7u32 {
            players.push(with_items("Ezreal", &[build]));
        }
        players.push(with_items("Ezreal", &[7]));

        let table = aggregate_item_builds(&[game(players)]);
        let ezreal = table.get("Ezreal").unwrap();

        assert_eq!(ezreal.total_games, 8);
        assert_eq!(ezreal.top_builds.len(), TOP_BUILDS_PER_CHAMPION);
        let order: Vec<Vec<u32>> = ezreal.top_builds.iter().map(|b| b.items.clone()).collect();
        assert_eq!(order, vec![vec![7], vec![1], vec![2], vec![3], vec![4]]);
        assert_eq!(ezreal.top_builds[0].pick_rate, 25.0);
        assert_eq!(ezreal.top_builds[1].pick_rate, 12.5);
    }
}
