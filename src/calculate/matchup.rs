//! Head-to-head lane matchups.

use std::collections::HashMap;

use crate::models::{
    MatchupTable, OrderedMap, ParsedMatch, TeamSide, WinRecord, CANONICAL_ROLES,
};

/// Pairings seen fewer times than this are left out of the table.
pub const MIN_MATCHUP_GAMES: u32 = 3;

#[derive(Debug, Default, Clone, Copy)]
struct PairTally {
    games: u32,
    wins: u32,
}

/// Occupant of one (team, role) slot.
#[derive(Debug, Clone, Copy)]
struct Laner<'a> {
    champion: &'a str,
    win: bool,
}

/// Slot participants by (team, role). A later participant in the same slot
/// replaces the earlier one.
fn lane_slots(game: &ParsedMatch) -> HashMap<(TeamSide, &str), Laner<'_>> {
    let mut slots = HashMap::new();
    for p in &game.participants {
        let (Some(team), Some(position), Some(champion)) = (p.team, &p.position, &p.champion)
        else {
            continue;
        };
        slots.insert(
            (team, position.as_str()),
            Laner {
                champion: champion.as_str(),
                win: p.win,
            },
        );
    }
    slots
}

/// Track lane-opponent win rates.
///
/// Each canonical role occupied on both sides yields one observation in each
/// direction. The blue laner's win flag decides the outcome: the blue row
/// gets the win when it is set, the red row otherwise, so the two directions
/// of a pairing always split the games between them.
pub fn aggregate_matchups(matches: &[ParsedMatch]) -> MatchupTable {
    let mut tallies: OrderedMap<String, OrderedMap<String, PairTally>> = OrderedMap::new();

    let mut observe = |champion: &str, opponent: &str, won: bool| {
        let pair = tallies
            .get_or_insert_with(champion.to_string(), OrderedMap::new)
            .get_or_insert_with(opponent.to_string(), PairTally::default);
        pair.games += 1;
        if won {
            pair.wins += 1;
        }
    };

    for game in matches {
        let slots = lane_slots(game);
        for role in CANONICAL_ROLES {
            let (Some(blue), Some(red)) = (
                slots.get(&(TeamSide::Blue, role)),
                slots.get(&(TeamSide::Red, role)),
            ) else {
                continue;
            };

            observe(blue.champion, red.champion, blue.win);
            observe(red.champion, blue.champion, !blue.win);
        }
    }

    tallies
        .iter()
        .filter_map(|(champion, opponents)| {
            let significant: OrderedMap<String, WinRecord> = opponents
                .iter()
                .filter(|(_, pair)| pair.games >= MIN_MATCHUP_GAMES)
                .map(|(opponent, pair)| (opponent.clone(), WinRecord::new(pair.games, pair.wins)))
                .collect();
            if significant.is_empty() {
                None
            } else {
                Some((champion.clone(), significant))
            }
        })
        .collect()
}
