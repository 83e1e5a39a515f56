//! First-objective win correlations.

use crate::models::{Objective, ObjectiveStats, ParsedMatch, TeamSide, WinRecord};

/// For each first objective, count the teams that secured it and how many of
/// those teams won. Blue and red are tallied independently; a match without
/// team stats contributes nothing.
pub fn aggregate_objective_correlations(matches: &[ParsedMatch]) -> ObjectiveStats {
    let mut tallies = [(0u32, 0u32); 4];

    for game in matches {
        for side in TeamSide::ALL {
            let Some(team) = game.team(side) else {
                continue;
            };
            for (slot, objective) in Objective::ALL.iter().enumerate() {
                if team.achieved(*objective) {
                    tallies[slot].0 += 1;
                    if team.win {
                        tallies[slot].1 += 1;
                    }
                }
            }
        }
    }

    let mut stats = ObjectiveStats::default();
    for (objective, (games, wins)) in Objective::ALL.iter().zip(tallies) {
        *stats.get_mut(*objective) = WinRecord::new(games, wins);
    }
    stats
}
