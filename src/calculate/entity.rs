//! Per-champion statistics.

use crate::models::{EntityStats, EntityStatsTable, OrderedMap, ParsedMatch, ParsedParticipant};

use super::{per_game, percentage, round_to, RunningMean};

/// Primary position reported for champions with no tracked role.
pub const UNKNOWN_POSITION: &str = "UNKNOWN";

/// A role counts toward flexibility once it covers this share of games.
const FLEX_POSITION_SHARE: f64 = 0.1;

#[derive(Debug, Default)]
struct ChampionTally {
    games: u32,
    wins: u32,
    kills: u64,
    deaths: u64,
    assists: u64,
    damage: f64,
    cs: f64,
    gold: f64,
    vision: f64,
    damage_per_min: RunningMean,
    cs_per_min: RunningMean,
    gold_per_min: RunningMean,
    vision_per_min: RunningMean,
    kda: RunningMean,
    positions: OrderedMap<String, u32>,
}

impl ChampionTally {
    fn record(&mut self, p: &ParsedParticipant) {
        self.games += 1;
        if p.win {
            self.wins += 1;
        }
        self.kills += u64::from(p.kills);
        self.deaths += u64::from(p.deaths);
        self.assists += u64::from(p.assists);
        self.damage += p.damage_dealt;
        self.cs += p.total_cs;
        self.gold += p.gold_earned;
        self.vision += p.vision_score;

        self.damage_per_min.push(p.per_minute.damage);
        self.cs_per_min.push(p.per_minute.cs);
        self.gold_per_min.push(p.per_minute.gold);
        self.vision_per_min.push(p.per_minute.vision);
        self.kda.push(p.kda);

        if let Some(position) = &p.position {
            *self.positions.get_or_insert_with(position.clone(), || 0) += 1;
        }
    }

    /// Most frequent position; the first one seen wins a tie.
    fn primary_position(&self) -> String {
        let mut best: Option<(&String, u32)> = None;
        for (position, &count) in self.positions.iter() {
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((position, count));
            }
        }
        best.map(|(position, _)| position.clone())
            .unwrap_or_else(|| UNKNOWN_POSITION.to_string())
    }

    fn position_flexibility(&self) -> u32 {
        if self.games == 0 {
            return 0;
        }
        self.positions
            .values()
            .filter(|&&count| count as f64 / self.games as f64 >= FLEX_POSITION_SHARE)
            .count() as u32
    }

    /// Derived stats; pick rate is filled in once all champions are known.
    fn finish(&self) -> EntityStats {
        let games = self.games;
        let gold_efficiency = if self.gold > 0.0 {
            round_to(self.damage / self.gold * 1000.0, 2)
        } else {
            0.0
        };

        EntityStats {
            games_played: games,
            wins: self.wins,
            win_rate: percentage(self.wins, games),
            pick_rate: 0.0,
            avg_kills: per_game(self.kills as f64, games, 2),
            avg_deaths: per_game(self.deaths as f64, games, 2),
            avg_assists: per_game(self.assists as f64, games, 2),
            avg_kda: self.kda.mean(),
            avg_damage: per_game(self.damage, games, 0),
            avg_damage_per_min: self.damage_per_min.mean(),
            avg_cs: per_game(self.cs, games, 1),
            avg_cs_per_min: self.cs_per_min.mean(),
            avg_gold_earned: per_game(self.gold, games, 0),
            avg_gold_per_min: self.gold_per_min.mean(),
            gold_efficiency,
            avg_vision_score: per_game(self.vision, games, 1),
            avg_vision_per_min: self.vision_per_min.mean(),
            primary_position: self.primary_position(),
            position_flexibility: self.position_flexibility(),
        }
    }
}

/// Aggregate per-champion statistics.
///
/// Pick rate is each champion's share of all champion picks (not of
/// matches), so the values sum to 100.
pub fn aggregate_champion_stats(matches: &[ParsedMatch]) -> EntityStatsTable {
    let mut tallies: OrderedMap<String, ChampionTally> = OrderedMap::new();

    for game in matches {
        for participant in &game.participants {
            let Some(champion) = &participant.champion else {
                continue;
            };
            tallies
                .get_or_insert_with(champion.clone(), ChampionTally::default)
                .record(participant);
        }
    }

    let mut table: EntityStatsTable = tallies
        .iter()
        .filter(|(_, tally)| tally.games > 0)
        .map(|(champion, tally)| (champion.clone(), tally.finish()))
        .collect();

    let total_picks: u32 = table.values().map(|s| s.games_played).sum();
    for (_, stats) in table.iter_mut() {
        stats.pick_rate = percentage(stats.games_played, total_picks);
    }

    table
}
