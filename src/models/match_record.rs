//! Match records and their ingestion.
//!
//! Raw documents arrive in a flattened shape:
//! `{match_metadata, participants: [...], team_stats: {blue, red}}`.
//! Every field is optional. Defaults are applied here, once, so the reducers
//! only ever see fully-populated [`ParsedParticipant`] and [`ParsedTeam`]
//! values.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Entity identifier used when a participant carries no champion.
pub const UNKNOWN_ENTITY: &str = "Unknown";

/// Role label the upstream API uses for unassigned positions.
pub const INVALID_ROLE: &str = "Invalid";

/// The five lane assignments matchups are tracked for.
pub const CANONICAL_ROLES: [&str; 5] = ["TOP", "JUNGLE", "MIDDLE", "BOTTOM", "UTILITY"];

/// One completed game, as stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(default)]
    pub match_metadata: Option<Value>,

    #[serde(default)]
    pub participants: Option<Vec<Value>>,

    #[serde(default)]
    pub team_stats: Option<HashMap<String, Value>>,
}

impl MatchRecord {
    /// Upstream match id, if the metadata carries one.
    pub fn match_id(&self) -> Option<&str> {
        self.match_metadata
            .as_ref()?
            .get("match_id")?
            .as_str()
            .filter(|id| !id.is_empty())
    }
}

/// Participant fields as they appear in the document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawParticipant {
    champion: Option<String>,
    win: Option<bool>,
    kills: Option<u32>,
    deaths: Option<u32>,
    assists: Option<u32>,
    damage_dealt_champions: Option<f64>,
    total_cs: Option<f64>,
    gold_earned: Option<f64>,
    vision_score: Option<f64>,
    damage_per_min: Option<f64>,
    gold_per_min: Option<f64>,
    cs_per_min: Option<f64>,
    vision_per_min: Option<f64>,
    kda: Option<f64>,
    team_id: Option<i64>,
    position: Option<String>,
    individual_position: Option<String>,
    #[serde(deserialize_with = "lenient_items")]
    items: Option<Vec<u32>>,
}

/// Item lists of the wrong shape only lose build tracking, not the participant.
fn lenient_items<'de, D>(deserializer: D) -> Result<Option<Vec<u32>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Team fields as they appear in the document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawTeam {
    win: Option<bool>,
    objectives: Option<RawObjectives>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawObjectives {
    first_blood: Option<bool>,
    first_tower: Option<bool>,
    first_dragon: Option<bool>,
    first_baron: Option<bool>,
}

/// Side of the map a participant played on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamSide {
    Blue,
    Red,
}

impl TeamSide {
    pub const ALL: [TeamSide; 2] = [TeamSide::Blue, TeamSide::Red];

    /// Map the upstream numeric team id (100 = blue, 200 = red).
    pub fn from_team_id(id: i64) -> Option<Self> {
        match id {
            100 => Some(TeamSide::Blue),
            200 => Some(TeamSide::Red),
            _ => None,
        }
    }

    /// Key used in the `team_stats` mapping.
    pub fn key(&self) -> &'static str {
        match self {
            TeamSide::Blue => "blue",
            TeamSide::Red => "red",
        }
    }
}

/// The four first-objective flags tracked per team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    FirstBlood,
    FirstTower,
    FirstDragon,
    FirstBaron,
}

impl Objective {
    pub const ALL: [Objective; 4] = [
        Objective::FirstBlood,
        Objective::FirstTower,
        Objective::FirstDragon,
        Objective::FirstBaron,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Objective::FirstBlood => "first_blood",
            Objective::FirstTower => "first_tower",
            Objective::FirstDragon => "first_dragon",
            Objective::FirstBaron => "first_baron",
        }
    }

    fn index(&self) -> usize {
        match self {
            Objective::FirstBlood => 0,
            Objective::FirstTower => 1,
            Objective::FirstDragon => 2,
            Objective::FirstBaron => 3,
        }
    }
}

/// Precomputed per-minute rates. Averaged downstream, never recomputed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PerMinuteRates {
    pub damage: f64,
    pub gold: f64,
    pub cs: f64,
    pub vision: f64,
}

/// One participant with all defaults applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedParticipant {
    /// `None` when the record carried no usable champion.
    pub champion: Option<String>,
    pub win: bool,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub damage_dealt: f64,
    pub total_cs: f64,
    pub gold_earned: f64,
    pub vision_score: f64,
    pub per_minute: PerMinuteRates,
    pub kda: f64,
    pub team: Option<TeamSide>,
    /// `None` for empty or `Invalid` positions.
    pub position: Option<String>,
    pub items: Vec<u32>,
}

impl ParsedParticipant {
    /// Sorted item list, so acquisition order does not split builds.
    pub fn build(&self) -> Vec<u32> {
        let mut items = self.items.clone();
        items.sort_unstable();
        items
    }
}

impl From<RawParticipant> for ParsedParticipant {
    fn from(raw: RawParticipant) -> Self {
        let champion = raw
            .champion
            .filter(|c| !c.is_empty() && c != UNKNOWN_ENTITY);

        let position = raw
            .position
            .filter(|p| !p.is_empty())
            .or(raw.individual_position)
            .filter(|p| !p.is_empty() && p != INVALID_ROLE);

        Self {
            champion,
            win: raw.win.unwrap_or(false),
            kills: raw.kills.unwrap_or(0),
            deaths: raw.deaths.unwrap_or(0),
            assists: raw.assists.unwrap_or(0),
            damage_dealt: raw.damage_dealt_champions.unwrap_or(0.0),
            total_cs: raw.total_cs.unwrap_or(0.0),
            gold_earned: raw.gold_earned.unwrap_or(0.0),
            vision_score: raw.vision_score.unwrap_or(0.0),
            per_minute: PerMinuteRates {
                damage: raw.damage_per_min.unwrap_or(0.0),
                gold: raw.gold_per_min.unwrap_or(0.0),
                cs: raw.cs_per_min.unwrap_or(0.0),
                vision: raw.vision_per_min.unwrap_or(0.0),
            },
            kda: raw.kda.unwrap_or(0.0),
            team: raw.team_id.and_then(TeamSide::from_team_id),
            position,
            items: raw.items.unwrap_or_default(),
        }
    }
}

/// One team's outcome with all defaults applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParsedTeam {
    pub win: bool,
    objectives: [bool; 4],
}

impl ParsedTeam {
    pub fn new(win: bool, achieved: &[Objective]) -> Self {
        let mut objectives = [false; 4];
        for objective in achieved {
            objectives[objective.index()] = true;
        }
        Self { win, objectives }
    }

    pub fn achieved(&self, objective: Objective) -> bool {
        self.objectives[objective.index()]
    }
}

impl From<RawTeam> for ParsedTeam {
    fn from(raw: RawTeam) -> Self {
        let objectives = raw.objectives.unwrap_or_default();
        Self {
            win: raw.win.unwrap_or(false),
            objectives: [
                objectives.first_blood.unwrap_or(false),
                objectives.first_tower.unwrap_or(false),
                objectives.first_dragon.unwrap_or(false),
                objectives.first_baron.unwrap_or(false),
            ],
        }
    }
}

/// Why part of a record was left out of aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("participant {index}: {message}")]
    MalformedParticipant { index: usize, message: String },

    #[error("team {side}: {message}")]
    MalformedTeam { side: String, message: String },

    #[error("duplicate match {0}")]
    DuplicateMatch(String),
}

/// A match ready for the reducers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedMatch {
    pub match_id: Option<String>,
    pub participants: Vec<ParsedParticipant>,
    pub blue: Option<ParsedTeam>,
    pub red: Option<ParsedTeam>,
}

impl ParsedMatch {
    pub fn team(&self, side: TeamSide) -> Option<&ParsedTeam> {
        match side {
            TeamSide::Blue => self.blue.as_ref(),
            TeamSide::Red => self.red.as_ref(),
        }
    }
}

/// Parse one participant value.
pub fn parse_participant(index: usize, value: Value) -> Result<ParsedParticipant, SkipReason> {
    serde_json::from_value::<RawParticipant>(value)
        .map(ParsedParticipant::from)
        .map_err(|e| SkipReason::MalformedParticipant {
            index,
            message: e.to_string(),
        })
}

fn parse_team(side: TeamSide, value: Value) -> Result<ParsedTeam, SkipReason> {
    serde_json::from_value::<RawTeam>(value)
        .map(ParsedTeam::from)
        .map_err(|e| SkipReason::MalformedTeam {
            side: side.key().to_string(),
            message: e.to_string(),
        })
}

/// Parse one match. Malformed participants or teams are dropped individually
/// and reported; the rest of the match is kept.
pub fn parse_match(record: MatchRecord) -> (ParsedMatch, Vec<SkipReason>) {
    let match_id = record.match_id().map(str::to_string);
    let mut skipped = Vec::new();

    let participants = record
        .participants
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match parse_participant(i, value) {
            Ok(p) => Some(p),
            Err(reason) => {
                skipped.push(reason);
                None
            }
        })
        .collect();

    let mut team_stats = record.team_stats.unwrap_or_default();
    let mut take_team = |side: TeamSide| {
        let value = team_stats.remove(side.key())?;
        match parse_team(side, value) {
            Ok(team) => Some(team),
            Err(reason) => {
                skipped.push(reason);
                None
            }
        }
    };
    let blue = take_team(TeamSide::Blue);
    let red = take_team(TeamSide::Red);

    (
        ParsedMatch {
            match_id,
            participants,
            blue,
            red,
        },
        skipped,
    )
}

/// Outcome of ingesting a batch of records.
#[derive(Debug, Clone, Default)]
pub struct IngestOutcome {
    pub matches: Vec<ParsedMatch>,
    pub skipped: Vec<SkipReason>,
}

impl IngestOutcome {
    pub fn participants_skipped(&self) -> usize {
        self.skipped
            .iter()
            .filter(|r| matches!(r, SkipReason::MalformedParticipant { .. }))
            .count()
    }

    pub fn duplicates_dropped(&self) -> usize {
        self.skipped
            .iter()
            .filter(|r| matches!(r, SkipReason::DuplicateMatch(_)))
            .count()
    }
}

/// Parse a batch of records, dropping repeated match ids (first one wins).
/// Records without an id are always kept.
pub fn ingest(records: Vec<MatchRecord>) -> IngestOutcome {
    let mut seen: HashSet<String> = HashSet::new();
    let mut outcome = IngestOutcome::default();

    for record in records {
        if let Some(id) = record.match_id() {
            if !seen.insert(id.to_string()) {
                outcome
                    .skipped
                    .push(SkipReason::DuplicateMatch(id.to_string()));
                continue;
            }
        }

        let (parsed, skipped) = parse_match(record);
        outcome.matches.push(parsed);
        outcome.skipped.extend(skipped);
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> MatchRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_malformed_items_keep_participant() {
        let p = parse_participant(
            0,
            json!({
                "champion": "Ahri",
                "position": "MIDDLE",
                "team_id": 100,
                "items": [3031, null],
            }),
        )
        .unwrap();
        assert_eq!(p.champion.as_deref(), Some("Ahri"));
        assert_eq!(p.position.as_deref(), Some("MIDDLE"));
        assert!(p.items.is_empty());

        let p = parse_participant(0, json!({"champion": "Zed", "items": "none"})).unwrap();
        assert!(p.items.is_empty());
    }

    #[test]
    fn test_defaults_applied_to_empty_participant() {
        let p = parse_participant(0, json!({})).unwrap();

        assert_eq!(p.champion, None);
        assert!(!p.win);
        assert_eq!(p.kills, 0);
        assert_eq!(p.gold_earned, 0.0);
        assert_eq!(p.per_minute, PerMinuteRates::default());
        assert_eq!(p.team, None);
        assert_eq!(p.position, None);
        assert!(p.items.is_empty());
    }

    #[test]
    fn test_unknown_and_empty_champion_are_sentinel() {
        let unknown = parse_participant(0, json!({"champion": "Unknown"})).unwrap();
        let empty = parse_participant(1, json!({"champion": ""})).unwrap();
        let ahri = parse_participant(2, json!({"champion": "Ahri"})).unwrap();

        assert_eq!(unknown.champion, None);
        assert_eq!(empty.champion, None);
        assert_eq!(ahri.champion.as_deref(), Some("Ahri"));
    }

    #[test]
    fn test_position_fallback_and_invalid() {
        let fallback =
            parse_participant(0, json!({"position": "", "individual_position": "TOP"})).unwrap();
        let invalid = parse_participant(1, json!({"position": "Invalid"})).unwrap();
        let null = parse_participant(2, json!({"position": null})).unwrap();

        assert_eq!(fallback.position.as_deref(), Some("TOP"));
        assert_eq!(invalid.position, None);
        assert_eq!(null.position, None);
    }

    #[test]
    fn test_team_id_mapping() {
        let blue = parse_participant(0, json!({"team_id": 100})).unwrap();
        let red = parse_participant(1, json!({"team_id": 200})).unwrap();
        let other = parse_participant(2, json!({"team_id": 300})).unwrap();

        assert_eq!(blue.team, Some(TeamSide::Blue));
        assert_eq!(red.team, Some(TeamSide::Red));
        assert_eq!(other.team, None);
    }

    #[test]
    fn test_malformed_participant_is_reported() {
        let err = parse_participant(3, json!({"kills": "lots"})).unwrap_err();
        assert!(matches!(err, SkipReason::MalformedParticipant { index: 3, .. }));

        let err = parse_participant(4, json!("not an object")).unwrap_err();
        assert!(matches!(err, SkipReason::MalformedParticipant { index: 4, .. }));
    }

    #[test]
    fn test_build_is_sorted() {
        let p = parse_participant(0, json!({"items": [3, 1, 2]})).unwrap();
        assert_eq!(p.build(), vec![1, 2, 3]);
        assert_eq!(p.items, vec![3, 1, 2]);
    }

    #[test]
    fn test_parse_match_skips_only_bad_participant() {
        let (parsed, skipped) = parse_match(record(json!({
            "participants": [
                {"champion": "Ahri", "win": true},
                {"champion": "Zed", "deaths": -1},
                {"champion": "Lux"}
            ]
        })));

        assert_eq!(parsed.participants.len(), 2);
        assert_eq!(skipped.len(), 1);
        assert_eq!(parsed.participants[1].champion.as_deref(), Some("Lux"));
    }

    #[test]
    fn test_parse_match_teams() {
        let (parsed, skipped) = parse_match(record(json!({
            "team_stats": {
                "blue": {"win": true, "objectives": {"first_blood": true}},
                "red": {"win": "yes"}
            }
        })));

        let blue = parsed.blue.unwrap();
        assert!(blue.win);
        assert!(blue.achieved(Objective::FirstBlood));
        assert!(!blue.achieved(Objective::FirstBaron));
        assert!(parsed.red.is_none());
        assert_eq!(skipped.len(), 1);
    }

    #[test]
    fn test_missing_sections_yield_empty_match() {
        let (parsed, skipped) = parse_match(record(json!({})));
        assert!(parsed.participants.is_empty());
        assert!(parsed.blue.is_none());
        assert!(parsed.red.is_none());
        assert!(skipped.is_empty());
    }

    #[test]
    fn test_ingest_drops_duplicate_match_ids() {
        let records = vec![
            record(json!({"match_metadata": {"match_id": "NA1_1"}, "participants": [{}]})),
            record(json!({"match_metadata": {"match_id": "NA1_1"}})),
            record(json!({"match_metadata": {"match_id": "NA1_2"}})),
            record(json!({})),
            record(json!({})),
        ];

        let outcome = ingest(records);
        assert_eq!(outcome.matches.len(), 4);
        assert_eq!(outcome.duplicates_dropped(), 1);
        assert_eq!(outcome.matches[0].participants.len(), 1);
    }

    #[test]
    fn test_objective_keys() {
        let keys: Vec<&str> = Objective::ALL.iter().map(|o| o.key()).collect();
        assert_eq!(
            keys,
            vec!["first_blood", "first_tower", "first_dragon", "first_baron"]
        );
    }
}
