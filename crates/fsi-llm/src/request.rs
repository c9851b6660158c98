// The typed recommendation request and adapters from older, looser shapes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use fsi_core::{LeagueSettings, PlayerCandidate, QbFormat, RosterState, ScoringFormat, Sport};

/// Placeholder for fields a name-only input cannot supply.
pub const UNKNOWN: &str = "UNK";

/// User preferences passed to the model verbatim. They do not affect scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport: Option<Sport>,
    #[serde(default)]
    pub position_priority: Vec<String>,
}

/// Everything one recommendation call needs.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationRequest {
    pub candidates: Vec<PlayerCandidate>,
    pub state: RosterState,
    pub settings: LeagueSettings,
    pub preferences: Preferences,
}

/// Candidates from bare names. Position and team are unknown.
pub fn candidates_from_names(names: &[String]) -> Vec<PlayerCandidate> {
    names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .map(|n| PlayerCandidate::new(n, UNKNOWN, UNKNOWN))
        .collect()
}

// ---------------------------------------------------------------------------
// Legacy keyword-style request
// ---------------------------------------------------------------------------

/// The available pool in a legacy request: bare names or loose records.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LegacyPool {
    Names(Vec<String>),
    Records(Vec<LegacyRecord>),
}

/// A player record with the capitalizations older callers used.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LegacyRecord {
    #[serde(alias = "Player", alias = "name")]
    pub player: Option<String>,
    #[serde(alias = "Pos")]
    pub pos: Option<String>,
    #[serde(alias = "Team")]
    pub team: Option<String>,
    pub bye: Option<u32>,
    pub ecr: Option<f64>,
    pub adp: Option<f64>,
    pub proj_pts: Option<f64>,
    pub tier: Option<u32>,
}

impl LegacyRecord {
    fn into_candidate(self) -> PlayerCandidate {
        let text = |v: Option<String>, fallback: &str| {
            v.map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| fallback.to_string())
        };
        let mut candidate = PlayerCandidate::new(
            text(self.player, "Unknown"),
            text(self.pos, UNKNOWN),
            text(self.team, UNKNOWN),
        );
        candidate.bye = self.bye;
        candidate.ecr = self.ecr;
        candidate.adp = self.adp;
        candidate.proj_pts = self.proj_pts;
        candidate.tier = self.tier;
        candidate
    }
}

/// Draft state nested under `state` in a legacy request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LegacyState {
    pub picks_made: Option<Vec<String>>,
    pub roster_counts: Option<BTreeMap<String, u32>>,
    pub starters_needed: Option<BTreeMap<String, u32>>,
    pub bench_slots_left: Option<u32>,
    pub draft_round: Option<u32>,
    pub pick_overall: Option<u32>,
    pub turns_until_next_pick: Option<u32>,
}

/// League settings nested under `settings` in a legacy request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LegacySettings {
    pub teams: Option<u32>,
    pub scoring: Option<ScoringFormat>,
    pub qb_format: Option<QbFormat>,
    pub roster_limits: Option<BTreeMap<String, u32>>,
}

fn non_empty<T>(map: Option<BTreeMap<String, T>>) -> Option<BTreeMap<String, T>> {
    map.filter(|m| !m.is_empty())
}

/// Absent fields take the defaults a fresh
/// draft would have: pick 1, round 1, two turns until the next pick, a
/// 12-team PPR 1QB league with standard roster limits.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LegacyRequest {
    pub available: Option<LegacyPool>,
    pub picks_made: Option<Vec<String>>,
    pub next_pick: Option<u32>,
    pub draft_round: Option<u32>,
    pub turns_until_next_pick: Option<u32>,
    pub roster_counts: Option<BTreeMap<String, u32>>,
    pub starters_needed: Option<BTreeMap<String, u32>>,
    pub bench_slots_left: Option<u32>,
    pub teams: Option<u32>,
    pub scoring: Option<ScoringFormat>,
    pub qb_format: Option<QbFormat>,
    pub roster_limits: Option<BTreeMap<String, u32>>,
    pub state: Option<LegacyState>,
    pub settings: Option<LegacySettings>,
}

impl LegacyRequest {
    pub fn into_request(self) -> RecommendationRequest {
        let candidates = match self.available {
            Some(LegacyPool::Names(names)) => candidates_from_names(&names),
            Some(LegacyPool::Records(records)) => {
                records.into_iter().map(LegacyRecord::into_candidate).collect()
            }
            None => Vec::new(),
        };

        let nested = self.state.unwrap_or_default();
        let defaults = RosterState::default();
        let state = RosterState {
            picks_made: self.picks_made.or(nested.picks_made).unwrap_or_default(),
            roster_counts: non_empty(self.roster_counts)
                .or(nested.roster_counts)
                .unwrap_or_default(),
            starters_needed: non_empty(self.starters_needed)
                .or(nested.starters_needed)
                .unwrap_or_default(),
            bench_slots_left: self
                .bench_slots_left
                .or(nested.bench_slots_left)
                .unwrap_or(defaults.bench_slots_left),
            draft_round: self
                .draft_round
                .or(nested.draft_round)
                .unwrap_or(defaults.draft_round),
            pick_overall: self
                .next_pick
                .or(nested.pick_overall)
                .unwrap_or(defaults.pick_overall),
            turns_until_next_pick: self
                .turns_until_next_pick
                .or(nested.turns_until_next_pick)
                .unwrap_or(defaults.turns_until_next_pick),
        };

        let base = self.settings.unwrap_or_default();
        let league = LeagueSettings::default();
        let settings = LeagueSettings {
            teams: self.teams.or(base.teams).unwrap_or(league.teams),
            scoring: self.scoring.or(base.scoring).unwrap_or(league.scoring),
            qb_format: self.qb_format.or(base.qb_format).unwrap_or(league.qb_format),
            roster_limits: non_empty(self.roster_limits)
                .or_else(|| non_empty(base.roster_limits))
                .unwrap_or(league.roster_limits),
        };

        RecommendationRequest {
            candidates,
            state,
            settings,
            preferences: Preferences::default(),
        }
    }
}

impl From<LegacyRequest> for RecommendationRequest {
    fn from(legacy: LegacyRequest) -> Self {
        legacy.into_request()
    }
}
