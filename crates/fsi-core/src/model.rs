// Candidate records and the league/roster context they are scored against.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Sport whose rankings are being drafted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sport {
    Nfl,
    Nba,
    Mlb,
    Nhl,
}

impl Sport {
    pub const ALL: [Sport; 4] = [Sport::Nfl, Sport::Nba, Sport::Mlb, Sport::Nhl];

    pub fn code(&self) -> &'static str {
        match self {
            Sport::Nfl => "NFL",
            Sport::Nba => "NBA",
            Sport::Mlb => "MLB",
            Sport::Nhl => "NHL",
        }
    }

    /// Case-insensitive lookup from a sport code.
    pub fn from_code(s: &str) -> Option<Self> {
        Sport::ALL
            .into_iter()
            .find(|sport| sport.code().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// League scoring format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoringFormat {
    #[serde(rename = "PPR")]
    Ppr,
    #[serde(rename = "Half-PPR")]
    HalfPpr,
    #[serde(rename = "Standard")]
    Standard,
    #[serde(rename = "Cat/Points", alias = "Category/Points")]
    CategoryPoints,
}

impl ScoringFormat {
    pub fn label(&self) -> &'static str {
        match self {
            ScoringFormat::Ppr => "PPR",
            ScoringFormat::HalfPpr => "Half-PPR",
            ScoringFormat::Standard => "Standard",
            ScoringFormat::CategoryPoints => "Cat/Points",
        }
    }

    /// The next format in display order, wrapping around.
    pub fn cycle(&self) -> Self {
        match self {
            ScoringFormat::Ppr => ScoringFormat::HalfPpr,
            ScoringFormat::HalfPpr => ScoringFormat::Standard,
            ScoringFormat::Standard => ScoringFormat::CategoryPoints,
            ScoringFormat::CategoryPoints => ScoringFormat::Ppr,
        }
    }
}

impl fmt::Display for ScoringFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Quarterback roster format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QbFormat {
    #[serde(rename = "1QB")]
    OneQb,
    #[serde(rename = "SF", alias = "Superflex")]
    Superflex,
}

impl QbFormat {
    pub fn label(&self) -> &'static str {
        match self {
            QbFormat::OneQb => "1QB",
            QbFormat::Superflex => "SF",
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            QbFormat::OneQb => QbFormat::Superflex,
            QbFormat::Superflex => QbFormat::OneQb,
        }
    }
}

impl fmt::Display for QbFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// PlayerCandidate
// ---------------------------------------------------------------------------

/// One draftable player from the rankings pool.
///
/// Every numeric field is optional. An absent value is neutral for scoring
/// rather than zero; see `scoring` for the per-field defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCandidate {
    #[serde(rename = "player")]
    pub name: String,
    #[serde(rename = "pos")]
    pub position: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub bye: Option<u32>,
    #[serde(default)]
    pub ecr: Option<f64>,
    #[serde(default)]
    pub adp: Option<f64>,
    #[serde(default)]
    pub proj_pts: Option<f64>,
    #[serde(default)]
    pub tier: Option<u32>,
}

impl PlayerCandidate {
    /// A candidate with only the identity fields set.
    pub fn new(name: impl Into<String>, position: impl Into<String>, team: impl Into<String>) -> Self {
        PlayerCandidate {
            name: name.into(),
            position: position.into().trim().to_uppercase(),
            team: team.into(),
            bye: None,
            ecr: None,
            adp: None,
            proj_pts: None,
            tier: None,
        }
    }
}

// ---------------------------------------------------------------------------
// RosterState
// ---------------------------------------------------------------------------

/// The drafting user's team at decision time. Rebuilt for every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterState {
    pub picks_made: Vec<String>,
    pub roster_counts: BTreeMap<String, u32>,
    pub starters_needed: BTreeMap<String, u32>,
    pub bench_slots_left: u32,
    pub draft_round: u32,
    pub pick_overall: u32,
    /// Other teams' picks between this pick and the user's next one.
    pub turns_until_next_pick: u32,
}

impl Default for RosterState {
    fn default() -> Self {
        RosterState {
            picks_made: Vec::new(),
            roster_counts: BTreeMap::new(),
            starters_needed: BTreeMap::new(),
            bench_slots_left: 0,
            draft_round: 1,
            pick_overall: 1,
            turns_until_next_pick: 2,
        }
    }
}

// ---------------------------------------------------------------------------
// LeagueSettings
// ---------------------------------------------------------------------------

/// Static configuration for one draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueSettings {
    pub teams: u32,
    pub scoring: ScoringFormat,
    pub qb_format: QbFormat,
    /// Per-position caps. When a position is present here it takes priority
    /// over the roster's starter count for need weighting.
    pub roster_limits: BTreeMap<String, u32>,
}

impl Default for LeagueSettings {
    fn default() -> Self {
        let roster_limits = [("QB", 1), ("RB", 2), ("WR", 2), ("TE", 1), ("DST", 1), ("K", 1)]
            .into_iter()
            .map(|(pos, n)| (pos.to_string(), n))
            .collect();
        LeagueSettings {
            teams: 12,
            scoring: ScoringFormat::Ppr,
            qb_format: QbFormat::OneQb,
            roster_limits,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
