// Messages between the TUI and the app orchestrator.

use std::collections::BTreeMap;

use fsi_core::draft::RosterEntry;
use fsi_core::{QbFormat, ScoredCandidate, ScoringFormat, Sport};
use fsi_llm::AdviceReport;

/// Main-panel tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabId {
    Recommendations,
    Available,
    Drafted,
}

/// What the user asked the app to do.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// Free text naming one or more drafted players.
    AddDrafted(String),
    /// A `POS: Name` line for the user's own roster.
    AddRosterLine(String),
    UndoDrafted,
    /// Move the next-pick number by this many picks.
    AdjustPick(i32),
    ToggleQbFormat,
    CycleScoring,
    RequestRecommendations,
    /// Clear the download cache and reload rankings.
    RefreshRankings,
    Quit,
}

/// State the TUI needs to render, rebuilt after every change.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSnapshot {
    pub league_name: String,
    pub sport: Sport,
    pub teams: u32,
    pub scoring: ScoringFormat,
    pub qb_format: QbFormat,
    pub pick_overall: u32,
    pub draft_round: u32,
    pub turns_until_next_pick: u32,
    pub rankings_source: String,
    pub rankings_total: usize,
    /// Ranked undrafted players, best first, capped at the display limit.
    pub available: Vec<ScoredCandidate>,
    pub drafted: Vec<String>,
    pub roster: Vec<RosterEntry>,
    pub roster_counts: BTreeMap<String, u32>,
    pub llm_enabled: bool,
}

impl Default for AppSnapshot {
    fn default() -> Self {
        AppSnapshot {
            league_name: String::new(),
            sport: Sport::Nfl,
            teams: 12,
            scoring: ScoringFormat::Ppr,
            qb_format: QbFormat::OneQb,
            pick_overall: 1,
            draft_round: 1,
            turns_until_next_pick: 0,
            rankings_source: String::new(),
            rankings_total: 0,
            available: Vec::new(),
            drafted: Vec::new(),
            roster: Vec::new(),
            roster_counts: BTreeMap::new(),
            llm_enabled: false,
        }
    }
}

/// Pushed from the app orchestrator to the TUI.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    StateSnapshot(Box<AppSnapshot>),
    RecommendationStarted,
    RecommendationToken(String),
    RecommendationReady(Box<AdviceReport>),
    RecommendationError(String),
    /// One-line message for the help bar.
    Notice(String),
}
