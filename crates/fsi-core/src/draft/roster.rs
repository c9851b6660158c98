// The user's roster as typed text (`POS: Name` per line) and the
// RosterState assembled from it for scoring.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::snake::{bench_slots_left, draft_position};
use crate::model::RosterState;

/// One `POS: Name` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub position: String,
    pub name: String,
}

/// Roster lines in input order plus per-position counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRoster {
    pub entries: Vec<RosterEntry>,
    pub counts: BTreeMap<String, u32>,
}

impl ParsedRoster {
    /// Names of rostered players, in input order.
    pub fn names(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| !e.name.is_empty())
            .map(|e| e.name.clone())
            .collect()
    }
}

/// Parse roster text. The position is the token before the first colon,
/// trimmed and uppercased; the rest of the line is the player name. Lines
/// without a colon, or with nothing before it, are ignored.
pub fn parse_roster_lines(text: &str) -> ParsedRoster {
    let mut roster = ParsedRoster::default();
    for line in text.lines() {
        let line = line.trim();
        let Some((pos, name)) = line.split_once(':') else {
            if !line.is_empty() {
                debug!("ignoring roster line without a position: {}", line);
            }
            continue;
        };
        let position = pos.trim().to_uppercase();
        if position.is_empty() {
            continue;
        }
        *roster.counts.entry(position.clone()).or_insert(0) += 1;
        roster.entries.push(RosterEntry {
            position,
            name: name.trim().to_string(),
        });
    }
    roster
}

/// Assemble the RosterState for a decision at `pick_overall`.
pub fn build_roster_state(
    roster: &ParsedRoster,
    starters: &BTreeMap<String, u32>,
    bench_slots: u32,
    teams: u32,
    pick_overall: u32,
) -> RosterState {
    let position = draft_position(teams, pick_overall);
    RosterState {
        picks_made: roster.names(),
        roster_counts: roster.counts.clone(),
        starters_needed: starters.clone(),
        bench_slots_left: bench_slots_left(bench_slots, &roster.counts, starters),
        draft_round: position.round,
        pick_overall: pick_overall.max(1),
        turns_until_next_pick: position.turns_until_next_pick,
    }
}
