// Ranking and shortlist selection.

use std::cmp::Ordering;

use serde::Serialize;

use crate::model::{LeagueSettings, PlayerCandidate, RosterState};
use crate::scoring::{value_over_adp, Scorer};

/// A candidate with the numbers that ordered it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub candidate: PlayerCandidate,
    pub score: f64,
    pub need_weight: f64,
    pub value_over_adp: f64,
}

impl Scorer {
    /// Score every candidate and return them best-first, truncated to `limit`.
    ///
    /// The sort is stable: candidates with equal scores keep their input order.
    pub fn rank_scored(
        &self,
        candidates: &[PlayerCandidate],
        state: &RosterState,
        settings: &LeagueSettings,
        limit: usize,
    ) -> Vec<ScoredCandidate> {
        let mut scored: Vec<ScoredCandidate> = candidates
            .iter()
            .map(|c| {
                let need = self.need_weight(&c.position, state, settings);
                let blended = self.blended_score(c, state, settings);
                ScoredCandidate {
                    candidate: c.clone(),
                    score: blended * need,
                    need_weight: need,
                    value_over_adp: value_over_adp(c, state.pick_overall),
                }
            })
            .collect();

        scored.sort_by(|a, b| compare_desc(a.score, b.score));
        scored.truncate(limit);
        scored
    }

    pub fn rank_candidates(
        &self,
        candidates: &[PlayerCandidate],
        state: &RosterState,
        settings: &LeagueSettings,
        limit: usize,
    ) -> Vec<PlayerCandidate> {
        self.rank_scored(candidates, state, settings, limit)
            .into_iter()
            .map(|s| s.candidate)
            .collect()
    }
}

/// Rank with the default weights.
pub fn rank_candidates(
    candidates: &[PlayerCandidate],
    state: &RosterState,
    settings: &LeagueSettings,
    limit: usize,
) -> Vec<PlayerCandidate> {
    Scorer::default().rank_candidates(candidates, state, settings, limit)
}

/// Descending order over scores. NaN sinks below every number; -0.0 ties 0.0.
fn compare_desc(a: f64, b: f64) -> Ordering {
    sort_key(b).total_cmp(&sort_key(a))
}

fn sort_key(score: f64) -> f64 {
    if score.is_nan() {
        f64::NEG_INFINITY
    } else {
        score + 0.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
