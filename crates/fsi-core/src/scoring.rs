// Candidate scoring: positional need, value over ADP, blended merit and the
// final rank score.
//
// Every function here is pure arithmetic over defaulted optional fields. The
// numeric constants are empirical tuning choices; they live in
// `ScoringWeights` so strategy.toml can override any of them without code
// changes.

use serde::{Deserialize, Serialize};

use crate::model::{LeagueSettings, PlayerCandidate, QbFormat, RosterState};

// ---------------------------------------------------------------------------
// Named constants
// ---------------------------------------------------------------------------

/// Weight of the projection term in the blended score.
pub const PROJECTION_WEIGHT: f64 = 0.55;
/// Season points that count as one unit of projection.
pub const PROJECTION_SCALE: f64 = 50.0;
/// Weight of the value-over-ADP term in the blended score.
pub const VALUE_WEIGHT: f64 = 0.35;
/// Picks of ADP delta that count as one unit of value (two rounds of 12).
pub const VALUE_SCALE: f64 = 24.0;
/// Weight of the tier term in the blended score.
pub const TIER_WEIGHT: f64 = 0.10;
/// Per-tier penalty; lower tier numbers are better.
pub const TIER_COEFFICIENT: f64 = -0.25;
/// Tier assumed when the rankings carry none.
pub const DEFAULT_TIER: u32 = 5;
/// Need added per unfilled starter slot.
pub const NEED_PER_GAP: f64 = 0.35;
/// Need added when a positional run can happen before the next pick.
pub const RUN_RISK_BOOST: f64 = 0.15;
/// Minimum turns until the next pick for the run-risk boost to apply.
pub const RUN_RISK_MIN_TURNS: u32 = 2;
/// Flat bonus for positions that dry up fastest in typical leagues.
pub const SCARCITY_BONUS: f64 = 0.1;
/// Positions that receive `SCARCITY_BONUS`.
pub const SCARCE_POSITIONS: [&str; 2] = ["RB", "WR"];
/// Extra QB need in superflex leagues.
pub const SUPERFLEX_QB_BONUS: f64 = 0.6;

// ---------------------------------------------------------------------------
// ScoringWeights
// ---------------------------------------------------------------------------

/// Tunable scoring constants. `Default` reproduces the named constants above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub projection_weight: f64,
    pub projection_scale: f64,
    pub value_weight: f64,
    pub value_scale: f64,
    pub tier_weight: f64,
    pub tier_coefficient: f64,
    pub default_tier: u32,
    pub need_per_gap: f64,
    pub run_risk_boost: f64,
    pub run_risk_min_turns: u32,
    pub scarcity_bonus: f64,
    pub scarce_positions: Vec<String>,
    pub superflex_qb_bonus: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        ScoringWeights {
            projection_weight: PROJECTION_WEIGHT,
            projection_scale: PROJECTION_SCALE,
            value_weight: VALUE_WEIGHT,
            value_scale: VALUE_SCALE,
            tier_weight: TIER_WEIGHT,
            tier_coefficient: TIER_COEFFICIENT,
            default_tier: DEFAULT_TIER,
            need_per_gap: NEED_PER_GAP,
            run_risk_boost: RUN_RISK_BOOST,
            run_risk_min_turns: RUN_RISK_MIN_TURNS,
            scarcity_bonus: SCARCITY_BONUS,
            scarce_positions: SCARCE_POSITIONS.iter().map(|p| p.to_string()).collect(),
            superflex_qb_bonus: SUPERFLEX_QB_BONUS,
        }
    }
}

// ---------------------------------------------------------------------------
// Scorer
// ---------------------------------------------------------------------------

/// Scores candidates with a fixed set of weights.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    weights: ScoringWeights,
}

impl Scorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Scorer { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Positional-need multiplier, never below 1.0.
    ///
    /// Algorithm:
    /// 1. Starter target = league roster limit for the position, else the
    ///    roster's starters-needed entry, else 0.
    /// 2. Gap = target minus players already held, floored at 0.
    /// 3. Base = 1.0 + need_per_gap * gap, plus the run-risk boost when at
    ///    least `run_risk_min_turns` picks happen before the user's next one.
    /// 4. Scarce positions (RB/WR) get a flat bonus; QB gets the superflex
    ///    bonus in SF leagues.
    pub fn need_weight(
        &self,
        position: &str,
        state: &RosterState,
        settings: &LeagueSettings,
    ) -> f64 {
        let w = &self.weights;
        let starters = settings
            .roster_limits
            .get(position)
            .or_else(|| state.starters_needed.get(position))
            .copied()
            .unwrap_or(0);
        let have = state.roster_counts.get(position).copied().unwrap_or(0);
        let gap = starters.saturating_sub(have);

        let run_risk = if state.turns_until_next_pick >= w.run_risk_min_turns {
            w.run_risk_boost
        } else {
            0.0
        };

        let mut base = 1.0 + w.need_per_gap * f64::from(gap) + run_risk;
        if w.scarce_positions.iter().any(|p| p == position) {
            base += w.scarcity_bonus;
        }
        if position == "QB" && settings.qb_format == QbFormat::Superflex {
            base += w.superflex_qb_bonus;
        }
        base
    }

    /// Base merit: projection, value over ADP and tier, before need.
    pub fn blended_score(
        &self,
        player: &PlayerCandidate,
        state: &RosterState,
        _settings: &LeagueSettings,
    ) -> f64 {
        let w = &self.weights;
        let voa = value_over_adp(player, state.pick_overall);
        let proj = player.proj_pts.unwrap_or(0.0);
        let tier = f64::from(player.tier.unwrap_or(w.default_tier));
        let tier_adj = w.tier_coefficient * tier;

        w.projection_weight * (proj / w.projection_scale)
            + w.value_weight * (voa / w.value_scale)
            + w.tier_weight * tier_adj
    }

    /// Blended score multiplied by need. A negative blended score becomes
    /// more negative under a high need weight.
    pub fn final_rank_score(
        &self,
        player: &PlayerCandidate,
        state: &RosterState,
        settings: &LeagueSettings,
    ) -> f64 {
        self.blended_score(player, state, settings)
            * self.need_weight(&player.position, state, settings)
    }
}

// ---------------------------------------------------------------------------
// Free functions (default weights)
// ---------------------------------------------------------------------------

/// Picks between the current pick and the player's ADP. Positive means the
/// player has fallen past market; 0.0 when ADP is unknown.
pub fn value_over_adp(player: &PlayerCandidate, current_pick_overall: u32) -> f64 {
    match player.adp {
        Some(adp) => adp - f64::from(current_pick_overall),
        None => 0.0,
    }
}

pub fn need_weight(position: &str, state: &RosterState, settings: &LeagueSettings) -> f64 {
    Scorer::default().need_weight(position, state, settings)
}

pub fn blended_score(
    player: &PlayerCandidate,
    state: &RosterState,
    settings: &LeagueSettings,
) -> f64 {
    Scorer::default().blended_score(player, state, settings)
}

pub fn final_rank_score(
    player: &PlayerCandidate,
    state: &RosterState,
    settings: &LeagueSettings,
) -> f64 {
    Scorer::default().final_rank_score(player, state, settings)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
