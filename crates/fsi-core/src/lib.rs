// Library root: the candidate scoring engine and the draft context around it
// (rankings, name matching, snake-draft math, configuration).

pub mod config;
pub mod draft;
pub mod model;
pub mod names;
pub mod ranking;
pub mod rankings;
pub mod scoring;

pub use model::{LeagueSettings, PlayerCandidate, QbFormat, RosterState, ScoringFormat, Sport};
pub use ranking::{rank_candidates, ScoredCandidate};
pub use scoring::{blended_score, final_rank_score, need_weight, value_over_adp, Scorer, ScoringWeights};
