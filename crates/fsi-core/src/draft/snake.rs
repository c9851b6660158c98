// Snake-draft timing derived from league size and the overall pick number.

use std::collections::BTreeMap;

/// Where a pick sits in a snake draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftPosition {
    /// 1-based round of the pick.
    pub round: u32,
    /// 0-based slot within the round, in the order picks are made.
    pub index_in_round: u32,
    /// Picks other teams make before the user picks again.
    pub turns_until_next_pick: u32,
}

/// Compute round and turns-until-next-pick for overall pick `pick_overall`
/// in a `teams`-team snake draft.
///
/// Picking at slot `i` of a round means the user's next pick is at slot
/// `n-1-i` of the following round, so `2*(n-1-i)` other picks happen in
/// between. A zero team count is treated as one team; pick 0 as pick 1.
pub fn draft_position(teams: u32, pick_overall: u32) -> DraftPosition {
    let n = teams.max(1);
    let p = pick_overall.max(1);
    let index_in_round = (p - 1) % n;
    DraftPosition {
        round: (p - 1) / n + 1,
        index_in_round,
        turns_until_next_pick: (n - 1 - index_in_round).saturating_mul(2),
    }
}

/// Bench slots still open: configured bench size minus players held beyond
/// each position's starter count. Positions with no starter entry count
/// entirely toward the bench.
pub fn bench_slots_left(
    bench_slots: u32,
    roster_counts: &BTreeMap<String, u32>,
    starters: &BTreeMap<String, u32>,
) -> u32 {
    let overflow: u32 = roster_counts
        .iter()
        .map(|(pos, &have)| have.saturating_sub(starters.get(pos).copied().unwrap_or(0)))
        .sum();
    bench_slots.saturating_sub(overflow)
}
