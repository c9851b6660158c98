// Draft context: snake-draft timing and the user's roster text.

pub mod roster;
pub mod snake;

pub use roster::{build_roster_state, parse_roster_lines, ParsedRoster, RosterEntry};
pub use snake::{bench_slots_left, draft_position, DraftPosition};
