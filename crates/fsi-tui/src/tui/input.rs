// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app orchestrator, or into local ViewState mutations (tab switching,
// scrolling, filtering, text prompts).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{InputKind, TextInput, ViewState};
use crate::protocol::{TabId, UserCommand};

/// Rows moved by PageUp/PageDown.
const PAGE_SIZE: usize = 20;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator. Returns `None` when the key press was handled locally
/// by mutating `ViewState`.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode
    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c') {
        return Some(UserCommand::Quit);
    }

    // Quit confirmation mode: only y/q confirm, n/Esc cancel, everything else blocked
    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    if view_state.text_input.is_some() {
        return handle_text_input(key_event, view_state);
    }

    if view_state.filter_mode {
        return handle_filter_mode(key_event, view_state);
    }

    match key_event.code {
        KeyCode::Char('1') => {
            view_state.active_tab = TabId::Recommendations;
            None
        }
        KeyCode::Char('2') => {
            view_state.active_tab = TabId::Available;
            None
        }
        KeyCode::Char('3') => {
            view_state.active_tab = TabId::Drafted;
            None
        }

        KeyCode::Up | KeyCode::Char('k') => {
            scroll_up(view_state, 1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            scroll_down(view_state, 1);
            None
        }
        KeyCode::PageUp => {
            scroll_up(view_state, PAGE_SIZE);
            None
        }
        KeyCode::PageDown => {
            scroll_down(view_state, PAGE_SIZE);
            None
        }

        // Search only applies to the players table
        KeyCode::Char('/') => {
            if view_state.active_tab == TabId::Available {
                view_state.filter_mode = true;
            }
            None
        }
        KeyCode::Char('p') => {
            cycle_position_filter(view_state);
            None
        }
        KeyCode::Esc => {
            view_state.filter_text.clear();
            view_state.position_filter = None;
            view_state.notice = None;
            None
        }

        KeyCode::Char('d') => {
            view_state.text_input = Some(TextInput::new(InputKind::Drafted));
            None
        }
        KeyCode::Char('a') => {
            view_state.text_input = Some(TextInput::new(InputKind::RosterLine));
            None
        }
        KeyCode::Char('u') => Some(UserCommand::UndoDrafted),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(UserCommand::AdjustPick(1)),
        KeyCode::Char('-') => Some(UserCommand::AdjustPick(-1)),
        KeyCode::Char('f') => Some(UserCommand::ToggleQbFormat),
        KeyCode::Char('s') => Some(UserCommand::CycleScoring),
        KeyCode::Char('g') => Some(UserCommand::RequestRecommendations),
        KeyCode::Char('R') => Some(UserCommand::RefreshRankings),

        // Quit: enter confirmation mode instead of quitting immediately
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

/// Handle key events while in quit confirmation mode.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

/// Handle key events while a text prompt is open.
///
/// Enter submits the buffer (blank buffers are dropped), Esc cancels.
fn handle_text_input(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let input = view_state.text_input.as_mut()?;
    match key_event.code {
        KeyCode::Esc => {
            view_state.text_input = None;
            None
        }
        KeyCode::Enter => {
            let input = view_state.text_input.take()?;
            let text = input.buffer.trim().to_string();
            if text.is_empty() {
                return None;
            }
            Some(match input.kind {
                InputKind::Drafted => UserCommand::AddDrafted(text),
                InputKind::RosterLine => UserCommand::AddRosterLine(text),
            })
        }
        KeyCode::Backspace => {
            input.buffer.pop();
            None
        }
        KeyCode::Char(c) => {
            input.buffer.push(c);
            None
        }
        _ => None,
    }
}

/// Handle key events while in filter mode.
///
/// Esc clears and exits, Enter keeps the text and exits.
fn handle_filter_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.filter_mode = false;
            view_state.filter_text.clear();
        }
        KeyCode::Enter => {
            view_state.filter_mode = false;
        }
        KeyCode::Backspace => {
            view_state.filter_text.pop();
        }
        KeyCode::Char(c) => {
            view_state.filter_text.push(c);
        }
        _ => {}
    }
    // Filtering changes which rows exist; start from the top.
    view_state.scroll_offset.remove("available");
    None
}

/// Cycle the position filter through the positions currently available,
/// then back to no filter.
fn cycle_position_filter(view_state: &mut ViewState) {
    let positions = view_state.available_positions();
    view_state.position_filter = match &view_state.position_filter {
        None => positions.first().cloned(),
        Some(current) => {
            let idx = positions.iter().position(|p| p == current);
            match idx {
                Some(i) if i + 1 < positions.len() => Some(positions[i + 1].clone()),
                _ => None,
            }
        }
    };
    view_state.scroll_offset.remove("available");
}

/// Scroll-state key for the active tab.
fn active_widget_key(view_state: &ViewState) -> &'static str {
    match view_state.active_tab {
        TabId::Recommendations => "recommendations",
        TabId::Available => "available",
        TabId::Drafted => "drafted",
    }
}

fn scroll_up(view_state: &mut ViewState, lines: usize) {
    let key = active_widget_key(view_state);
    let offset = view_state.scroll_offset.entry(key.to_string()).or_insert(0);
    *offset = offset.saturating_sub(lines);
}

fn scroll_down(view_state: &mut ViewState, lines: usize) {
    let key = active_widget_key(view_state);
    let offset = view_state.scroll_offset.entry(key.to_string()).or_insert(0);
    *offset = offset.saturating_add(lines);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use fsi_core::{PlayerCandidate, ScoredCandidate};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl_key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn type_text(state: &mut ViewState, text: &str) {
        for c in text.chars() {
            assert!(handle_key(key(KeyCode::Char(c)), state).is_none());
        }
    }

    fn scored(name: &str, pos: &str) -> ScoredCandidate {
        ScoredCandidate {
            candidate: PlayerCandidate::new(name, pos, "TST"),
            score: 1.0,
            need_weight: 1.0,
            value_over_adp: 0.0,
        }
    }

    // -- Tabs and scrolling --

    #[test]
    fn number_keys_switch_tabs() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Char('2')), &mut state);
        assert_eq!(state.active_tab, TabId::Available);
        handle_key(key(KeyCode::Char('3')), &mut state);
        assert_eq!(state.active_tab, TabId::Drafted);
        handle_key(key(KeyCode::Char('1')), &mut state);
        assert_eq!(state.active_tab, TabId::Recommendations);
    }

    #[test]
    fn scroll_applies_to_active_tab_widget() {
        let mut state = ViewState::default();
        state.active_tab = TabId::Available;
        handle_key(key(KeyCode::Down), &mut state);
        handle_key(key(KeyCode::Char('j')), &mut state);
        assert_eq!(state.scroll_offset.get("available"), Some(&2));
        assert_eq!(state.scroll_offset.get("recommendations"), None);

        handle_key(key(KeyCode::Char('k')), &mut state);
        assert_eq!(state.scroll_offset["available"], 1);
    }

    #[test]
    fn page_keys_scroll_by_page_and_do_not_underflow() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::PageDown), &mut state);
        assert_eq!(state.scroll_offset["recommendations"], 20);
        handle_key(key(KeyCode::PageUp), &mut state);
        handle_key(key(KeyCode::PageUp), &mut state);
        assert_eq!(state.scroll_offset["recommendations"], 0);
    }

    // -- Commands --

    #[test]
    fn command_keys_map_to_commands() {
        let mut state = ViewState::default();
        let cases = [
            ('u', UserCommand::UndoDrafted),
            ('+', UserCommand::AdjustPick(1)),
            ('=', UserCommand::AdjustPick(1)),
            ('-', UserCommand::AdjustPick(-1)),
            ('f', UserCommand::ToggleQbFormat),
            ('s', UserCommand::CycleScoring),
            ('g', UserCommand::RequestRecommendations),
            ('R', UserCommand::RefreshRankings),
        ];
        for (c, expected) in cases {
            assert_eq!(handle_key(key(KeyCode::Char(c)), &mut state), Some(expected), "key {c}");
        }
    }

    #[test]
    fn release_events_are_ignored() {
        let mut state = ViewState::default();
        let mut event = key(KeyCode::Char('g'));
        event.kind = KeyEventKind::Release;
        assert!(handle_key(event, &mut state).is_none());
    }

    // -- Quit confirmation --

    #[test]
    fn q_asks_for_confirmation() {
        let mut state = ViewState::default();
        assert!(handle_key(key(KeyCode::Char('q')), &mut state).is_none());
        assert!(state.confirm_quit);

        // Everything else is blocked while confirming.
        assert!(handle_key(key(KeyCode::Char('g')), &mut state).is_none());

        assert!(handle_key(key(KeyCode::Char('n')), &mut state).is_none());
        assert!(!state.confirm_quit);

        handle_key(key(KeyCode::Char('q')), &mut state);
        assert_eq!(handle_key(key(KeyCode::Char('y')), &mut state), Some(UserCommand::Quit));
    }

    #[test]
    fn ctrl_c_quits_from_any_mode() {
        let mut state = ViewState::default();
        state.text_input = Some(TextInput::new(InputKind::Drafted));
        assert_eq!(handle_key(ctrl_key(KeyCode::Char('c')), &mut state), Some(UserCommand::Quit));
    }

    // -- Text prompts --

    #[test]
    fn drafted_prompt_submits_on_enter() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Char('d')), &mut state);
        assert_eq!(state.text_input.as_ref().map(|i| i.kind), Some(InputKind::Drafted));

        // Command keys are plain text inside the prompt.
        type_text(&mut state, "Josh Allen, Sam LaPortq");
        handle_key(key(KeyCode::Backspace), &mut state);
        type_text(&mut state, "a");

        let cmd = handle_key(key(KeyCode::Enter), &mut state);
        assert_eq!(cmd, Some(UserCommand::AddDrafted("Josh Allen, Sam LaPorta".to_string())));
        assert!(state.text_input.is_none());
    }

    #[test]
    fn roster_prompt_submits_roster_line() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Char('a')), &mut state);
        type_text(&mut state, "RB: Bijan Robinson");
        let cmd = handle_key(key(KeyCode::Enter), &mut state);
        assert_eq!(cmd, Some(UserCommand::AddRosterLine("RB: Bijan Robinson".to_string())));
    }

    #[test]
    fn blank_prompt_and_escape_send_nothing() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Char('d')), &mut state);
        type_text(&mut state, "   ");
        assert!(handle_key(key(KeyCode::Enter), &mut state).is_none());
        assert!(state.text_input.is_none());

        handle_key(key(KeyCode::Char('d')), &mut state);
        type_text(&mut state, "Josh");
        assert!(handle_key(key(KeyCode::Esc), &mut state).is_none());
        assert!(state.text_input.is_none());
    }

    // -- Filtering --

    #[test]
    fn slash_only_filters_on_available_tab() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Char('/')), &mut state);
        assert!(!state.filter_mode);

        state.active_tab = TabId::Available;
        handle_key(key(KeyCode::Char('/')), &mut state);
        assert!(state.filter_mode);
        type_text(&mut state, "rob");
        handle_key(key(KeyCode::Enter), &mut state);
        assert!(!state.filter_mode);
        assert_eq!(state.filter_text, "rob");

        handle_key(key(KeyCode::Esc), &mut state);
        assert!(state.filter_text.is_empty());
    }

    #[test]
    fn position_filter_cycles_through_available_positions() {
        let mut state = ViewState::default();
        state.snapshot.available = vec![scored("A", "RB"), scored("B", "WR"), scored("C", "RB")];

        handle_key(key(KeyCode::Char('p')), &mut state);
        assert_eq!(state.position_filter.as_deref(), Some("RB"));
        handle_key(key(KeyCode::Char('p')), &mut state);
        assert_eq!(state.position_filter.as_deref(), Some("WR"));
        handle_key(key(KeyCode::Char('p')), &mut state);
        assert!(state.position_filter.is_none());
    }

    #[test]
    fn position_filter_stays_off_with_empty_pool() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Char('p')), &mut state);
        assert!(state.position_filter.is_none());
    }
}
