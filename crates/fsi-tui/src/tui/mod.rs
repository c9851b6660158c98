// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors what the app orchestrator last
// reported. The orchestrator pushes `UiUpdate` messages over an mpsc
// channel; the TUI applies them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::collections::HashMap;
use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::warn;

use fsi_llm::{AdviceReport, LlmStatus};

use crate::protocol::{AppSnapshot, TabId, UiUpdate, UserCommand};

use layout::build_layout;

// ---------------------------------------------------------------------------
// Text input
// ---------------------------------------------------------------------------

/// What a text prompt feeds once submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Names of players taken by anyone.
    Drafted,
    /// One `POS: Name` line for the user's roster.
    RosterLine,
}

impl InputKind {
    pub fn title(&self) -> &'static str {
        match self {
            InputKind::Drafted => " Drafted players (comma separated) ",
            InputKind::RosterLine => " My pick (POS: Name) ",
        }
    }
}

/// An open text prompt and what has been typed so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    pub kind: InputKind,
    pub buffer: String,
}

impl TextInput {
    pub fn new(kind: InputKind) -> Self {
        TextInput {
            kind,
            buffer: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the application state for rendering.
///
/// Updated incrementally via `UiUpdate` messages from the app orchestrator.
/// The `render_frame` function reads this struct to draw the dashboard.
pub struct ViewState {
    /// Latest draft state from the orchestrator.
    pub snapshot: AppSnapshot,
    /// The last parsed recommendation, kept until a new one arrives.
    pub report: Option<AdviceReport>,
    /// Raw model output of the in-flight call.
    pub stream_text: String,
    pub llm_status: LlmStatus,
    pub llm_error: Option<String>,
    /// One-line message shown in the help bar.
    pub notice: Option<String>,
    /// Which tab is active in the main panel.
    pub active_tab: TabId,
    /// Per-widget scroll offsets (keyed by widget name).
    pub scroll_offset: HashMap<String, usize>,
    /// Current name search text.
    pub filter_text: String,
    /// Whether the search input is active.
    pub filter_mode: bool,
    /// Position filter for the available players table.
    pub position_filter: Option<String>,
    /// Whether the quit confirmation dialog is showing.
    pub confirm_quit: bool,
    pub text_input: Option<TextInput>,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            snapshot: AppSnapshot::default(),
            report: None,
            stream_text: String::new(),
            llm_status: LlmStatus::Idle,
            llm_error: None,
            notice: None,
            active_tab: TabId::Recommendations,
            scroll_offset: HashMap::new(),
            filter_text: String::new(),
            filter_mode: false,
            position_filter: None,
            confirm_quit: false,
            text_input: None,
        }
    }
}

impl ViewState {
    /// Positions present in the available list, in first-seen order.
    /// Multi-position entries like `SS/2B` contribute each part.
    pub fn available_positions(&self) -> Vec<String> {
        let mut positions: Vec<String> = Vec::new();
        for scored in &self.snapshot.available {
            for pos in scored.candidate.position.split('/') {
                let pos = pos.trim().to_uppercase();
                if !pos.is_empty() && !positions.contains(&pos) {
                    positions.push(pos);
                }
            }
        }
        positions
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::StateSnapshot(snapshot) => {
            state.snapshot = *snapshot;
        }
        UiUpdate::RecommendationStarted => {
            state.stream_text.clear();
            state.llm_error = None;
            state.llm_status = LlmStatus::Streaming;
            state.active_tab = TabId::Recommendations;
            state.scroll_offset.remove("recommendations");
        }
        UiUpdate::RecommendationToken(token) => {
            state.stream_text.push_str(&token);
        }
        UiUpdate::RecommendationReady(report) => {
            state.report = Some(*report);
            state.stream_text.clear();
            state.llm_status = LlmStatus::Complete;
        }
        UiUpdate::RecommendationError(message) => {
            state.llm_error = Some(message);
            state.llm_status = LlmStatus::Error;
        }
        UiUpdate::Notice(message) => {
            state.notice = Some(message);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    match state.active_tab {
        TabId::Recommendations => widgets::recommendations::render(frame, layout.main_panel, state),
        TabId::Available => widgets::available::render(frame, layout.main_panel, state),
        TabId::Drafted => widgets::drafted::render(frame, layout.main_panel, state),
    }
    widgets::roster::render(frame, layout.roster, state);
    widgets::league::render(frame, layout.league, state);
    widgets::help_bar::render(frame, layout.help_bar, state);

    if let Some(input) = &state.text_input {
        widgets::prompt::render(frame, frame.area(), input);
    }
    if state.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area(), state.snapshot.drafted.len());
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // Channel closed: app is shutting down
                    None => break Ok(()),
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            if cmd_tx.send(cmd).await.is_err() || quit {
                                break Ok(());
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("terminal input error: {}", e);
                        break Ok(());
                    }
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(anyhow::Error::from(e));
                }
            }
        }
    };

    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
