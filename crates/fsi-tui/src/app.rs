// Application state and orchestration logic.
//
// The central event loop that coordinates user commands from the TUI and
// streamed recommendation events. Holds the rankings pool and the draft
// context, recomputes the ranked available list after every change, and
// pushes snapshots to the TUI render loop.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use fsi_core::config::Config;
use fsi_core::draft::{build_roster_state, parse_roster_lines, ParsedRoster};
use fsi_core::names::NameMatcher;
use fsi_core::rankings::{LoadedRankings, RankingsError, RankingsLoader, RankingsOrigin, RankingsRequest};
use fsi_core::{LeagueSettings, PlayerCandidate, RosterState, Scorer};
use fsi_llm::advisor::{finish_report, stream_draft_recommendations};
use fsi_llm::{
    AdviceReport, Completion, LlmClient, LlmEvent, LlmStatus, Preferences, PromptOptions,
    RecommendationRequest,
};

use crate::protocol::{AppSnapshot, UiUpdate, UserCommand};

/// The rankings request described by the config: the configured file and
/// URL override, if any, for the league's sport.
pub fn rankings_request(config: &Config) -> RankingsRequest {
    RankingsRequest {
        sport: config.league.sport,
        file: config.strategy.rankings.file.clone(),
        pasted_csv: None,
        url_override: config.strategy.rankings.url_override.clone(),
    }
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    /// League settings as currently toggled in the UI.
    pub settings: LeagueSettings,
    pub starters: BTreeMap<String, u32>,
    pub scorer: Scorer,
    pub matcher: NameMatcher,
    pub loader: RankingsLoader,
    pub rankings: Vec<PlayerCandidate>,
    pub rankings_origin: RankingsOrigin,
    /// Players taken by anyone, in entry order.
    pub drafted: Vec<String>,
    /// The user's own roster as `POS: Name` lines.
    pub roster_lines: Vec<String>,
    pub pick_overall: u32,
    pub current_llm_task: Option<tokio::task::JoinHandle<()>>,
    /// Identifies the current recommendation task. Incremented on every
    /// spawn; events from older generations are discarded.
    pub llm_generation: u64,
    pub llm_status: LlmStatus,
    pub llm_text: String,
    pub last_report: Option<AdviceReport>,
    pub llm_client: Arc<LlmClient>,
    /// Spawned tasks stream recommendation events back through a clone.
    pub llm_tx: mpsc::Sender<LlmEvent>,
}

impl AppState {
    pub fn new(
        config: Config,
        loaded: LoadedRankings,
        loader: RankingsLoader,
        llm_client: LlmClient,
        llm_tx: mpsc::Sender<LlmEvent>,
    ) -> anyhow::Result<Self> {
        let matcher = NameMatcher::new(f64::from(config.strategy.rankings.fuzzy_threshold))?;
        let settings = config.league.settings();
        let starters = config.league.starters();
        let scorer = Scorer::new(config.strategy.weights.clone());
        let pick_overall = config.league.first_pick.max(1);

        Ok(AppState {
            settings,
            starters,
            scorer,
            matcher,
            loader,
            rankings: loaded.players,
            rankings_origin: loaded.origin,
            drafted: Vec::new(),
            roster_lines: Vec::new(),
            pick_overall,
            current_llm_task: None,
            llm_generation: 0,
            llm_status: LlmStatus::Idle,
            llm_text: String::new(),
            last_report: None,
            llm_client: Arc::new(llm_client),
            llm_tx,
            config,
        })
    }

    pub fn roster(&self) -> ParsedRoster {
        parse_roster_lines(&self.roster_lines.join("\n"))
    }

    pub fn roster_state(&self) -> RosterState {
        build_roster_state(
            &self.roster(),
            &self.starters,
            self.config.league.bench_slots,
            self.settings.teams,
            self.pick_overall,
        )
    }

    /// Rankings minus everyone drafted, including the user's own roster.
    pub fn available(&self) -> Vec<PlayerCandidate> {
        let mut taken = self.drafted.clone();
        taken.extend(self.roster().names());
        self.matcher.minus_drafted(&self.rankings, &taken)
    }

    pub fn recommendation_request(&self) -> RecommendationRequest {
        RecommendationRequest {
            candidates: self.available(),
            state: self.roster_state(),
            settings: self.settings.clone(),
            preferences: Preferences {
                sport: Some(self.config.league.sport),
                position_priority: self.config.league.position_priority.clone(),
            },
        }
    }

    /// Snapshot of everything the TUI renders.
    pub fn build_snapshot(&self) -> AppSnapshot {
        let roster = self.roster();
        let state = build_roster_state(
            &roster,
            &self.starters,
            self.config.league.bench_slots,
            self.settings.teams,
            self.pick_overall,
        );
        let mut taken = self.drafted.clone();
        taken.extend(roster.names());
        let available = self.matcher.minus_drafted(&self.rankings, &taken);
        let ranked = self.scorer.rank_scored(
            &available,
            &state,
            &self.settings,
            self.config.strategy.rankings.display_limit,
        );

        AppSnapshot {
            league_name: self.config.league.name.clone(),
            sport: self.config.league.sport,
            teams: self.settings.teams,
            scoring: self.settings.scoring,
            qb_format: self.settings.qb_format,
            pick_overall: state.pick_overall,
            draft_round: state.draft_round,
            turns_until_next_pick: state.turns_until_next_pick,
            rankings_source: self.rankings_origin.to_string(),
            rankings_total: self.rankings.len(),
            available: ranked,
            drafted: self.drafted.clone(),
            roster: roster.entries,
            roster_counts: roster.counts,
            llm_enabled: self.llm_client.is_active(),
        }
    }

    /// Add every name in `text` not already drafted. Returns how many were
    /// added.
    pub fn add_drafted(&mut self, text: &str) -> usize {
        let mut added = 0;
        for name in self.matcher.parse_lines(text) {
            let exists = self.drafted.iter().any(|d| d.eq_ignore_ascii_case(&name));
            if !exists {
                debug!("drafted: {}", name);
                self.drafted.push(name);
                added += 1;
            }
        }
        added
    }

    /// Add one `POS: Name` roster line. Lines without a position are
    /// rejected.
    pub fn add_roster_line(&mut self, line: &str) -> bool {
        let parsed = parse_roster_lines(line);
        if parsed.entries.len() != 1 {
            return false;
        }
        self.roster_lines.push(line.trim().to_string());
        true
    }

    pub fn undo_drafted(&mut self) -> Option<String> {
        self.drafted.pop()
    }

    /// Move the next pick by `delta`, never below pick 1.
    pub fn adjust_pick(&mut self, delta: i32) {
        let next = i64::from(self.pick_overall) + i64::from(delta);
        self.pick_overall = u32::try_from(next.max(1)).unwrap_or(u32::MAX);
    }

    pub fn toggle_qb_format(&mut self) {
        self.settings.qb_format = self.settings.qb_format.toggle();
    }

    pub fn cycle_scoring(&mut self) {
        self.settings.scoring = self.settings.scoring.cycle();
    }

    /// Cancel the current recommendation task if one is running.
    pub fn cancel_llm_task(&mut self) {
        if let Some(handle) = self.current_llm_task.take() {
            handle.abort();
            info!("Cancelled previous recommendation task");
        }
    }

    /// Spawn a streaming recommendation task for the current state.
    ///
    /// Returns the task's generation, or `None` when there is nobody left
    /// to recommend.
    pub fn trigger_recommendations(&mut self) -> Option<u64> {
        self.cancel_llm_task();

        let request = self.recommendation_request();
        if request.candidates.is_empty() {
            info!("No available players, skipping recommendations");
            return None;
        }

        let client = Arc::clone(&self.llm_client);
        let settings = self.config.strategy.llm.clone();
        let options = PromptOptions {
            scorer: self.scorer.clone(),
            shortlist_size: self.config.strategy.rankings.shortlist_size,
        };
        let tx = self.llm_tx.clone();

        self.llm_generation += 1;
        let generation = self.llm_generation;
        self.llm_text.clear();
        self.llm_status = LlmStatus::Streaming;

        let handle = tokio::spawn(async move {
            stream_draft_recommendations(&request, &client, &settings, &options, tx, generation)
                .await;
        });
        self.current_llm_task = Some(handle);
        info!(
            "Triggered recommendations at pick {} (gen: {})",
            self.pick_overall, generation
        );
        Some(generation)
    }

    /// Drop the download cache and reload rankings from the configured
    /// sources. On failure the current rankings stay in place.
    pub async fn refresh_rankings(&mut self) -> Result<(), RankingsError> {
        self.loader.clear_cache();
        let loaded = self.loader.load(&rankings_request(&self.config)).await?;
        self.rankings = loaded.players;
        self.rankings_origin = loaded.origin;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Listens on two channels using `tokio::select!`:
/// 1. Recommendation streaming events
/// 2. User commands from the TUI
///
/// Pushes UI updates through `ui_tx` for the TUI render loop.
pub async fn run(
    mut llm_rx: mpsc::Receiver<LlmEvent>,
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");
    send_snapshot(&state, &ui_tx).await;

    // Track whether the LLM channel is still open. When it closes we stop
    // polling it so tokio::select! never spins on it.
    let mut llm_open = true;

    loop {
        tokio::select! {
            llm_event = llm_rx.recv(), if llm_open => {
                match llm_event {
                    Some(event) => {
                        handle_llm_event(&mut state, event, &ui_tx).await;
                    }
                    None => {
                        info!("LLM channel closed");
                        llm_open = false;
                    }
                }
            }

            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }
        }
    }

    state.cancel_llm_task();
    info!("Application event loop exiting");
    Ok(())
}

async fn send_snapshot(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let snapshot = state.build_snapshot();
    let _ = ui_tx.send(UiUpdate::StateSnapshot(Box::new(snapshot))).await;
}

async fn notice(ui_tx: &mpsc::Sender<UiUpdate>, message: impl Into<String>) {
    let _ = ui_tx.send(UiUpdate::Notice(message.into())).await;
}

/// Process one recommendation event.
///
/// Events from a superseded generation, or arriving after the current call
/// already finished, are discarded.
async fn handle_llm_event(state: &mut AppState, event: LlmEvent, ui_tx: &mpsc::Sender<UiUpdate>) {
    let event_generation = event.generation();
    if event_generation != state.llm_generation || state.llm_status != LlmStatus::Streaming {
        debug!(
            "Discarding stale LLM event (event gen: {}, current gen: {})",
            event_generation, state.llm_generation
        );
        return;
    }

    match event {
        LlmEvent::Token { text, .. } => {
            state.llm_text.push_str(&text);
            let _ = ui_tx.send(UiUpdate::RecommendationToken(text)).await;
        }
        LlmEvent::Complete {
            full_text,
            input_tokens,
            output_tokens,
            ..
        } => {
            state.current_llm_task = None;
            let completion = Completion {
                text: full_text,
                input_tokens,
                output_tokens,
            };
            match finish_report(completion, &state.config.strategy.llm) {
                Ok(report) => {
                    state.llm_status = LlmStatus::Complete;
                    state.last_report = Some(report.clone());
                    let _ = ui_tx.send(UiUpdate::RecommendationReady(Box::new(report))).await;
                }
                Err(e) => {
                    state.llm_status = LlmStatus::Error;
                    let _ = ui_tx.send(UiUpdate::RecommendationError(e.to_string())).await;
                }
            }
        }
        LlmEvent::Error { error, .. } => {
            warn!("Recommendation error: {}", error);
            state.current_llm_task = None;
            state.llm_status = LlmStatus::Error;
            let message = if error.is_retryable() {
                format!("{error} (press g to retry)")
            } else {
                error.to_string()
            };
            let _ = ui_tx.send(UiUpdate::RecommendationError(message)).await;
        }
    }
}

/// Handle a user command from the TUI.
async fn handle_user_command(state: &mut AppState, cmd: UserCommand, ui_tx: &mpsc::Sender<UiUpdate>) {
    match cmd {
        UserCommand::AddDrafted(text) => {
            let added = state.add_drafted(&text);
            info!("Added {} drafted player(s)", added);
            send_snapshot(state, ui_tx).await;
            notice(ui_tx, format!("Added {added} drafted player(s)")).await;
        }
        UserCommand::AddRosterLine(line) => {
            if state.add_roster_line(&line) {
                info!("Roster line added: {}", line.trim());
                send_snapshot(state, ui_tx).await;
            } else {
                notice(ui_tx, "Roster lines look like  RB: Bijan Robinson").await;
            }
        }
        UserCommand::UndoDrafted => match state.undo_drafted() {
            Some(name) => {
                info!("Undid drafted player {}", name);
                send_snapshot(state, ui_tx).await;
                notice(ui_tx, format!("Removed {name}")).await;
            }
            None => notice(ui_tx, "Nothing to undo").await,
        },
        UserCommand::AdjustPick(delta) => {
            state.adjust_pick(delta);
            send_snapshot(state, ui_tx).await;
        }
        UserCommand::ToggleQbFormat => {
            state.toggle_qb_format();
            info!("QB format: {}", state.settings.qb_format);
            send_snapshot(state, ui_tx).await;
        }
        UserCommand::CycleScoring => {
            state.cycle_scoring();
            info!("Scoring: {}", state.settings.scoring);
            send_snapshot(state, ui_tx).await;
        }
        UserCommand::RequestRecommendations => {
            if state.trigger_recommendations().is_some() {
                let _ = ui_tx.send(UiUpdate::RecommendationStarted).await;
            } else {
                notice(ui_tx, "No available players to recommend").await;
            }
        }
        UserCommand::RefreshRankings => {
            notice(ui_tx, "Refreshing rankings...").await;
            match state.refresh_rankings().await {
                Ok(()) => {
                    send_snapshot(state, ui_tx).await;
                    notice(
                        ui_tx,
                        format!("Loaded {} players from {}", state.rankings.len(), state.rankings_origin),
                    )
                    .await;
                }
                Err(e) => {
                    warn!("Rankings refresh failed: {}", e);
                    notice(ui_tx, format!("Rankings refresh failed: {e}")).await;
                }
            }
        }
        UserCommand::Quit => {
            // Handled in the main loop
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
