// Status bar widget: league, format, pick position, tab indicator.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::{AppSnapshot, TabId};
use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [llm indicator] [pick summary] [tab bar]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = Vec::new();

    let (dot, dot_color) = llm_indicator(state.snapshot.llm_enabled);
    spans.push(Span::styled(format!(" {} ", dot), Style::default().fg(dot_color)));

    spans.push(Span::styled(
        pick_summary(&state.snapshot),
        Style::default().fg(Color::White),
    ));
    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
    spans.extend(tab_spans(state.active_tab));

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Green when a model is configured, gray when running on the algorithm
/// alone.
pub fn llm_indicator(enabled: bool) -> (&'static str, Color) {
    if enabled {
        ("●", Color::Green)
    } else {
        ("●", Color::DarkGray)
    }
}

/// E.g. "NFL PPR 1QB | Pick 24 (Rd 2) | next in 0"
pub fn pick_summary(snapshot: &AppSnapshot) -> String {
    format!(
        "{} {} {} | Pick {} (Rd {}) | next in {}",
        snapshot.sport,
        snapshot.scoring,
        snapshot.qb_format,
        snapshot.pick_overall,
        snapshot.draft_round,
        snapshot.turns_until_next_pick
    )
}

/// Tab indicator spans with the active tab highlighted.
pub fn tab_spans(active: TabId) -> Vec<Span<'static>> {
    let tabs = [TabId::Recommendations, TabId::Available, TabId::Drafted];

    let mut spans = Vec::new();
    for (i, tab_id) in tabs.into_iter().enumerate() {
        let style = if tab_id == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!("[{}:{}]", i + 1, tab_label(tab_id)), style));
        spans.push(Span::raw(" "));
    }
    spans
}

pub fn tab_label(tab: TabId) -> &'static str {
    match tab {
        TabId::Recommendations => "Advice",
        TabId::Available => "Players",
        TabId::Drafted => "Drafted",
    }
}
