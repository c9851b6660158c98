// League widget: settings that drive scoring, and where rankings came from.
//
// Key-value display: League, Teams, Scoring, QB, Pick, Rankings.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::protocol::AppSnapshot;
use crate::tui::ViewState;

/// Render the league summary into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(build_league_lines(&state.snapshot))
        .block(Block::default().borders(Borders::ALL).title("League"))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn build_league_lines(snapshot: &AppSnapshot) -> Vec<Line<'static>> {
    let label = |text: &str| Span::styled(format!(" {text:<9}"), Style::default().fg(Color::Gray));
    let value = |text: String| Span::styled(text, Style::default().fg(Color::White));

    let league = if snapshot.league_name.is_empty() {
        snapshot.sport.to_string()
    } else {
        format!("{} ({})", snapshot.league_name, snapshot.sport)
    };

    vec![
        Line::from(vec![label("League:"), value(league)]),
        Line::from(vec![label("Teams:"), value(snapshot.teams.to_string())]),
        Line::from(vec![
            label("Scoring:"),
            Span::styled(
                snapshot.scoring.to_string(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  s", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(vec![
            label("QB:"),
            Span::styled(
                snapshot.qb_format.to_string(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  f", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(vec![
            label("Pick:"),
            value(format!(
                "{} (round {}, {} until next)",
                snapshot.pick_overall, snapshot.draft_round, snapshot.turns_until_next_pick
            )),
        ]),
        Line::from(vec![
            label("Rankings:"),
            value(format!("{} players", snapshot.rankings_total)),
        ]),
        Line::from(Span::styled(
            format!(" {}", snapshot.rankings_source),
            Style::default().fg(Color::DarkGray),
        )),
    ]
}
