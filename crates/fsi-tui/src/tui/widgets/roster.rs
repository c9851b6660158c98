// Roster widget: the user's picks grouped against starter needs.
//
// One line per pick ("RB: Bijan Robinson"), then a per-position summary
// of held counts.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::protocol::AppSnapshot;
use crate::tui::ViewState;

/// Render the roster sidebar into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let snapshot = &state.snapshot;
    if snapshot.roster.is_empty() {
        let paragraph = Paragraph::new("  No picks yet. Press a to add one.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("My Roster"));
        frame.render_widget(paragraph, area);
        return;
    }

    let paragraph = Paragraph::new(roster_lines(snapshot)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("My Roster ({})", snapshot.roster.len())),
    );
    frame.render_widget(paragraph, area);
}

pub fn roster_lines(snapshot: &AppSnapshot) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = snapshot
        .roster
        .iter()
        .map(|entry| {
            Line::from(vec![
                Span::styled(
                    format!(" {:<4}", entry.position),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::styled(entry.name.clone(), Style::default().fg(Color::White)),
            ])
        })
        .collect();

    if !snapshot.roster_counts.is_empty() {
        lines.push(Line::from(""));
        let summary = snapshot
            .roster_counts
            .iter()
            .map(|(pos, n)| format!("{pos} {n}"))
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(Line::from(Span::styled(
            format!(" {summary}"),
            Style::default().fg(Color::Gray),
        )));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use fsi_core::draft::RosterEntry;

    fn snapshot() -> AppSnapshot {
        AppSnapshot {
            roster: vec![
                RosterEntry {
                    position: "RB".to_string(),
                    name: "Bijan Robinson".to_string(),
                },
                RosterEntry {
                    position: "WR".to_string(),
                    name: "Puka Nacua".to_string(),
                },
            ],
            roster_counts: [("RB".to_string(), 1), ("WR".to_string(), 1)].into_iter().collect(),
            ..AppSnapshot::default()
        }
    }

    #[test]
    fn roster_lines_list_picks_then_counts() {
        let lines = roster_lines(&snapshot());
        assert_eq!(lines.len(), 4);
        let first: String = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(first, " RB  Bijan Robinson");
        let summary: String = lines[3].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(summary, " RB 1  WR 1");
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(40, 10);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        state.snapshot = snapshot();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
