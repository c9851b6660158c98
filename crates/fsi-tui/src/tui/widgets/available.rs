// Available players widget: the ranked board of undrafted players.
//
// Columns: rank, name, position, team, final score, need weight, value over
// ADP, ADP, projection, tier. Filtered by position_filter and filter_text
// from ViewState. The model's best pick, if any, is highlighted.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use fsi_core::ScoredCandidate;

use crate::tui::ViewState;

/// Render the available players table into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let filtered = filter_players(
        &state.snapshot.available,
        state.position_filter.as_deref(),
        &state.filter_text,
    );
    let title = build_title(state, filtered.len());

    if filtered.is_empty() {
        let paragraph = Paragraph::new("  No players match.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, area);
        return;
    }

    let best_pick = state
        .report
        .as_ref()
        .and_then(|r| r.advice.best_pick())
        .map(|t| t.player.to_lowercase());

    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from("Name"),
        Cell::from("Pos"),
        Cell::from("Team"),
        Cell::from("Score"),
        Cell::from("Need"),
        Cell::from("VoA"),
        Cell::from("ADP"),
        Cell::from("Proj"),
        Cell::from("Tier"),
    ])
    .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));

    // Visible rows: borders plus the header row
    let visible_rows = (area.height as usize).saturating_sub(3);
    let max_offset = filtered.len().saturating_sub(visible_rows);
    let scroll_offset = state
        .scroll_offset
        .get("available")
        .copied()
        .unwrap_or(0)
        .min(max_offset);

    let rows: Vec<Row> = filtered
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(visible_rows.max(1))
        .map(|(i, s)| {
            let p = &s.candidate;
            let is_best = best_pick
                .as_deref()
                .is_some_and(|name| name == p.name.to_lowercase());
            let style = if is_best {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(p.name.clone()),
                Cell::from(p.position.clone()),
                Cell::from(p.team.clone()),
                Cell::from(format!("{:.3}", s.score)),
                Cell::from(format!("{:.2}", s.need_weight)),
                Cell::from(format!("{:+.1}", s.value_over_adp)),
                Cell::from(format_opt(p.adp, 1)),
                Cell::from(format_opt(p.proj_pts, 1)),
                Cell::from(p.tier.map_or_else(|| "--".to_string(), |t| t.to_string())),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(18),
        Constraint::Length(6),
        Constraint::Length(5),
        Constraint::Length(7),
        Constraint::Length(5),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(4),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(table, area);
}

/// Filter players by position and name search.
///
/// A player matches a position filter when any `/`-separated part of its
/// position equals the filter.
pub fn filter_players<'a>(
    players: &'a [ScoredCandidate],
    position_filter: Option<&str>,
    filter_text: &str,
) -> Vec<&'a ScoredCandidate> {
    let text_lower = filter_text.to_lowercase();

    players
        .iter()
        .filter(|s| {
            if let Some(pos) = position_filter {
                let matches = s
                    .candidate
                    .position
                    .split('/')
                    .any(|part| part.trim().eq_ignore_ascii_case(pos));
                if !matches {
                    return false;
                }
            }
            text_lower.is_empty() || s.candidate.name.to_lowercase().contains(&text_lower)
        })
        .collect()
}

/// Format an optional number, `--` when absent.
pub fn format_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "--".to_string(),
    }
}

/// Title with filter info and the filtered count.
fn build_title(state: &ViewState, filtered_count: usize) -> Line<'static> {
    let mut title = String::from("Available Players");
    if let Some(pos) = &state.position_filter {
        title.push_str(&format!(" [{}]", pos));
    }
    if state.filter_mode || !state.filter_text.is_empty() {
        let cursor = if state.filter_mode { "_" } else { "" };
        title.push_str(&format!(" \"{}{}\"", state.filter_text, cursor));
    }
    title.push_str(&format!(" ({}/{})", filtered_count, state.snapshot.rankings_total));
    Line::from(title)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use fsi_core::PlayerCandidate;

    fn scored(name: &str, pos: &str) -> ScoredCandidate {
        let mut candidate = PlayerCandidate::new(name, pos, "TST");
        candidate.adp = Some(12.0);
        ScoredCandidate {
            candidate,
            score: 1.5,
            need_weight: 1.35,
            value_over_adp: 2.0,
        }
    }

    fn pool() -> Vec<ScoredCandidate> {
        vec![
            scored("Bijan Robinson", "RB"),
            scored("Mookie Betts", "SS/OF"),
            scored("Breece Hall", "RB"),
            scored("Puka Nacua", "WR"),
        ]
    }

    fn names(filtered: &[&ScoredCandidate]) -> Vec<String> {
        filtered.iter().map(|s| s.candidate.name.clone()).collect()
    }

    #[test]
    fn filter_no_filters() {
        let players = pool();
        assert_eq!(filter_players(&players, None, "").len(), 4);
    }

    #[test]
    fn filter_by_position() {
        let players = pool();
        let result = filter_players(&players, Some("RB"), "");
        assert_eq!(names(&result), vec!["Bijan Robinson", "Breece Hall"]);
    }

    #[test]
    fn filter_matches_any_part_of_multi_position() {
        let players = pool();
        let result = filter_players(&players, Some("OF"), "");
        assert_eq!(names(&result), vec!["Mookie Betts"]);
    }

    #[test]
    fn filter_by_text_is_case_insensitive() {
        let players = pool();
        let result = filter_players(&players, None, "ROB");
        assert_eq!(names(&result), vec!["Bijan Robinson"]);
    }

    #[test]
    fn filter_combines_position_and_text() {
        let players = pool();
        assert!(filter_players(&players, Some("WR"), "hall").is_empty());
    }

    #[test]
    fn format_opt_values() {
        assert_eq!(format_opt(Some(12.345), 1), "12.3");
        assert_eq!(format_opt(None, 1), "--");
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(100, 10);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.snapshot.available = (0..30).map(|i| scored(&format!("Player {i}"), "RB")).collect();
        state.scroll_offset.insert("available".to_string(), 99);
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }

    #[test]
    fn render_does_not_panic_when_empty() {
        let backend = ratatui::backend::TestBackend::new(60, 10);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.filter_mode = true;
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
