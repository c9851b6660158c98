// Drafted widget: players taken by anyone, most recent first.

use ratatui::layout::{Margin, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};
use ratatui::Frame;

use crate::tui::ViewState;

/// Render the drafted list into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let drafted = &state.snapshot.drafted;
    if drafted.is_empty() {
        let paragraph = Paragraph::new("  No players drafted yet. Press d to add some.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Drafted"));
        frame.render_widget(paragraph, area);
        return;
    }

    let scroll_offset = state.scroll_offset.get("drafted").copied().unwrap_or(0);

    // Visible row count: subtract 2 for borders
    let visible_rows = (area.height as usize).saturating_sub(2);
    let total = drafted.len();
    let max_offset = total.saturating_sub(visible_rows);
    let scroll_offset = scroll_offset.min(max_offset);

    let items: Vec<ListItem> = drafted
        .iter()
        .enumerate()
        .rev()
        .skip(scroll_offset)
        .take(visible_rows.max(1))
        .map(|(i, name)| {
            let color = if i + 1 == total { Color::Yellow } else { Color::White };
            ListItem::new(Line::from(Span::styled(
                format_entry(i, name),
                Style::default().fg(color),
            )))
        })
        .collect();

    let title = format!("Drafted ({}) -- u to undo last", total);
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);

    if total > visible_rows {
        let mut scrollbar_state =
            ScrollbarState::new(total.saturating_sub(visible_rows)).position(scroll_offset);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

/// E.g. " #3 Josh Allen" for the third entry.
pub fn format_entry(index: usize, name: &str) -> String {
    format!(" #{} {}", index + 1, name)
}
