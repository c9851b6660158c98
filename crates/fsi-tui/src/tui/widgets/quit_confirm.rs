// Quit confirmation overlay. Draft state lives only in memory, so the dialog
// says how many recorded picks go away with the session.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::centered_rect;

const DIALOG_WIDTH: u16 = 36;
const DIALOG_HEIGHT: u16 = 6;

/// Warning line for the picks recorded so far, if any.
pub fn lost_picks_line(drafted: usize) -> Option<String> {
    match drafted {
        0 => None,
        1 => Some("  1 drafted name will be lost".to_string()),
        n => Some(format!("  {n} drafted names will be lost")),
    }
}

pub fn render(frame: &mut Frame, area: Rect, drafted: usize) {
    let dialog_area = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled(
            " End session ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));

    let mut lines = vec![Line::from(vec![
        Span::raw("  Leave the draft? ("),
        Span::styled("y", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw("/"),
        Span::styled("n", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::raw(")"),
    ])];
    if let Some(warning) = lost_picks_line(drafted) {
        lines.push(Line::from(Span::styled(warning, Style::default().fg(Color::DarkGray))));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog_area);
}
