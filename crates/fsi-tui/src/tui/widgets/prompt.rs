// Text prompt overlay for entering drafted players or a roster line.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::centered_rect;
use crate::tui::TextInput;

const DIALOG_WIDTH: u16 = 64;
const DIALOG_HEIGHT: u16 = 3;

/// Render the prompt centered on the screen.
pub fn render(frame: &mut Frame, area: Rect, input: &TextInput) {
    let dialog_area = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            input.kind.title(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));

    // Keep the end of long input visible.
    let inner_width = dialog_area.width.saturating_sub(3) as usize;
    let chars: Vec<char> = input.buffer.chars().collect();
    let visible: String = chars[chars.len().saturating_sub(inner_width)..].iter().collect();

    let text = Line::from(vec![
        Span::raw(visible),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]);
    let paragraph = Paragraph::new(text)
        .block(block)
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog_area);
}
