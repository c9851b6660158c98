// Help bar widget: key hints, or the latest notice from the app.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

const KEY_HINTS: &str =
    " q:Quit  1-3:Tabs  d:Drafted  a:My pick  u:Undo  +/-:Pick  s:Scoring  f:QB  g:Advice  R:Reload  /:Search  p:Pos";

/// Render the help bar into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let line = match help_text(state) {
        HelpText::Notice(text) => Line::from(Span::styled(
            format!(" {text}"),
            Style::default().fg(Color::Yellow),
        )),
        HelpText::Hints(text) => Line::from(Span::styled(
            text,
            Style::default().fg(Color::White).add_modifier(Modifier::DIM),
        )),
    };
    let paragraph = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

#[derive(Debug, PartialEq)]
pub enum HelpText<'a> {
    Notice(&'a str),
    Hints(&'static str),
}

/// Mode-specific hints take priority, then the notice, then the key list.
pub fn help_text(state: &ViewState) -> HelpText<'_> {
    if state.text_input.is_some() {
        return HelpText::Hints(" Enter:Submit  Esc:Cancel");
    }
    if state.filter_mode {
        return HelpText::Hints(" Type to search  Enter:Keep  Esc:Clear");
    }
    match state.notice.as_deref() {
        Some(notice) => HelpText::Notice(notice),
        None => HelpText::Hints(KEY_HINTS),
    }
}
