// Recommendations widget: the model's draft advice.
//
// While a call streams, the raw output is shown and auto-scrolls. Once
// parsed, the advice is laid out as best pick, top targets, sleepers,
// avoids and notes. Errors are shown above the previous advice.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use fsi_llm::{AdviceReport, LlmStatus};

use crate::tui::ViewState;

/// Render the recommendations panel into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let lines = build_lines(state);

    let inner_height = area.height.saturating_sub(2) as usize;
    let line_count = lines.len();
    let scroll = if state.llm_status == LlmStatus::Streaming && line_count > inner_height {
        (line_count - inner_height) as u16
    } else {
        let offset = state.scroll_offset.get("recommendations").copied().unwrap_or(0);
        offset.min(line_count.saturating_sub(1)) as u16
    };

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(build_title(state.llm_status))
                .border_style(border_style(state.llm_status)),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn build_lines(state: &ViewState) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if let Some(error) = &state.llm_error {
        lines.push(Line::from(Span::styled(
            format!(" {error}"),
            Style::default().fg(Color::Red),
        )));
        lines.push(Line::from(""));
    }

    if state.llm_status == LlmStatus::Streaming {
        if state.stream_text.is_empty() {
            lines.push(Line::from(Span::styled(
                " Asking the model...",
                Style::default().fg(Color::DarkGray),
            )));
        } else {
            lines.extend(state.stream_text.lines().map(|l| Line::from(l.to_string())));
        }
        return lines;
    }

    match &state.report {
        Some(report) => lines.extend(report_lines(report)),
        None if state.llm_error.is_none() => {
            lines.push(Line::from(Span::styled(
                placeholder_text(state.snapshot.llm_enabled),
                Style::default().fg(Color::DarkGray),
            )));
        }
        None => {}
    }
    lines
}

/// Lay out parsed advice.
pub fn report_lines(report: &AdviceReport) -> Vec<Line<'static>> {
    let advice = &report.advice;
    let heading = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(Color::DarkGray);
    let mut lines = Vec::new();

    if advice.is_empty() {
        lines.push(Line::from(Span::styled(" No advice returned.", dim)));
        return lines;
    }

    if let Some(best) = advice.best_pick() {
        lines.push(Line::from(vec![
            Span::styled(" Best pick: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{} ({}, {})", best.player, best.pos, best.team),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        ]));
        if !best.why_best_pick.is_empty() {
            lines.push(Line::from(format!("   {}", best.why_best_pick)));
        }
        lines.push(Line::from(""));
    }

    if !advice.top_targets.is_empty() {
        lines.push(Line::from(Span::styled(" Top targets", heading)));
        for (i, target) in advice.top_targets.iter().enumerate() {
            let marker = if target.best_pick { "*" } else { " " };
            lines.push(Line::from(vec![
                Span::styled(format!(" {marker}{}. ", i + 1), Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("{} ({}, {})", target.player, target.pos, target.team),
                    Style::default().fg(Color::White),
                ),
            ]));
            if !target.why_for_team.is_empty() {
                lines.push(Line::from(Span::styled(format!("     {}", target.why_for_team), dim)));
            }
        }
        lines.push(Line::from(""));
    }

    if !advice.sleepers.is_empty() {
        lines.push(Line::from(Span::styled(" Sleepers", heading)));
        for sleeper in &advice.sleepers {
            lines.push(Line::from(format!(
                "   {} ({}, {}): {}",
                sleeper.player, sleeper.pos, sleeper.team, sleeper.why_sleeper
            )));
        }
        lines.push(Line::from(""));
    }

    if !advice.avoids.is_empty() {
        lines.push(Line::from(Span::styled(" Avoid", heading)));
        for avoid in &advice.avoids {
            lines.push(Line::from(Span::styled(
                format!("   {} ({}, {}): {}", avoid.player, avoid.pos, avoid.team, avoid.reason),
                Style::default().fg(Color::Red),
            )));
        }
        lines.push(Line::from(""));
    }

    if !advice.notes.trim().is_empty() {
        lines.push(Line::from(Span::styled(" Notes", heading)));
        lines.extend(advice.notes.lines().map(|l| Line::from(format!("   {l}"))));
        lines.push(Line::from(""));
    }

    for warning in &report.warnings {
        lines.push(Line::from(Span::styled(format!(" ! {warning}"), dim)));
    }
    lines.push(Line::from(Span::styled(footer(report), dim)));
    lines
}

/// E.g. " claude-x | 900 in / 120 out | 14:02:11 UTC"
pub fn footer(report: &AdviceReport) -> String {
    format!(
        " {} | {} in / {} out | {}",
        report.model,
        report.input_tokens,
        report.output_tokens,
        report.generated_at.format("%H:%M:%S UTC")
    )
}

fn build_title(status: LlmStatus) -> Line<'static> {
    let (status_text, status_color) = status_indicator(status);
    Line::from(vec![
        Span::styled("Recommendations", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(" -- ", Style::default().fg(Color::DarkGray)),
        Span::styled(status_text, Style::default().fg(status_color)),
    ])
}

pub fn status_indicator(status: LlmStatus) -> (&'static str, Color) {
    match status {
        LlmStatus::Idle => ("idle", Color::DarkGray),
        LlmStatus::Streaming => ("streaming...", Color::Yellow),
        LlmStatus::Complete => ("complete", Color::Green),
        LlmStatus::Error => ("error", Color::Red),
    }
}

fn border_style(status: LlmStatus) -> Style {
    match status {
        LlmStatus::Streaming => Style::default().fg(Color::Yellow),
        LlmStatus::Error => Style::default().fg(Color::Red),
        _ => Style::default(),
    }
}

fn placeholder_text(llm_enabled: bool) -> &'static str {
    if llm_enabled {
        " Press g for draft recommendations."
    } else {
        " No API key configured. The ranked board is on tab 2."
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
