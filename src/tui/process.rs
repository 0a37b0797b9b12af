//! Process tab: run a named prompt template against the active
//! transcript and show the model output.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::state::AppState;

pub fn draw_process(area: Rect, f: &mut ratatui::Frame, state: &AppState) {
    if state.shell.active_namespace().is_none() {
        let gate = Paragraph::new(vec![
            Line::from(""),
            Line::styled(
                "Please upload and process a transcript first",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Line::from(""),
            Line::styled(
                "Upload tab: pick a file, press u to upload, then p to process it",
                Style::default().fg(Color::Gray),
            ),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Process with Prompts"),
        );
        f.render_widget(gate, area);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(selector_height(state)),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    draw_prompt_selector(rows[0], f, state);
    draw_run_line(rows[1], f, state);
    draw_result_pane(rows[2], f, state);
}

fn selector_height(state: &AppState) -> u16 {
    (state.process.prompts.len().min(8) as u16 + 2).max(3)
}

/// Inner size of the result pane for a given tab area, zero while the
/// runner is gated. The PageDown clamp reads it between frames.
pub(super) fn result_inner(area: Rect, state: &AppState) -> (u16, u16) {
    if state.shell.active_namespace().is_none() {
        return (0, 0);
    }
    let pane_height = area.height.saturating_sub(selector_height(state) + 3);
    (
        area.width.saturating_sub(2),
        pane_height.saturating_sub(2),
    )
}

fn draw_prompt_selector(area: Rect, f: &mut ratatui::Frame, state: &AppState) {
    let mut lines: Vec<Line> = Vec::new();
    if state.process.prompts.is_empty() {
        let hint = if state.process.prompt_list.is_in_flight() {
            "Loading prompts..."
        } else {
            "No prompts available (r: refresh)"
        };
        lines.push(Line::styled(hint, Style::default().fg(Color::Gray)));
    }

    // Keep the chosen row inside the visible window.
    let visible_rows = area.height.saturating_sub(2) as usize;
    let skip = match state.process.chosen {
        Some(index) if visible_rows > 0 && index >= visible_rows => index + 1 - visible_rows,
        _ => 0,
    };
    for (index, name) in state.process.prompts.iter().enumerate().skip(skip) {
        let chosen = state.process.chosen == Some(index);
        let style = if chosen {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        let marker = if chosen { "> " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(marker, style),
            Span::styled(name.clone(), style),
        ]));
    }

    let title = if state.process.chosen.is_some() {
        "Prompt (j/k: change)"
    } else {
        "Prompt (j: choose)"
    };
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title)),
        area,
    );
}

fn draw_run_line(area: Rect, f: &mut ratatui::Frame, state: &AppState) {
    let line = if state.process.run.is_in_flight() {
        Line::styled("Processing...", Style::default().fg(Color::Yellow))
    } else if state.can_run_prompt() {
        Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Magenta)),
            Span::raw(": run "),
            Span::styled(
                state.chosen_prompt().unwrap_or_default().to_string(),
                Style::default().fg(Color::Cyan),
            ),
        ])
    } else if state.process.chosen.is_none() {
        Line::styled(
            "Choose a prompt to run",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Line::styled(
            "Waiting for another request to finish",
            Style::default().fg(Color::DarkGray),
        )
    };
    f.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn draw_result_pane(area: Rect, f: &mut ratatui::Frame, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Result (y: copy, PgUp/PgDn: scroll)");
    match &state.process.result {
        Some(result) => {
            let width = area.width.saturating_sub(2) as usize;
            let lines: Vec<Line> = wrap_rows(result, width).into_iter().map(Line::from).collect();
            let body = Paragraph::new(lines)
                .scroll((state.process.result_scroll, 0))
                .block(block);
            f.render_widget(body, area);
        }
        None => {
            let hint = if state.process.run.is_in_flight() {
                "Processing..."
            } else {
                "Run a prompt to see its output here"
            };
            let body = Paragraph::new(Line::styled(hint, Style::default().fg(Color::Gray)))
                .alignment(Alignment::Center)
                .block(block);
            f.render_widget(body, area);
        }
    }
}

/// Greedy word wrap at a pane width. The result pane renders these
/// rows directly and the scroll clamp counts them, so the two always
/// agree on the last reachable row.
pub(super) fn wrap_rows(text: &str, width: usize) -> Vec<&str> {
    let mut rows = Vec::new();
    for line in text.split('\n') {
        if width == 0 {
            rows.push(line);
            continue;
        }
        let mut rest = line;
        loop {
            if rest.chars().count() <= width {
                rows.push(rest);
                break;
            }
            let cut = rest
                .char_indices()
                .nth(width)
                .map(|(offset, _)| offset)
                .unwrap_or(rest.len());
            let break_at = match rest[..cut].rfind(' ') {
                Some(space) if space > 0 => space + 1,
                _ => cut,
            };
            rows.push(rest[..break_at].trim_end());
            rest = &rest[break_at..];
        }
    }
    rows
}
