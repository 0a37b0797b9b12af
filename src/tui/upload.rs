//! Upload tab: pick a transcript file, preview it, upload it, and push
//! the uploaded text into the vector store.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::preview::Preview;
use super::state::AppState;
use crate::model::short_namespace;

pub fn draw_upload(area: Rect, f: &mut ratatui::Frame, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    draw_path_input(rows[0], f, state);
    draw_picked_card(rows[1], f, state);
    draw_action_line(rows[2], f, state);
    draw_selection_card(rows[3], f, state);
}

fn draw_path_input(area: Rect, f: &mut ratatui::Frame, state: &AppState) {
    let editing = state.upload.editing_path;
    let title = if editing {
        "Transcript path (Enter: select, Esc: cancel)"
    } else {
        "Transcript path (e: edit, or paste a path)"
    };
    let border = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let input = Paragraph::new(state.upload.path_input.styled_line(editing)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border),
    );
    f.render_widget(input, area);
}

fn draw_picked_card(area: Rect, f: &mut ratatui::Frame, state: &AppState) {
    let lines = match &state.upload.picked {
        Some(picked) => vec![
            Line::from(vec![
                Span::styled("File: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    picked.name.clone(),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Path: ", Style::default().fg(Color::Gray)),
                Span::raw(picked.path.display().to_string()),
            ]),
            Line::from(vec![
                Span::styled("v", Style::default().fg(Color::Magenta)),
                Span::raw(": preview raw content"),
            ]),
        ],
        None => vec![
            Line::styled("No file selected", Style::default().fg(Color::Gray)),
            Line::from("Accepted types: .txt, .docx"),
        ],
    };
    let card = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Selected File"),
    );
    f.render_widget(card, area);
}

fn draw_action_line(area: Rect, f: &mut ratatui::Frame, state: &AppState) {
    let ready = Style::default().fg(Color::Magenta);
    let blocked = Style::default().fg(Color::DarkGray);
    let label = |enabled: bool| {
        if enabled {
            Style::default()
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };
    let can_upload = state.can_upload();
    let can_ingest = state.can_ingest();
    let line = Line::from(vec![
        Span::styled("u", if can_upload { ready } else { blocked }),
        Span::styled(": upload", label(can_upload)),
        Span::raw("    "),
        Span::styled("p", if can_ingest { ready } else { blocked }),
        Span::styled(": process into vector DB", label(can_ingest)),
    ]);
    f.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn draw_selection_card(area: Rect, f: &mut ratatui::Frame, state: &AppState) {
    let lines = match &state.shell.selection {
        Some(selection) => {
            let text_line = if selection.transcript_text.is_empty() {
                Line::styled(
                    "Transcript text not loaded (picked from history); re-upload to process again",
                    Style::default().fg(Color::DarkGray),
                )
            } else {
                Line::from(format!(
                    "{} chars of transcript text loaded",
                    selection.transcript_text.chars().count()
                ))
            };
            vec![
                Line::from(vec![
                    Span::styled("Selected: ", Style::default().fg(Color::Gray)),
                    Span::styled(selection.filename.clone(), Style::default().fg(Color::Cyan)),
                ]),
                Line::from(vec![
                    Span::styled("Namespace: ", Style::default().fg(Color::Gray)),
                    Span::raw(short_namespace(&selection.namespace)),
                ]),
                text_line,
            ]
        }
        None => vec![
            Line::styled("Nothing uploaded yet", Style::default().fg(Color::Gray)),
            Line::from("Upload a file here, or pick a past upload from the History tab"),
        ],
    };
    let card = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Active Transcript"),
        );
    f.render_widget(card, area);
}

/// Full-screen modal over the tab content.
pub fn draw_preview_overlay(area: Rect, f: &mut ratatui::Frame, preview: &Preview) {
    let overlay = super::centered_rect(84, 80, area);
    f.render_widget(Clear, overlay);
    let title = format!("Preview: {} (j/k: scroll, Esc: close)", preview.filename);
    let body = Paragraph::new(preview.content.clone())
        .wrap(Wrap { trim: false })
        .scroll((preview.scroll, 0))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(body, overlay);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Selection;
    use crate::tui::state::PickedFile;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::path::PathBuf;

    fn render(state: &AppState) -> String {
        let backend = TestBackend::new(72, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| draw_upload(f.area(), f, state))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn empty_state_shows_placeholder() {
        let state = AppState::default();
        let text = render(&state);
        assert!(text.contains("No file selected"));
        assert!(text.contains("Nothing uploaded yet"));
    }

    #[test]
    fn picked_file_and_selection_are_shown() {
        let mut state = AppState::default();
        state.upload.picked = Some(PickedFile {
            path: PathBuf::from("/tmp/notes.txt"),
            name: "notes.txt".into(),
        });
        state.shell.selection = Some(Selection {
            namespace: "abc123def456".into(),
            filename: "notes.txt".into(),
            transcript_text: "hello world".into(),
        });
        let text = render(&state);
        assert!(text.contains("notes.txt"));
        assert!(text.contains("/tmp/notes.txt"));
        assert!(text.contains("abc123de..."));
        assert!(text.contains("11 chars of transcript text loaded"));
    }

    #[test]
    fn preview_overlay_shows_content() {
        let backend = TestBackend::new(72, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        let preview = Preview {
            filename: "notes.txt".into(),
            content: "line one\nline two".into(),
            scroll: 0,
        };
        terminal
            .draw(|f| draw_preview_overlay(f.area(), f, &preview))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Preview: notes.txt"));
        assert!(text.contains("line one"));
    }
}
