//! History tab: paginated list of past uploads with select and delete.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::state::AppState;
use crate::model::{format_upload_time, short_namespace, UploadRecord};

pub fn draw_history(area: Rect, f: &mut ratatui::Frame, state: &AppState) {
    let block = Block::default().borders(Borders::ALL).title("Upload History");

    if state.history.uploads.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::styled("No uploads found", Style::default().fg(Color::Gray)),
            Line::from(""),
            Line::from(vec![
                Span::styled("r", Style::default().fg(Color::Magenta)),
                Span::raw(": refresh"),
            ]),
        ])
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(vec![
        Span::styled("j/k", Style::default().fg(Color::Magenta)),
        Span::raw(": move, "),
        Span::styled("Enter", Style::default().fg(Color::Magenta)),
        Span::raw(": select, "),
        Span::styled("d", Style::default().fg(Color::Magenta)),
        Span::raw(": delete, "),
        Span::styled("r", Style::default().fg(Color::Magenta)),
        Span::raw(": refresh"),
    ]));
    lines.push(Line::from(""));

    let window = state.history.visible_range();
    let active_ns = state
        .shell
        .selection
        .as_ref()
        .map(|selection| selection.namespace.as_str());
    for (row, record) in state.history.visible().iter().enumerate() {
        let number = window.start + row + 1;
        let is_cursor = row == state.history.cursor;
        let row_style = if is_cursor {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        let dim = |fallback: Style| if is_cursor { row_style } else { fallback };
        let marker = if Some(record.namespace.as_str()) == active_ns {
            "*"
        } else {
            " "
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{number:>3}. "),
                dim(Style::default().fg(Color::Gray)),
            ),
            Span::styled(marker, Style::default().fg(Color::Green)),
            Span::raw(" "),
            Span::styled(format!("{:<28}", record.filename), row_style),
            Span::raw("  "),
            Span::styled(
                short_namespace(&record.namespace),
                dim(Style::default().fg(Color::Cyan)),
            ),
            Span::raw("  "),
            Span::styled(
                format_upload_time(&record.uploaded_at),
                dim(Style::default().fg(Color::Gray)),
            ),
        ]));
    }

    let total_pages = state.history.total_pages();
    if total_pages > 1 {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("h/l", Style::default().fg(Color::Magenta)),
            Span::raw(format!(
                ": page, Page {} of {}",
                state.history.page, total_pages
            )),
        ]));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Modal confirmation before a namespace is removed.
pub fn draw_confirm_dialog(area: Rect, f: &mut ratatui::Frame, record: &UploadRecord) {
    let overlay = super::centered_rect(60, 36, area);
    f.render_widget(Clear, overlay);
    let lines = vec![
        Line::from(""),
        Line::styled(
            format!("Delete \"{}\"?", record.filename),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::styled(
            format!(
                "Namespace {} and all its vectors will be removed.",
                short_namespace(&record.namespace)
            ),
            Style::default().fg(Color::Gray),
        ),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Red)),
            Span::raw(": delete, "),
            Span::styled("n", Style::default().fg(Color::Magenta)),
            Span::raw("/"),
            Span::styled("Esc", Style::default().fg(Color::Magenta)),
            Span::raw(": cancel"),
        ]),
    ];
    let dialog = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Confirm Deletion")
                .border_style(Style::default().fg(Color::Red)),
        );
    f.render_widget(dialog, overlay);
}
