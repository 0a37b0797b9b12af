//! Bootstrap placeholders drawn while the two initial fetches settle.

use super::state::{Tab, PAGE_SIZE};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Placeholder shapes per tab: the upload form, the history rows, or a
/// generic content block.
pub fn draw_skeleton(f: &mut Frame, area: Rect, tab: Tab) {
    match tab {
        Tab::Upload => draw_upload_skeleton(f, area),
        Tab::History => draw_history_skeleton(f, area),
        _ => draw_generic_skeleton(f, area),
    }
}

fn shimmer(width: u16) -> Line<'static> {
    Line::styled(
        "░".repeat(width as usize),
        Style::default().fg(Color::DarkGray),
    )
}

fn shimmer_box(f: &mut Frame, area: Rect, title: &str) {
    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    let inner = block.inner(area);
    f.render_widget(block, area);
    let lines: Vec<Line> = (0..inner.height).map(|_| shimmer(inner.width)).collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_upload_skeleton(f: &mut Frame, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);
    shimmer_box(f, rows[0], "Loading");
    shimmer_box(f, rows[1], "");
    shimmer_box(f, rows[2], "");
}

fn draw_history_skeleton(f: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Upload History");
    let inner = block.inner(area);
    f.render_widget(block, area);
    let mut lines = Vec::new();
    for _ in 0..PAGE_SIZE {
        lines.push(shimmer(inner.width.saturating_sub(2)));
        lines.push(Line::from(""));
    }
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_generic_skeleton(f: &mut Frame, area: Rect) {
    shimmer_box(f, area, "Loading");
}
