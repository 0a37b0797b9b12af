//! Render fault guard.
//!
//! A panic inside one tab's draw call poisons only that tab; the shell
//! swaps in a fallback panel with a retry key. Request failures never
//! come through here; they live in the per-action slots.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use std::panic::{self, AssertUnwindSafe};

/// Run a draw closure, catching any panic. The default panic hook is
/// suspended for the call; it would write to stderr underneath the
/// alternate screen.
pub fn catch_render<F: FnOnce()>(draw: F) -> Result<(), String> {
    let hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let result = panic::catch_unwind(AssertUnwindSafe(draw));
    panic::set_hook(hook);
    result.map_err(|payload| panic_message(payload.as_ref()))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Fallback panel for a poisoned tab.
pub fn draw_fault_panel(f: &mut Frame, area: Rect, detail: &str) {
    f.render_widget(Clear, area);
    let lines = vec![
        Line::from(""),
        Line::styled(
            "Something went wrong",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from(detail.to_string()),
        Line::from(""),
        Line::styled(
            "Press Enter to try again",
            Style::default().fg(Color::Gray),
        ),
    ];
    let panel = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Error"));
    f.render_widget(panel, area);
}
