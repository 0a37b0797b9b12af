use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw_help(area: Rect, f: &mut Frame) {
    let p = Paragraph::new(vec![
        Line::from("Keybinds:"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("q", Style::default().fg(Color::Magenta)),
            Span::raw(" / "),
            Span::styled("Ctrl-C", Style::default().fg(Color::Magenta)),
            Span::raw("  Quit"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("tab", Style::default().fg(Color::Magenta)),
            Span::raw("         Switch tabs"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("r", Style::default().fg(Color::Magenta)),
            Span::raw("           Refresh upload history"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("?", Style::default().fg(Color::Magenta)),
            Span::raw("           Show this help"),
        ]),
        Line::from(""),
        Line::from("Upload tab:"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("e", Style::default().fg(Color::Magenta)),
            Span::raw("           Edit the transcript path (or paste one)"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("v", Style::default().fg(Color::Magenta)),
            Span::raw("           Preview the picked file"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("u", Style::default().fg(Color::Magenta)),
            Span::raw("           Upload the picked file"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("p", Style::default().fg(Color::Magenta)),
            Span::raw("           Process the upload into the vector DB"),
        ]),
        Line::from(""),
        Line::from("Process tab:"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("↑/↓", Style::default().fg(Color::Magenta)),
            Span::raw(" or "),
            Span::styled("j/k", Style::default().fg(Color::Magenta)),
            Span::raw("  Choose a prompt"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("enter", Style::default().fg(Color::Magenta)),
            Span::raw("       Run the chosen prompt"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("y", Style::default().fg(Color::Magenta)),
            Span::raw("           Copy the result to the clipboard"),
        ]),
        Line::from(""),
        Line::from("History tab:"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("↑/↓", Style::default().fg(Color::Magenta)),
            Span::raw(" or "),
            Span::styled("j/k", Style::default().fg(Color::Magenta)),
            Span::raw("  Navigate"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("←/→", Style::default().fg(Color::Magenta)),
            Span::raw(" or "),
            Span::styled("h/l", Style::default().fg(Color::Magenta)),
            Span::raw("  Change page"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("enter", Style::default().fg(Color::Magenta)),
            Span::raw("       Select as the active transcript"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("d", Style::default().fg(Color::Magenta)),
            Span::raw("           Delete the namespace"),
        ]),
        Line::from(""),
        Line::from("Workflow:"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(
                "upload a transcript, process it into the vector DB, then run prompts",
                Style::default().fg(Color::Cyan),
            ),
        ]),
    ])
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}
