mod boundary;
mod clipboard;
mod help;
mod history;
mod input;
mod preview;
mod process;
mod skeleton;
pub mod state;
mod upload;

use crate::cli::Cli;
use crate::model::{
    short_namespace, ApiCommand, AppEvent, Effect, IngestRequest, PromptRunRequest,
};
use crate::orchestrator;
use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Terminal,
};
use state::{ActionState, AppState, Feedback, Notice, Slot, Tab, BOOTSTRAP_ERROR};
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub async fn run(args: Cli) -> Result<()> {
    // Unbounded channels avoid backpressure and task switching in the hot path.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<AppEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<ApiCommand>();

    let api = crate::api::ApiClient::new(&args.base_url)?;

    // TUI runs in a dedicated thread to keep all blocking I/O out of the Tokio runtime.
    let ui_handle = std::thread::spawn(move || run_threaded(event_rx, cmd_tx));

    let res = orchestrator::run_controller(api, event_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }

    res
}

/// Run the TUI loop on a dedicated thread.
pub fn run_threaded(
    mut event_rx: UnboundedReceiver<AppEvent>,
    cmd_tx: UnboundedSender<ApiCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    // AppState is owned by the UI thread only; no cross-thread mutation.
    let mut state = AppState::default();
    // Both bootstrap fetches go out before the first frame; skeletons
    // stay up until both have settled.
    dispatch_bootstrap(&mut state, &cmd_tx);

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    let res = loop {
        while let Ok(event) = event_rx.try_recv() {
            let effects = state.apply(event);
            run_effects(&mut state, &cmd_tx, effects);
        }

        if last_tick.elapsed() >= tick_rate {
            state.shell.advance_spinner();
            terminal.draw(|f| draw(f.area(), f, &mut state)).ok();
            last_tick = Instant::now();
        }

        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(k)) => {
                    if k.kind != KeyEventKind::Press {
                        continue;
                    }
                    match on_key(&mut state, &cmd_tx, k) {
                        KeyOutcome::Quit => {
                            let _ = cmd_tx.send(ApiCommand::Quit);
                            break Ok(());
                        }
                        KeyOutcome::Continue => {}
                    }
                }
                Ok(Event::Paste(pasted)) => on_paste(&mut state, &pasted),
                _ => {}
            }
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, DisableBracketedPaste, LeaveAlternateScreen).ok();
    res
}

#[derive(Debug, PartialEq, Eq)]
enum KeyOutcome {
    Continue,
    Quit,
}

fn dispatch_bootstrap(state: &mut AppState, cmd_tx: &UnboundedSender<ApiCommand>) {
    let seq = state.begin(Slot::Prompts);
    let _ = cmd_tx.send(ApiCommand::FetchPrompts { seq });
    dispatch_refresh(state, cmd_tx);
}

fn dispatch_refresh(state: &mut AppState, cmd_tx: &UnboundedSender<ApiCommand>) {
    let seq = state.begin(Slot::Uploads);
    let _ = cmd_tx.send(ApiCommand::FetchUploads { seq });
}

fn dispatch_upload(state: &mut AppState, cmd_tx: &UnboundedSender<ApiCommand>) {
    if !state.can_upload() {
        return;
    }
    let Some(path) = state.upload.picked.as_ref().map(|p| p.path.clone()) else {
        return;
    };
    let seq = state.begin(Slot::Upload);
    let _ = cmd_tx.send(ApiCommand::UploadFile { seq, path });
}

fn dispatch_ingest(state: &mut AppState, cmd_tx: &UnboundedSender<ApiCommand>) {
    if !state.can_ingest() {
        return;
    }
    let Some(selection) = state.shell.selection.clone() else {
        return;
    };
    let request = IngestRequest {
        transcript: selection.transcript_text,
        namespace: selection.namespace,
        filename: selection.filename,
    };
    let seq = state.begin(Slot::Ingest);
    let _ = cmd_tx.send(ApiCommand::Ingest { seq, request });
}

fn dispatch_prompt_run(state: &mut AppState, cmd_tx: &UnboundedSender<ApiCommand>) {
    if !state.can_run_prompt() {
        return;
    }
    let Some(prompt_name) = state.chosen_prompt().map(str::to_string) else {
        return;
    };
    let Some(selection) = state.shell.selection.clone() else {
        return;
    };
    let request = PromptRunRequest {
        transcript_text: selection.transcript_text,
        prompt_name,
        namespace: selection.namespace,
    };
    let seq = state.begin(Slot::PromptRun);
    let _ = cmd_tx.send(ApiCommand::RunPrompt { seq, request });
}

fn dispatch_delete(state: &mut AppState, cmd_tx: &UnboundedSender<ApiCommand>) {
    let Some(record) = state.history.pending_delete.take() else {
        return;
    };
    let seq = state.begin(Slot::Delete);
    let _ = cmd_tx.send(ApiCommand::DeleteNamespace {
        seq,
        namespace: record.namespace,
    });
}

fn run_effects(
    state: &mut AppState,
    cmd_tx: &UnboundedSender<ApiCommand>,
    effects: Vec<Effect>,
) {
    for effect in effects {
        match effect {
            Effect::RefreshUploads => dispatch_refresh(state, cmd_tx),
        }
    }
}

fn on_key(
    state: &mut AppState,
    cmd_tx: &UnboundedSender<ApiCommand>,
    key: KeyEvent,
) -> KeyOutcome {
    if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
        return KeyOutcome::Quit;
    }

    // Modal layers eat keys before anything global.
    if state.history.pending_delete.is_some() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => dispatch_delete(state, cmd_tx),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                state.history.pending_delete = None;
            }
            _ => {}
        }
        return KeyOutcome::Continue;
    }

    if let Some(preview) = state.upload.preview.as_mut() {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('v') => {
                state.upload.preview = None;
            }
            KeyCode::Down | KeyCode::Char('j') => preview.scroll_down(1),
            KeyCode::Up | KeyCode::Char('k') => preview.scroll_up(1),
            KeyCode::PageDown => preview.scroll_down(10),
            KeyCode::PageUp => preview.scroll_up(10),
            _ => {}
        }
        return KeyOutcome::Continue;
    }

    if state.upload.editing_path {
        match key.code {
            KeyCode::Enter => {
                state.upload.editing_path = false;
                let raw = state.upload.path_input.as_str().to_string();
                state.pick_path(&raw);
            }
            KeyCode::Esc => state.upload.editing_path = false,
            KeyCode::Backspace => state.upload.path_input.backspace(),
            KeyCode::Left => state.upload.path_input.move_left(),
            KeyCode::Right => state.upload.path_input.move_right(),
            KeyCode::Home => state.upload.path_input.move_home(),
            KeyCode::End => state.upload.path_input.move_end(),
            KeyCode::Char(c) => state.upload.path_input.insert(c),
            _ => {}
        }
        return KeyOutcome::Continue;
    }

    match key.code {
        KeyCode::Char('q') => return KeyOutcome::Quit,
        KeyCode::Tab => {
            state.shell.tab = state.shell.tab.next();
            return KeyOutcome::Continue;
        }
        KeyCode::BackTab => {
            state.shell.tab = state.shell.tab.prev();
            return KeyOutcome::Continue;
        }
        KeyCode::Char('?') => {
            state.shell.tab = Tab::Help;
            return KeyOutcome::Continue;
        }
        _ => {}
    }

    // A poisoned tab only answers to retry.
    if state.shell.fault(state.shell.tab).is_some() {
        if key.code == KeyCode::Enter {
            state.shell.clear_fault(state.shell.tab);
        }
        return KeyOutcome::Continue;
    }

    // Until the bootstrap settles, only navigation is live.
    if state.shell.booting {
        return KeyOutcome::Continue;
    }

    if key.code == KeyCode::Char('r') {
        dispatch_refresh(state, cmd_tx);
        return KeyOutcome::Continue;
    }

    match state.shell.tab {
        Tab::Upload => on_upload_key(state, cmd_tx, key),
        Tab::Process => on_process_key(state, cmd_tx, key),
        Tab::History => on_history_key(state, cmd_tx, key),
        Tab::Help => {}
    }
    KeyOutcome::Continue
}

fn on_upload_key(state: &mut AppState, cmd_tx: &UnboundedSender<ApiCommand>, key: KeyEvent) {
    match key.code {
        KeyCode::Char('e') => {
            if state.upload.path_input.is_empty() {
                if let Some(picked) = &state.upload.picked {
                    let path = picked.path.to_string_lossy().to_string();
                    state.upload.path_input.set(&path);
                }
            }
            state.upload.editing_path = true;
        }
        KeyCode::Enter => {
            if state.upload.picked.is_none() {
                state.upload.editing_path = true;
            }
        }
        KeyCode::Char('v') => {
            if let Some(picked) = &state.upload.picked {
                match preview::load_preview(picked) {
                    Ok(loaded) => state.upload.preview = Some(loaded),
                    Err(error) => state.shell.notice = Some(Notice::fail(error)),
                }
            }
        }
        KeyCode::Char('u') => dispatch_upload(state, cmd_tx),
        KeyCode::Char('p') => dispatch_ingest(state, cmd_tx),
        _ => {}
    }
}

fn on_process_key(state: &mut AppState, cmd_tx: &UnboundedSender<ApiCommand>, key: KeyEvent) {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => state.process.choose_next(),
        KeyCode::Up | KeyCode::Char('k') => state.process.choose_prev(),
        KeyCode::Enter => dispatch_prompt_run(state, cmd_tx),
        KeyCode::PageDown => {
            let max = result_scroll_max(state);
            state.process.result_scroll = state.process.result_scroll.saturating_add(5).min(max);
        }
        KeyCode::PageUp => {
            state.process.result_scroll = state.process.result_scroll.saturating_sub(5);
        }
        KeyCode::Char('y') => {
            if let Some(result) = state.process.result.clone() {
                state.shell.notice = Some(match clipboard::copy_to_clipboard(&result) {
                    Ok(()) => Notice::ok("Result copied to clipboard".into()),
                    Err(error) => Notice::fail(format!("Copy failed: {error:#}")),
                });
            }
        }
        _ => {}
    }
}

fn result_scroll_max(state: &AppState) -> u16 {
    let Some(result) = state.process.result.as_deref() else {
        return 0;
    };
    let (width, height) = state.process.result_view;
    if width == 0 || height == 0 {
        return 0;
    }
    let rows = process::wrap_rows(result, width as usize).len();
    u16::try_from(rows.saturating_sub(height as usize)).unwrap_or(u16::MAX)
}

fn on_history_key(state: &mut AppState, _cmd_tx: &UnboundedSender<ApiCommand>, key: KeyEvent) {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => state.history.cursor_down(),
        KeyCode::Up | KeyCode::Char('k') => state.history.cursor_up(),
        KeyCode::Right | KeyCode::Char('l') => state.history.next_page(),
        KeyCode::Left | KeyCode::Char('h') => state.history.prev_page(),
        KeyCode::Enter => {
            if let Some(record) = state.history.selected().cloned() {
                state.select_record(&record);
            }
        }
        KeyCode::Char('d') => {
            state.history.pending_delete = state.history.selected().cloned();
        }
        KeyCode::Char('y') => {
            if let Some(record) = state.history.selected() {
                let namespace = record.namespace.clone();
                state.shell.notice = Some(match clipboard::copy_to_clipboard(&namespace) {
                    Ok(()) => Notice::ok("Namespace copied to clipboard".into()),
                    Err(error) => Notice::fail(format!("Copy failed: {error:#}")),
                });
            }
        }
        _ => {}
    }
}

fn on_paste(state: &mut AppState, pasted: &str) {
    if state.shell.tab != Tab::Upload || state.shell.booting {
        return;
    }
    if state.upload.editing_path {
        state.upload.path_input.insert_str(pasted);
        return;
    }
    // Dropped paths often arrive quoted; a bare paste acts as a file pick.
    let cleaned = pasted.trim().trim_matches('"').trim_matches('\'').to_string();
    if cleaned.is_empty() {
        return;
    }
    state.upload.path_input.set(&cleaned);
    state.pick_path(&cleaned);
}

fn draw(area: Rect, f: &mut ratatui::Frame, state: &mut AppState) {
    let banner = feedback_lines(state);
    let banner_height = if banner.is_empty() {
        0
    } else {
        banner.len() as u16 + 2
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(banner_height),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let titles: Vec<Line> = [Tab::Upload, Tab::Process, Tab::History, Tab::Help]
        .iter()
        .map(|tab| Line::from(tab.title()))
        .collect();
    let tabs = Tabs::new(titles)
        .select(state.shell.tab.index())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("transcript-rag-cli"),
        )
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, chunks[0]);

    if banner_height > 0 {
        let notices = Paragraph::new(banner)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(notices, chunks[1]);
    }

    // This frame's pane size feeds the PageDown clamp; re-clamp the
    // offset in case the pane shrank since the last key.
    if state.shell.tab == Tab::Process {
        let view = process::result_inner(chunks[2], state);
        state.process.result_view = view;
        let max = result_scroll_max(state);
        state.process.result_scroll = state.process.result_scroll.min(max);
    }
    draw_active_tab(chunks[2], f, state);
    draw_status(chunks[3], f, state);

    // Overlays sit above the tab content.
    if let Some(preview) = &state.upload.preview {
        upload::draw_preview_overlay(area, f, preview);
    }
    if let Some(record) = &state.history.pending_delete {
        history::draw_confirm_dialog(area, f, record);
    }
}

fn draw_active_tab(area: Rect, f: &mut ratatui::Frame, state: &mut AppState) {
    let tab = state.shell.tab;
    if state.shell.booting && tab != Tab::Help {
        skeleton::draw_skeleton(f, area, tab);
        return;
    }
    if let Some(detail) = state.shell.fault(tab) {
        let detail = detail.to_string();
        boundary::draw_fault_panel(f, area, &detail);
        return;
    }
    let outcome = boundary::catch_render(|| match tab {
        Tab::Upload => upload::draw_upload(area, f, state),
        Tab::Process => process::draw_process(area, f, state),
        Tab::History => history::draw_history(area, f, state),
        Tab::Help => help::draw_help(area, f),
    });
    if let Err(message) = outcome {
        state.shell.poison(tab, message.clone());
        boundary::draw_fault_panel(f, area, &message);
    }
}

fn feedback_lines(state: &AppState) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if state.shell.bootstrap_failed {
        lines.push(Line::styled(
            BOOTSTRAP_ERROR.to_string(),
            Style::default().fg(Color::Red),
        ));
    }
    if let Some(notice) = &state.shell.notice {
        let color = if notice.failure {
            Color::Red
        } else {
            Color::Green
        };
        lines.push(Line::styled(
            notice.text.clone(),
            Style::default().fg(color),
        ));
    }
    let slots: Vec<&ActionState> = match state.shell.tab {
        Tab::Upload => vec![&state.upload.upload, &state.upload.ingest],
        Tab::Process => vec![&state.process.prompt_list, &state.process.run],
        Tab::History => vec![&state.history.refresh, &state.history.delete],
        Tab::Help => Vec::new(),
    };
    for slot in slots {
        match slot.feedback() {
            Some(Feedback::Success(message)) => lines.push(Line::styled(
                format!("✓ {message}"),
                Style::default().fg(Color::Green),
            )),
            Some(Feedback::Failure(error)) => lines.push(Line::styled(
                format!("✗ {error}"),
                Style::default().fg(Color::Red),
            )),
            None => {}
        }
    }
    lines
}

fn draw_status(area: Rect, f: &mut ratatui::Frame, state: &AppState) {
    let mut spans: Vec<Span> = Vec::new();
    match &state.shell.selection {
        Some(selection) => {
            spans.push(Span::styled(
                "Selected: ",
                Style::default().fg(Color::Gray),
            ));
            spans.push(Span::raw(selection.filename.clone()));
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                "Namespace: ",
                Style::default().fg(Color::Gray),
            ));
            spans.push(Span::styled(
                short_namespace(&selection.namespace),
                Style::default().fg(Color::Cyan),
            ));
        }
        None => spans.push(Span::styled(
            "No transcript selected",
            Style::default().fg(Color::Gray),
        )),
    }
    if state.any_request_in_flight() {
        spans.push(Span::raw("    "));
        spans.push(Span::styled(
            format!(
                "{} working",
                SPINNER[state.shell.spinner_frame % SPINNER.len()]
            ),
            Style::default().fg(Color::Yellow),
        ));
    }
    spans.push(Span::raw("    "));
    spans.push(Span::styled("?", Style::default().fg(Color::Magenta)));
    spans.push(Span::raw(": help, "));
    spans.push(Span::styled("q", Style::default().fg(Color::Magenta)));
    spans.push(Span::raw(": quit"));

    let status = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Selection, UploadRecord};
    use pretty_assertions::assert_eq;
    use ratatui::backend::TestBackend;
    use std::io::Write;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn channel() -> (
        UnboundedSender<ApiCommand>,
        UnboundedReceiver<ApiCommand>,
    ) {
        mpsc::unbounded_channel()
    }

    fn settled_state() -> AppState {
        let mut state = AppState::default();
        state.shell.booting = false;
        state
    }

    fn record(n: usize) -> UploadRecord {
        UploadRecord {
            namespace: format!("ns-{n}"),
            filename: format!("file-{n}.txt"),
            uploaded_at: String::new(),
        }
    }

    fn render_full(state: &mut AppState) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f.area(), f, state)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn delete_key_asks_for_confirmation_then_sends_once() {
        let (tx, mut rx) = channel();
        let mut state = settled_state();
        state.history.uploads = vec![record(1), record(2)];
        state.shell.tab = Tab::History;

        assert_eq!(on_key(&mut state, &tx, key(KeyCode::Char('d'))), KeyOutcome::Continue);
        assert_eq!(
            state.history.pending_delete.as_ref().map(|r| r.namespace.as_str()),
            Some("ns-1")
        );
        assert!(rx.try_recv().is_err());

        on_key(&mut state, &tx, key(KeyCode::Char('y')));
        match rx.try_recv() {
            Ok(ApiCommand::DeleteNamespace { namespace, .. }) => {
                assert_eq!(namespace, "ns-1");
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(state.history.pending_delete.is_none());
        assert!(state.history.delete.is_in_flight());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn cancelling_the_dialog_sends_nothing() {
        let (tx, mut rx) = channel();
        let mut state = settled_state();
        state.history.uploads = vec![record(1)];
        state.shell.tab = Tab::History;

        on_key(&mut state, &tx, key(KeyCode::Char('d')));
        on_key(&mut state, &tx, key(KeyCode::Esc));
        assert!(state.history.pending_delete.is_none());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn run_key_is_inert_without_a_chosen_prompt() {
        let (tx, mut rx) = channel();
        let mut state = settled_state();
        state.shell.tab = Tab::Process;
        state.shell.selection = Some(Selection {
            namespace: "ns".into(),
            filename: "a.txt".into(),
            transcript_text: "text".into(),
        });
        state.process.prompts = vec!["summarize".into()];

        on_key(&mut state, &tx, key(KeyCode::Enter));
        assert!(rx.try_recv().is_err());

        on_key(&mut state, &tx, key(KeyCode::Char('j')));
        on_key(&mut state, &tx, key(KeyCode::Enter));
        match rx.try_recv() {
            Ok(ApiCommand::RunPrompt { request, .. }) => {
                assert_eq!(request.prompt_name, "summarize");
                assert_eq!(request.namespace, "ns");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn page_down_reaches_the_bottom_of_a_wrapped_result() {
        let (tx, _rx) = channel();
        let mut state = settled_state();
        state.shell.tab = Tab::Process;
        state.shell.selection = Some(Selection {
            namespace: "ns".into(),
            filename: "a.txt".into(),
            transcript_text: "text".into(),
        });
        state.process.prompts = vec!["summarize".into()];
        state.process.result = Some("alpha beta gamma delta ".repeat(40));

        render_full(&mut state);
        let (width, height) = state.process.result_view;
        assert!(width > 0 && height > 0);

        let result = state.process.result.clone().unwrap_or_default();
        assert_eq!(result.lines().count(), 1, "one raw line, many wrapped rows");
        let rows = process::wrap_rows(&result, width as usize).len();
        assert!(rows > height as usize);

        for _ in 0..rows {
            on_key(&mut state, &tx, key(KeyCode::PageDown));
        }
        assert_eq!(
            state.process.result_scroll as usize,
            rows - height as usize,
            "scroll stops with the last row in view"
        );

        on_key(&mut state, &tx, key(KeyCode::PageUp));
        assert!((state.process.result_scroll as usize) < rows - height as usize);
    }

    #[test]
    fn action_keys_are_blocked_while_booting() {
        let (tx, mut rx) = channel();
        let mut state = AppState::default();
        state.shell.tab = Tab::Upload;

        on_key(&mut state, &tx, key(KeyCode::Char('u')));
        on_key(&mut state, &tx, key(KeyCode::Char('r')));
        assert!(rx.try_recv().is_err());

        // Navigation still works.
        on_key(&mut state, &tx, key(KeyCode::Tab));
        assert_eq!(state.shell.tab, Tab::Process);
    }

    #[test]
    fn refresh_key_dispatches_an_uploads_fetch() {
        let (tx, mut rx) = channel();
        let mut state = settled_state();

        on_key(&mut state, &tx, key(KeyCode::Char('r')));
        assert!(matches!(rx.try_recv(), Ok(ApiCommand::FetchUploads { .. })));
        assert!(state.history.refresh.is_in_flight());
    }

    #[test]
    fn selecting_a_row_updates_the_active_transcript() {
        let (tx, _rx) = channel();
        let mut state = settled_state();
        state.history.uploads = vec![record(7)];
        state.shell.tab = Tab::History;

        on_key(&mut state, &tx, key(KeyCode::Enter));
        let selection = state.shell.selection.as_ref().unwrap();
        assert_eq!(selection.namespace, "ns-7");
        assert_eq!(selection.filename, "file-7.txt");
    }

    #[test]
    fn paste_on_the_upload_tab_picks_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "hello").unwrap();

        let mut state = settled_state();
        state.shell.tab = Tab::Upload;
        on_paste(&mut state, &format!("\"{}\"\n", path.display()));

        let picked = state.upload.picked.as_ref().unwrap();
        assert_eq!(picked.name, "notes.txt");
        assert!(state.shell.notice.as_ref().map(|n| !n.failure).unwrap_or(false));
    }

    #[test]
    fn paste_while_editing_inserts_into_the_input() {
        let mut state = settled_state();
        state.shell.tab = Tab::Upload;
        state.upload.editing_path = true;
        state.upload.path_input.set("/tmp/");
        state.upload.path_input.move_end();

        on_paste(&mut state, "notes.txt");
        assert_eq!(state.upload.path_input.as_str(), "/tmp/notes.txt");
        assert!(state.upload.picked.is_none());
    }

    #[test]
    fn ctrl_c_quits_even_inside_a_modal() {
        let (tx, _rx) = channel();
        let mut state = settled_state();
        state.history.uploads = vec![record(1)];
        state.shell.tab = Tab::History;
        on_key(&mut state, &tx, key(KeyCode::Char('d')));

        let outcome = on_key(
            &mut state,
            &tx,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert_eq!(outcome, KeyOutcome::Quit);
    }

    #[test]
    fn status_line_shows_selection_and_namespace() {
        let mut state = settled_state();
        state.shell.selection = Some(Selection {
            namespace: "abc123def456".into(),
            filename: "notes.txt".into(),
            transcript_text: "text".into(),
        });
        let text = render_full(&mut state);
        assert!(text.contains("Selected: "));
        assert!(text.contains("notes.txt"));
        assert!(text.contains("Namespace: "));
        assert!(text.contains("abc123de..."));
    }

    #[test]
    fn bootstrap_failure_banner_is_always_visible() {
        let mut state = settled_state();
        state.shell.bootstrap_failed = true;
        state.shell.tab = Tab::Process;
        let text = render_full(&mut state);
        assert!(text.contains(BOOTSTRAP_ERROR));
    }

    #[test]
    fn booting_shows_skeleton_rather_than_content() {
        let mut state = AppState::default();
        state.shell.tab = Tab::History;
        let text = render_full(&mut state);
        assert!(!text.contains("No uploads found"));
        assert!(text.contains("░"));
    }

    #[test]
    fn help_tab_stays_readable_while_booting() {
        let mut state = AppState::default();
        state.shell.tab = Tab::Help;
        let text = render_full(&mut state);
        assert!(text.contains("Keybinds:"));
        assert!(!text.contains("░"));
    }

    #[test]
    fn poisoned_tab_shows_fault_panel_and_enter_retries() {
        let (tx, _rx) = channel();
        let mut state = settled_state();
        state.shell.tab = Tab::Upload;
        state.shell.poison(Tab::Upload, "row index out of bounds".into());

        let text = render_full(&mut state);
        assert!(text.contains("Something went wrong"));

        on_key(&mut state, &tx, key(KeyCode::Enter));
        assert!(state.shell.fault(Tab::Upload).is_none());
    }
}
