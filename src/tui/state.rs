//! Per-tab stores and the reducer that applies controller events.
//!
//! All async feedback lives in discriminated per-slot states; sequence
//! numbers issued at dispatch let the reducer drop responses that were
//! overtaken by a newer request on the same slot.

use crate::model::{AppEvent, Effect, Selection, UploadRecord};
use std::ops::Range;
use std::path::PathBuf;
use tracing::{debug, error};

use super::input::InputField;
use super::preview::Preview;

pub const PAGE_SIZE: usize = 5;

pub const BOOTSTRAP_ERROR: &str = "Failed to initialize application. Please refresh.";

/// Tabs in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Upload,
    Process,
    History,
    Help,
}

pub const TAB_COUNT: usize = 4;

impl Tab {
    pub fn index(self) -> usize {
        match self {
            Tab::Upload => 0,
            Tab::Process => 1,
            Tab::History => 2,
            Tab::Help => 3,
        }
    }

    fn from_index(index: usize) -> Self {
        match index {
            0 => Tab::Upload,
            1 => Tab::Process,
            2 => Tab::History,
            _ => Tab::Help,
        }
    }

    pub fn next(self) -> Self {
        Self::from_index((self.index() + 1) % TAB_COUNT)
    }

    pub fn prev(self) -> Self {
        Self::from_index((self.index() + TAB_COUNT - 1) % TAB_COUNT)
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::Upload => "Upload",
            Tab::Process => "Process",
            Tab::History => "History",
            Tab::Help => "Help",
        }
    }
}

/// Request slots. Each owns an action state and a sequence counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Prompts,
    Uploads,
    Upload,
    Ingest,
    PromptRun,
    Delete,
}

const SLOT_COUNT: usize = 6;

/// Lifecycle of one async action.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActionState {
    #[default]
    Idle,
    InFlight {
        seq: u64,
    },
    Succeeded {
        seq: u64,
        message: String,
    },
    Failed {
        seq: u64,
        error: String,
    },
}

impl ActionState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, ActionState::InFlight { .. })
    }

    /// Feedback to surface for this slot, if any. Slots that succeed
    /// silently carry an empty message and surface nothing.
    pub fn feedback(&self) -> Option<Feedback<'_>> {
        match self {
            ActionState::Succeeded { message, .. } if !message.is_empty() => {
                Some(Feedback::Success(message))
            }
            ActionState::Failed { error, .. } => Some(Feedback::Failure(error)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback<'a> {
    Success(&'a str),
    Failure(&'a str),
}

#[derive(Debug, Default)]
struct Sequences {
    latest: [u64; SLOT_COUNT],
}

impl Sequences {
    fn issue(&mut self, slot: Slot) -> u64 {
        let counter = &mut self.latest[slot as usize];
        *counter += 1;
        *counter
    }

    fn current(&self, slot: Slot) -> u64 {
        self.latest[slot as usize]
    }
}

/// Instant, non-request feedback (file picked, history row selected).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub failure: bool,
}

impl Notice {
    pub fn ok(text: String) -> Self {
        Self {
            text,
            failure: false,
        }
    }

    pub fn fail(text: String) -> Self {
        Self {
            text,
            failure: true,
        }
    }
}

/// A validated local transcript file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    pub path: PathBuf,
    pub name: String,
}

/// Check a typed or pasted path: it must exist, be a regular file, and
/// carry a `.txt` or `.docx` extension. The extension message matches
/// the backend's own rejection string.
pub fn validate_transcript_path(raw: &str) -> Result<PickedFile, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Enter a transcript path first.".to_string());
    }
    let path = PathBuf::from(raw);
    if !path.exists() {
        return Err(format!("File not found: {raw}"));
    }
    if !path.is_file() {
        return Err(format!("Not a regular file: {raw}"));
    }
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("txt") | Some("docx") => {}
        _ => return Err("Unsupported file type. Only .txt or .docx allowed.".to_string()),
    }
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(raw)
        .to_string();
    Ok(PickedFile { path, name })
}

/// Upload tab store.
#[derive(Debug, Default)]
pub struct UploadState {
    pub path_input: InputField,
    pub editing_path: bool,
    pub picked: Option<PickedFile>,
    pub preview: Option<Preview>,
    pub upload: ActionState,
    pub ingest: ActionState,
}

/// Process tab store.
#[derive(Debug, Default)]
pub struct ProcessState {
    pub prompt_list: ActionState,
    pub prompts: Vec<String>,
    pub chosen: Option<usize>,
    pub run: ActionState,
    pub result: Option<String>,
    pub result_scroll: u16,
    /// Inner (width, height) of the result pane from the last frame;
    /// the scroll clamp is computed against it.
    pub result_view: (u16, u16),
}

impl ProcessState {
    /// Move the prompt cursor down; entering the list from the
    /// unselected placeholder lands on the first entry.
    pub fn choose_next(&mut self) {
        if self.prompts.is_empty() {
            return;
        }
        self.chosen = Some(match self.chosen {
            None => 0,
            Some(index) => (index + 1).min(self.prompts.len() - 1),
        });
    }

    /// Move the prompt cursor up; moving above the first entry returns
    /// to the unselected placeholder.
    pub fn choose_prev(&mut self) {
        self.chosen = match self.chosen {
            None | Some(0) => None,
            Some(index) => Some(index - 1),
        };
    }
}

/// History tab store.
#[derive(Debug)]
pub struct HistoryState {
    pub uploads: Vec<UploadRecord>,
    /// 1-based, like the page label it feeds.
    pub page: usize,
    /// Row within the visible page.
    pub cursor: usize,
    pub refresh: ActionState,
    pub delete: ActionState,
    pub pending_delete: Option<UploadRecord>,
}

impl Default for HistoryState {
    fn default() -> Self {
        Self {
            uploads: Vec::new(),
            page: 1,
            cursor: 0,
            refresh: ActionState::Idle,
            delete: ActionState::Idle,
            pending_delete: None,
        }
    }
}

impl HistoryState {
    pub fn total_pages(&self) -> usize {
        total_pages(self.uploads.len())
    }

    pub fn visible_range(&self) -> Range<usize> {
        page_window(self.uploads.len(), self.page)
    }

    pub fn visible(&self) -> &[UploadRecord] {
        &self.uploads[self.visible_range()]
    }

    pub fn selected(&self) -> Option<&UploadRecord> {
        self.visible().get(self.cursor)
    }

    pub fn next_page(&mut self) {
        if self.page < self.total_pages() {
            self.page += 1;
            self.cursor = 0;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
            self.cursor = 0;
        }
    }

    pub fn cursor_down(&mut self) {
        let len = self.visible().len();
        if len > 0 && self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Clip the view to a replaced list: page into `[1, pages]`, cursor
    /// into the visible window.
    fn clamp_view(&mut self) {
        let pages = self.total_pages().max(1);
        self.page = self.page.clamp(1, pages);
        let len = self.visible().len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }
}

/// ceil(N / page size); zero for an empty list.
pub fn total_pages(total: usize) -> usize {
    total.div_ceil(PAGE_SIZE)
}

/// Half-open index range of one 1-based page.
pub fn page_window(total: usize, page: usize) -> Range<usize> {
    let start = (page.max(1) - 1) * PAGE_SIZE;
    let start = start.min(total);
    let end = (start + PAGE_SIZE).min(total);
    start..end
}

/// Shell store: cross-tab concerns.
#[derive(Debug)]
pub struct ShellState {
    pub tab: Tab,
    pub booting: bool,
    prompts_settled: bool,
    uploads_settled: bool,
    pub bootstrap_failed: bool,
    pub selection: Option<Selection>,
    pub notice: Option<Notice>,
    pub render_faults: [Option<String>; TAB_COUNT],
    pub spinner_frame: usize,
}

impl Default for ShellState {
    fn default() -> Self {
        Self {
            tab: Tab::Upload,
            booting: true,
            prompts_settled: false,
            uploads_settled: false,
            bootstrap_failed: false,
            selection: None,
            notice: None,
            render_faults: [None, None, None, None],
            spinner_frame: 0,
        }
    }
}

impl ShellState {
    /// Namespace of the active selection, if it has a non-empty one.
    /// Backend payloads may omit the field, so presence of a selection
    /// alone does not mean there is a namespace to post against.
    pub fn active_namespace(&self) -> Option<&str> {
        self.selection
            .as_ref()
            .map(|s| s.namespace.as_str())
            .filter(|namespace| !namespace.is_empty())
    }

    pub fn fault(&self, tab: Tab) -> Option<&str> {
        self.render_faults[tab.index()].as_deref()
    }

    pub fn poison(&mut self, tab: Tab, message: String) {
        error!(tab = tab.title(), %message, "tab draw panicked");
        self.render_faults[tab.index()] = Some(message);
    }

    pub fn clear_fault(&mut self, tab: Tab) {
        self.render_faults[tab.index()] = None;
    }

    pub fn advance_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }
}

#[derive(Debug, Default)]
pub struct AppState {
    pub shell: ShellState,
    pub upload: UploadState,
    pub process: ProcessState,
    pub history: HistoryState,
    seq: Sequences,
}

impl AppState {
    /// Assign the next sequence number for a slot and mark it in
    /// flight. The number must travel with the request.
    pub fn begin(&mut self, slot: Slot) -> u64 {
        let seq = self.seq.issue(slot);
        *self.slot_mut(slot) = ActionState::InFlight { seq };
        seq
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut ActionState {
        match slot {
            Slot::Prompts => &mut self.process.prompt_list,
            Slot::Uploads => &mut self.history.refresh,
            Slot::Upload => &mut self.upload.upload,
            Slot::Ingest => &mut self.upload.ingest,
            Slot::PromptRun => &mut self.process.run,
            Slot::Delete => &mut self.history.delete,
        }
    }

    fn accept(&self, slot: Slot, seq: u64) -> bool {
        let latest = self.seq.current(slot);
        if seq != latest {
            debug!(?slot, seq, latest, "discarding stale response");
            return false;
        }
        true
    }

    /// A mutating request is running. Gates upload, ingest, and prompt
    /// runs; refresh and delete are not gated.
    pub fn busy(&self) -> bool {
        self.upload.upload.is_in_flight()
            || self.upload.ingest.is_in_flight()
            || self.process.run.is_in_flight()
    }

    /// Anything at all in flight, for the spinner.
    pub fn any_request_in_flight(&self) -> bool {
        self.busy()
            || self.process.prompt_list.is_in_flight()
            || self.history.refresh.is_in_flight()
            || self.history.delete.is_in_flight()
    }

    pub fn can_upload(&self) -> bool {
        self.upload.picked.is_some() && !self.busy()
    }

    pub fn can_ingest(&self) -> bool {
        let has_transcript = self
            .shell
            .selection
            .as_ref()
            .is_some_and(|s| !s.transcript_text.is_empty());
        has_transcript && !self.busy()
    }

    pub fn can_run_prompt(&self) -> bool {
        self.chosen_prompt().is_some() && self.shell.active_namespace().is_some() && !self.busy()
    }

    pub fn chosen_prompt(&self) -> Option<&str> {
        self.process
            .chosen
            .and_then(|index| self.process.prompts.get(index))
            .map(String::as_str)
    }

    /// Validate a typed or pasted path and record the pick.
    pub fn pick_path(&mut self, raw: &str) {
        match validate_transcript_path(raw) {
            Ok(picked) => {
                self.shell.notice = Some(Notice::ok(format!("Selected \"{}\"", picked.name)));
                self.upload.picked = Some(picked);
            }
            Err(error) => {
                self.shell.notice = Some(Notice::fail(error));
            }
        }
    }

    /// Make a history row the active transcript. Restores namespace and
    /// filename only; the transcript body is not stored server-side, so
    /// prompt runs after this send an empty transcript.
    pub fn select_record(&mut self, record: &UploadRecord) {
        self.shell.selection = Some(Selection::from_record(record));
        self.process.result = None;
        self.process.result_scroll = 0;
        self.shell.notice = Some(Notice::ok(format!("Selected \"{}\"", record.filename)));
    }

    /// Apply one controller event. Returns follow-up effects for the
    /// event loop to dispatch.
    pub fn apply(&mut self, event: AppEvent) -> Vec<Effect> {
        let mut effects = Vec::new();
        match event {
            AppEvent::PromptsLoaded { seq, result } => {
                if !self.accept(Slot::Prompts, seq) {
                    return effects;
                }
                match result {
                    Ok(prompts) => {
                        self.process.prompts = prompts;
                        self.process.prompt_list = ActionState::Succeeded {
                            seq,
                            message: String::new(),
                        };
                    }
                    Err(_) => {
                        self.process.prompt_list = ActionState::Failed {
                            seq,
                            error: "Failed to load prompts.".to_string(),
                        };
                        if self.shell.booting {
                            self.shell.bootstrap_failed = true;
                        }
                    }
                }
                self.shell.prompts_settled = true;
                self.update_booting();
            }
            AppEvent::UploadsLoaded { seq, result } => {
                if !self.accept(Slot::Uploads, seq) {
                    return effects;
                }
                match result {
                    Ok(uploads) => {
                        self.history.uploads = uploads;
                        self.history.clamp_view();
                        self.history.refresh = ActionState::Succeeded {
                            seq,
                            message: String::new(),
                        };
                    }
                    Err(_) => {
                        self.history.refresh = ActionState::Failed {
                            seq,
                            error: "Failed to load upload history.".to_string(),
                        };
                        if self.shell.booting {
                            self.shell.bootstrap_failed = true;
                        }
                    }
                }
                self.shell.uploads_settled = true;
                self.update_booting();
            }
            AppEvent::UploadFinished { seq, result } => {
                if !self.accept(Slot::Upload, seq) {
                    return effects;
                }
                match result {
                    Ok(outcome) => {
                        self.shell.selection = Some(Selection::from_upload(outcome));
                        self.upload.upload = ActionState::Succeeded {
                            seq,
                            message: "File uploaded successfully.".to_string(),
                        };
                    }
                    Err(error) => {
                        self.upload.upload = ActionState::Failed {
                            seq,
                            error: format!("Upload failed: {error}"),
                        };
                    }
                }
            }
            AppEvent::IngestFinished { seq, result } => {
                if !self.accept(Slot::Ingest, seq) {
                    return effects;
                }
                match result {
                    Ok(()) => {
                        self.upload.ingest = ActionState::Succeeded {
                            seq,
                            message: "Transcript processed into vector database.".to_string(),
                        };
                        effects.push(Effect::RefreshUploads);
                    }
                    Err(error) => {
                        self.upload.ingest = ActionState::Failed {
                            seq,
                            error: format!("RAG processing failed: {error}"),
                        };
                    }
                }
            }
            AppEvent::PromptRunFinished { seq, result } => {
                if !self.accept(Slot::PromptRun, seq) {
                    return effects;
                }
                match result {
                    Ok(text) => {
                        self.process.result = Some(text);
                        self.process.result_scroll = 0;
                        self.process.run = ActionState::Succeeded {
                            seq,
                            message: String::new(),
                        };
                    }
                    Err(error) => {
                        // The previous result stays on screen.
                        self.process.run = ActionState::Failed {
                            seq,
                            error: format!("Prompt processing failed: {error}"),
                        };
                    }
                }
            }
            AppEvent::DeleteFinished {
                seq,
                namespace,
                result,
            } => {
                if !self.accept(Slot::Delete, seq) {
                    return effects;
                }
                match result {
                    Ok(()) => {
                        self.history.delete = ActionState::Succeeded {
                            seq,
                            message: "Deleted successfully.".to_string(),
                        };
                        let deleted_active = self
                            .shell
                            .selection
                            .as_ref()
                            .is_some_and(|s| s.namespace == namespace);
                        if deleted_active {
                            self.shell.selection = None;
                            self.process.chosen = None;
                            self.process.result = None;
                            self.process.result_scroll = 0;
                        }
                        effects.push(Effect::RefreshUploads);
                    }
                    Err(error) => {
                        self.history.delete = ActionState::Failed {
                            seq,
                            error: format!("Deletion failed: {error}"),
                        };
                    }
                }
            }
        }
        effects
    }

    fn update_booting(&mut self) {
        if self.shell.prompts_settled && self.shell.uploads_settled {
            self.shell.booting = false;
        }
    }
}
