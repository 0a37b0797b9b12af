//! Raw-content preview of the picked transcript file.

use super::state::PickedFile;
use std::fs;

const TRUNCATED_MARKER: &str = "\n[truncated]";
pub const MAX_PREVIEW_CONTENT: usize = 65_536;

/// An open preview overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub filename: String,
    pub content: String,
    pub scroll: u16,
}

impl Preview {
    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }

    pub fn scroll_down(&mut self, step: u16) {
        let max = self.line_count().saturating_sub(1) as u16;
        self.scroll = self.scroll.saturating_add(step).min(max);
    }

    pub fn scroll_up(&mut self, step: u16) {
        self.scroll = self.scroll.saturating_sub(step);
    }
}

/// Read the picked file for display. Bytes are decoded lossily, so a
/// binary `.docx` shows its raw reader output rather than the extracted
/// text the backend would produce. Reads run on the UI thread;
/// transcripts are small.
pub fn load_preview(picked: &PickedFile) -> Result<Preview, String> {
    let bytes = fs::read(&picked.path)
        .map_err(|e| format!("Could not read {}: {e}", picked.path.display()))?;
    Ok(Preview {
        filename: picked.name.clone(),
        content: prepare_preview_content(&String::from_utf8_lossy(&bytes)),
        scroll: 0,
    })
}

pub fn prepare_preview_content(raw: &str) -> String {
    if raw.len() <= MAX_PREVIEW_CONTENT {
        raw.to_string()
    } else {
        let mut end = MAX_PREVIEW_CONTENT;
        while end > 0 && !raw.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}{TRUNCATED_MARKER}", &raw[..end])
    }
}
