//! Minimal single-line text input for the transcript path field.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

/// Editable line with a char-indexed cursor. Byte offsets are derived
/// on demand so multibyte input stays safe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputField {
    value: String,
    cursor: usize,
}

impl InputField {
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn set(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn insert(&mut self, ch: char) {
        let at = self.byte_offset(self.cursor);
        self.value.insert(at, ch);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, text: &str) {
        let at = self.byte_offset(self.cursor);
        self.value.insert_str(at, text);
        self.cursor += text.chars().count();
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let start = self.byte_offset(self.cursor - 1);
        let end = self.byte_offset(self.cursor);
        self.value.replace_range(start..end, "");
        self.cursor -= 1;
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        let len = self.value.chars().count();
        if self.cursor < len {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(idx, _)| idx)
            .unwrap_or(self.value.len())
    }

    /// Render the value; while editing the cursor position is shown as
    /// a reversed cell (a trailing space when the cursor sits at the end).
    pub fn styled_line(&self, editing: bool) -> Line<'static> {
        if !editing {
            return Line::from(self.value.clone());
        }
        let before: String = self.value.chars().take(self.cursor).collect();
        let at: String = self
            .value
            .chars()
            .nth(self.cursor)
            .map(String::from)
            .unwrap_or_else(|| " ".to_string());
        let after: String = self.value.chars().skip(self.cursor + 1).collect();
        Line::from(vec![
            Span::raw(before),
            Span::styled(at, Style::default().add_modifier(Modifier::REVERSED)),
            Span::raw(after),
        ])
    }
}
