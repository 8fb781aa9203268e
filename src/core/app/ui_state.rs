use std::time::{Duration, Instant};

use crate::ui::reveal::Reveal;

/// The visible part of an outstanding turn.
#[derive(Debug, Clone)]
pub struct PendingView {
    pub reveal: Reveal,
    pub started: Instant,
}

/// Front-end state that is not part of the conversation itself.
#[derive(Debug, Default)]
pub struct UiState {
    pub input: String,
    /// Cursor position in characters, not bytes.
    pub cursor: usize,
    pub status: Option<String>,
    /// Informational text (help, command output) shown below the transcript
    /// until the next submission.
    pub notice: Option<String>,
    /// Lines scrolled up from the bottom of the transcript.
    pub scroll_from_bottom: u16,
    pub pending: Option<PendingView>,
}

impl UiState {
    fn byte_index(&self, cursor: usize) -> usize {
        self.input
            .char_indices()
            .nth(cursor)
            .map(|(index, _)| index)
            .unwrap_or(self.input.len())
    }

    fn char_len(&self) -> usize {
        self.input.chars().count()
    }

    pub fn insert_char(&mut self, ch: char) {
        let index = self.byte_index(self.cursor);
        self.input.insert(index, ch);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, text: &str) {
        let index = self.byte_index(self.cursor);
        self.input.insert_str(index, text);
        self.cursor += text.chars().count();
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let index = self.byte_index(self.cursor - 1);
        self.input.remove(index);
        self.cursor -= 1;
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let index = self.byte_index(self.cursor);
            self.input.remove(index);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_len());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Empties the input box and returns what was in it.
    pub fn take_input(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.input)
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn scroll_up(&mut self, lines: u16, max_offset: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(lines).min(max_offset);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(lines);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_from_bottom = 0;
    }

    pub fn start_pending(&mut self, text: &str, delay: Duration) {
        self.pending = Some(PendingView {
            reveal: Reveal::new(text, delay),
            started: Instant::now(),
        });
    }

    /// Advances the cosmetic reveal, if a turn is outstanding.
    pub fn tick(&mut self) {
        if let Some(pending) = &mut self.pending {
            pending.reveal.advance_to(pending.started.elapsed());
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
