//! Text buffer behind the query bar, the command bar and the editor fields.
//!
//! The cursor is kept as a character index, not a byte offset, so CJK input
//! never lands the cursor inside a code point and the terminal column is the
//! cursor value itself.

use crate::event::{AppEvent, Direction};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LineInput {
    text: String,
    cursor: usize,
}

impl LineInput {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position in characters from the start of the line.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Text left of the cursor.
    pub fn before_cursor(&self) -> &str {
        &self.text[..self.byte_at(self.cursor)]
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Apply an editing key. Returns `true` only when the text changed;
    /// cursor moves and unrelated events return `false`.
    pub fn edit(&mut self, event: &AppEvent) -> bool {
        match event {
            AppEvent::Char(c) => {
                let at = self.byte_at(self.cursor);
                self.text.insert(at, *c);
                self.cursor += 1;
                true
            }
            AppEvent::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                let at = self.byte_at(self.cursor);
                self.text.remove(at);
                true
            }
            AppEvent::Nav(Direction::Left) => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            AppEvent::Nav(Direction::Right) => {
                self.cursor = (self.cursor + 1).min(self.text.chars().count());
                false
            }
            _ => false,
        }
    }

    fn byte_at(&self, chars: usize) -> usize {
        self.text
            .char_indices()
            .nth(chars)
            .map_or(self.text.len(), |(i, _)| i)
    }
}

impl From<&str> for LineInput {
    fn from(s: &str) -> Self {
        Self {
            text: s.to_string(),
            cursor: s.chars().count(),
        }
    }
}
