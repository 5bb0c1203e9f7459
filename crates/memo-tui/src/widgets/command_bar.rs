//! The `:` prompt drawn over the bottom row.
//!
//! Opened with `:` outside the search box. `Enter` hands the line to
//! [`crate::commands::Command::parse`]; `Escape` closes the prompt. A parse
//! failure stays on screen until the next key.
//!
//! | Command | Action |
//! |---------|--------|
//! | `q`, `quit` | Quit |
//! | `help` | Toggle the help popup |
//! | `new <title>` | Create a note in the selected category and edit it |
//! | `e`, `edit` | Edit the selected note |
//! | `rm` | Delete the selected note |
//! | `cat <category>` | Jump to a category |
//! | `theme <name>` | Switch theme (`default`, `gruvbox`) |
//! | `ts`, `timestamps` | Toggle timestamps on note cards |

use crate::event::AppEvent;
use crate::theme::Theme;
use crate::widgets::line_input::LineInput;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Clear, Widget},
};

#[derive(Debug, Default)]
pub struct CommandBarState {
    line: LineInput,
    /// Message from the last rejected command.
    pub error: Option<String>,
}

impl CommandBarState {
    pub fn text(&self) -> &str {
        self.line.text()
    }

    pub fn clear(&mut self) {
        self.line.clear();
        self.error = None;
    }

    /// `Enter` and `Escape` belong to the app; everything else edits the line.
    pub fn handle(&mut self, event: &AppEvent) {
        self.error = None;
        self.line.edit(event);
    }

    /// Terminal column of the cursor, one past the `:` glyph.
    pub fn cursor_col(&self, area: Rect) -> u16 {
        let col = u16::try_from(self.line.cursor() + 1).unwrap_or(u16::MAX);
        area.x
            .saturating_add(col)
            .min(area.right().saturating_sub(1))
    }
}

/// Draws into a single row; the caller sizes `area` accordingly.
pub struct CommandBar<'a> {
    state: &'a CommandBarState,
    theme: &'a Theme,
}

impl<'a> CommandBar<'a> {
    pub fn new(state: &'a CommandBarState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }
}

impl Widget for CommandBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let line = match &self.state.error {
            Some(err) => Line::from(Span::styled(format!("E  {err}"), self.theme.status_error)),
            None => {
                let prompt = self.theme.border_command_bar.add_modifier(Modifier::BOLD);
                Line::from(vec![Span::styled(":", prompt), Span::raw(self.state.text())])
            }
        };
        line.render(area, buf);
    }
}
