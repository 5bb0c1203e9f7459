//! Live search box with the result count on the right.
//!
//! The app re-runs the search whenever [`QueryBarState::handle`] reports a
//! text change, so results follow each keystroke. Leading and trailing
//! whitespace stays in the box; the filter trims it.

use crate::event::AppEvent;
use crate::theme::Theme;
use crate::widgets::line_input::LineInput;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

#[derive(Debug, Default)]
pub struct QueryBarState {
    line: LineInput,
}

impl QueryBarState {
    pub fn text(&self) -> &str {
        self.line.text()
    }

    /// Returns `true` when the query text changed.
    pub fn handle(&mut self, event: &AppEvent) -> bool {
        let changed = self.line.edit(event);
        if changed {
            tracing::debug!(query = %self.line.text(), cursor = self.line.cursor(), "query: edited");
        }
        changed
    }
}

pub struct QueryBar<'a> {
    state: &'a QueryBarState,
    results: usize,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> QueryBar<'a> {
    pub fn new(state: &'a QueryBarState, results: usize, focused: bool, theme: &'a Theme) -> Self {
        Self {
            state,
            results,
            focused,
            theme,
        }
    }

    /// Terminal cell for the text cursor when the bar is drawn in `area`.
    pub fn cursor_position(&self, area: Rect) -> (u16, u16) {
        let col = u16::try_from(self.state.line.cursor()).unwrap_or(u16::MAX);
        let last = area.right().saturating_sub(2);
        ((area.x + 1).saturating_add(col).min(last), area.y + 1)
    }
}

impl Widget for QueryBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let frame = Block::bordered()
            .title("Search")
            .border_style(self.theme.border(self.focused));
        let body = frame.inner(area);
        frame.render(area, buf);

        let [text_area, count_area] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(14)]).areas(body);

        let text = if self.state.line.is_empty() && !self.focused {
            Line::from(Span::styled("press / to search", self.theme.note_placeholder))
        } else {
            Line::from(self.state.text())
        };
        Paragraph::new(text).render(text_area, buf);

        let noun = if self.results == 1 { "note" } else { "notes" };
        Line::from(format!("{} {noun}", self.results))
            .right_aligned()
            .render(count_area, buf);
    }
}
