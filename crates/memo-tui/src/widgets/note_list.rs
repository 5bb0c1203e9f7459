//! Note list widget: the scrollable result pane.
//!
//! Each [`DisplayModel`] is drawn as a multi-line card:
//!
//! ```text
//! Meeting notes for Q3 planning          工作
//! Discussed roadmap and staffing for the
//! upcoming quarter. Action items are
//! tracked in the shared board, owners a
//! ...
//! match in title  ...s for [Q3] plan...
//! 2024-01-16 00:30:00 · 2024-01-16 09:12:44
//! ```
//!
//! # Navigation (when pane is focused)
//!
//! | Key | Action |
//! |-----|--------|
//! | `↑` / `k` | Select previous note |
//! | `↓` / `j` | Select next note |
//! | `PageUp` / `Ctrl+u` | Move selection up one page |
//! | `PageDown` / `Ctrl+d` | Move selection down one page |

use std::cell::Cell;

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use memo_core::project::{DisplayModel, Visibility};
use memo_core::excerpt::ELLIPSIS;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget,
    },
};

const PAGE_STEP: usize = 5;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct NoteListState {
    /// Index of the selected card.
    pub selected: usize,
    pub show_timestamps: bool,
    /// First card drawn in the last render.
    offset: Cell<usize>,
}

impl Default for NoteListState {
    fn default() -> Self {
        Self {
            selected: 0,
            show_timestamps: true,
            offset: Cell::new(0),
        }
    }
}

impl NoteListState {
    /// Keep the selection inside `0..len` after the result set changed.
    pub fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
        if self.offset.get() > self.selected {
            self.offset.set(self.selected);
        }
    }

    pub fn handle(&mut self, event: &AppEvent, len: usize) {
        if len == 0 {
            return;
        }
        let last = len - 1;
        match event {
            AppEvent::Nav(Direction::Up) => self.selected = self.selected.saturating_sub(1),
            AppEvent::Nav(Direction::Down) => self.selected = (self.selected + 1).min(last),
            AppEvent::ScrollUp => self.selected = self.selected.saturating_sub(PAGE_STEP),
            AppEvent::ScrollDown => self.selected = (self.selected + PAGE_STEP).min(last),
            _ => return,
        }
        tracing::debug!(selected = self.selected, "list: selection moved");
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct NoteList<'a> {
    models: &'a [DisplayModel],
    state: &'a NoteListState,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> NoteList<'a> {
    pub fn new(
        models: &'a [DisplayModel],
        state: &'a NoteListState,
        focused: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            models,
            state,
            focused,
            theme,
        }
    }
}

impl Widget for NoteList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title("Notes")
            .border_style(self.theme.border(self.focused));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.models.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "no notes",
                Style::default().add_modifier(Modifier::DIM),
            )))
            .render(inner, buf);
            return;
        }

        let text_area = Rect { width: inner.width.saturating_sub(1), ..inner };
        let sb_area = Rect {
            x: inner.right().saturating_sub(1),
            width: 1,
            ..inner
        };

        let cards: Vec<Vec<Line<'static>>> = self
            .models
            .iter()
            .map(|m| card_lines(m, self.state.show_timestamps, text_area.width, self.theme))
            .collect();

        let height = inner.height as usize;
        let selected = self.state.selected.min(cards.len() - 1);
        let mut offset = self.state.offset.get().min(selected);
        while offset < selected
            && cards[offset..=selected].iter().map(Vec::len).sum::<usize>() > height
        {
            offset += 1;
        }
        self.state.offset.set(offset);

        let mut lines: Vec<Line<'static>> = Vec::with_capacity(height);
        for (i, card) in cards.into_iter().enumerate().skip(offset) {
            if lines.len() >= height {
                break;
            }
            let is_selected = i == selected;
            lines.extend(card.into_iter().map(|line| {
                if is_selected {
                    line.patch_style(self.theme.selected)
                } else {
                    line
                }
            }));
        }
        Paragraph::new(lines).render(text_area, buf);

        let mut sb_state = ScrollbarState::new(self.models.len()).position(selected);
        StatefulWidget::render(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .end_symbol(None),
            sb_area,
            buf,
            &mut sb_state,
        );
    }
}

// ---------------------------------------------------------------------------
// Card rendering
// ---------------------------------------------------------------------------

/// Lines of one result card, including the trailing blank separator.
pub fn card_lines(
    model: &DisplayModel,
    show_timestamps: bool,
    width: u16,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let title_style = if model.untitled {
        theme.note_untitled
    } else {
        theme.note_title
    };
    let title_width = model.title.chars().count();
    let cat_width = model.category.chars().count() * 2;
    let pad = (width as usize).saturating_sub(title_width + cat_width + 1).max(1);
    lines.push(Line::from(vec![
        Span::styled(model.title.clone(), title_style),
        Span::raw(" ".repeat(pad)),
        Span::styled(model.category.clone(), theme.category_style(&model.category)),
    ]));

    match model.preview.placeholder {
        Some(placeholder) => {
            lines.push(Line::from(Span::styled(placeholder, theme.note_placeholder)));
        }
        None => {
            let style = if model.preview.underlined {
                theme.note_preview
            } else {
                theme.note_preview.remove_modifier(Modifier::UNDERLINED)
            };
            lines.extend(
                model
                    .preview
                    .lines
                    .iter()
                    .map(|l| Line::from(Span::styled(l.clone(), style))),
            );
        }
    }
    match model.preview.ellipsis {
        Visibility::Visible => lines.push(Line::from(ELLIPSIS)),
        Visibility::Invisible => lines.push(Line::default()),
        Visibility::Collapsed => {}
    }

    if let Some(annotation) = &model.annotation {
        let (before, hit, after) = annotation.excerpt.parts();
        lines.push(Line::from(vec![
            Span::styled(annotation.label.clone(), theme.match_label),
            Span::raw("  "),
            Span::raw(before.to_string()),
            Span::styled(hit.to_string(), theme.search_highlight),
            Span::raw(after.to_string()),
        ]));
    }

    if show_timestamps {
        lines.push(Line::from(Span::styled(
            format!("{} · {}", model.created, model.modified),
            theme.timestamp,
        )));
    }

    lines.push(Line::default());
    lines
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
