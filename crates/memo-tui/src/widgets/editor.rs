//! Note editor drawn over the note list.
//!
//! Wraps an [`EditSession`] with one [`LineInput`] per text field. The app
//! owns saving and discarding; this module only edits the working values.
//!
//! | Key | Title | Body | Category |
//! |-----|-------|------|----------|
//! | `Tab` | next field | next field | next field |
//! | `Enter` | go to body | new line | go to title |
//! | `←` `→` | move cursor | move cursor | previous / next category |

use memo_core::{CategorySet, EditMode, EditSession};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use crate::widgets::line_input::LineInput;

/// Width of the field labels, gap included.
const LABEL_WIDTH: u16 = 10;

/// Rows above the body: title, category and a blank line.
const BODY_TOP: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    Title,
    Body,
    Category,
}

impl EditorField {
    fn next(self) -> EditorField {
        match self {
            EditorField::Title => EditorField::Body,
            EditorField::Body => EditorField::Category,
            EditorField::Category => EditorField::Title,
        }
    }
}

#[derive(Debug)]
pub struct EditorState {
    session: EditSession,
    field: EditorField,
    title: LineInput,
    body: LineInput,
    /// Known labels, plus the note's own label when it is not among them.
    categories: Vec<String>,
    /// `None` only while a note without a category is left untouched.
    category: Option<usize>,
}

impl EditorState {
    pub fn open(session: EditSession, known: &CategorySet) -> Self {
        let mut categories: Vec<String> = known.iter().map(str::to_string).collect();
        let category = session.category.as_deref().map(|label| {
            categories.iter().position(|c| c == label).unwrap_or_else(|| {
                categories.push(label.to_string());
                categories.len() - 1
            })
        });
        Self {
            title: LineInput::from(session.title.as_str()),
            body: LineInput::from(session.body.as_str()),
            field: EditorField::Title,
            categories,
            category,
            session,
        }
    }

    pub fn field(&self) -> EditorField {
        self.field
    }

    pub fn category(&self) -> Option<&str> {
        self.category
            .and_then(|i| self.categories.get(i))
            .map(String::as_str)
    }

    /// The session carrying the current field values.
    pub fn session(&self) -> EditSession {
        let mut session = self.session.clone();
        session.title = self.title.text().to_string();
        session.body = self.body.text().to_string();
        session.category = self.category().map(str::to_string);
        session
    }

    pub fn handle(&mut self, event: &AppEvent) {
        match (self.field, event) {
            (_, AppEvent::FocusNext) => self.field = self.field.next(),
            (EditorField::Title, AppEvent::Enter) => self.field = EditorField::Body,
            (EditorField::Title, event) => {
                self.title.edit(event);
            }
            (EditorField::Body, AppEvent::Enter) => {
                self.body.edit(&AppEvent::Char('\n'));
            }
            (EditorField::Body, event) => {
                self.body.edit(event);
            }
            (EditorField::Category, AppEvent::Nav(Direction::Left)) => self.step_category(false),
            (EditorField::Category, AppEvent::Nav(Direction::Right)) => self.step_category(true),
            (EditorField::Category, AppEvent::Enter) => self.field = EditorField::Title,
            _ => {}
        }
    }

    fn step_category(&mut self, forward: bool) {
        let n = self.categories.len();
        if n == 0 {
            return;
        }
        self.category = Some(match self.category {
            None => 0,
            Some(i) if forward => (i + 1) % n,
            Some(i) => (i + n - 1) % n,
        });
        tracing::debug!(category = ?self.category(), "editor: category changed");
    }

    /// Cell for the text cursor when the editor is drawn in `area`. `None`
    /// on the category field.
    pub fn cursor_position(&self, area: Rect) -> Option<(u16, u16)> {
        let inner = Block::bordered().inner(area);
        let clamp = |v: usize| u16::try_from(v).unwrap_or(u16::MAX);
        let (col, row) = match self.field {
            EditorField::Title => (LABEL_WIDTH.saturating_add(clamp(self.title.cursor())), 0),
            EditorField::Body => {
                let before = self.body.before_cursor();
                let row = before.matches('\n').count();
                let col = before.rsplit('\n').next().map_or(0, |l| l.chars().count());
                (clamp(col), BODY_TOP.saturating_add(clamp(row)))
            }
            EditorField::Category => return None,
        };
        let x = inner.x.saturating_add(col).min(inner.right().saturating_sub(1));
        let y = inner.y.saturating_add(row).min(inner.bottom().saturating_sub(1));
        Some((x, y))
    }
}

pub struct Editor<'a> {
    state: &'a EditorState,
    theme: &'a Theme,
}

impl<'a> Editor<'a> {
    pub fn new(state: &'a EditorState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    fn label(&self, text: &'static str, field: EditorField) -> Span<'static> {
        let style = if self.state.field == field {
            self.theme.match_label.add_modifier(Modifier::BOLD)
        } else {
            self.theme.timestamp
        };
        Span::styled(format!("{text:<width$}", width = usize::from(LABEL_WIDTH)), style)
    }

    fn heading(&self) -> String {
        let session = self.state.session();
        let verb = match session.mode() {
            EditMode::Insert => "new note",
            EditMode::Edit => "edit",
        };
        let marker = if session.is_dirty() { " *" } else { "" };
        format!(" {verb} #{}{marker} ", session.id())
    }
}

impl Widget for Editor<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let block = Block::bordered()
            .title(self.heading())
            .title_bottom(Line::from(" Ctrl+s save · Esc discard · Tab next field ").right_aligned())
            .border_style(self.theme.border_focused);
        let inner = block.inner(area);
        block.render(area, buf);

        let [title, category, _, body] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(inner);

        Line::from(vec![
            self.label("title", EditorField::Title),
            Span::styled(self.state.title.text(), self.theme.note_title),
        ])
        .render(title, buf);

        let (label, style) = match self.state.category() {
            Some(c) => (c, self.theme.category_style(c)),
            None => ("none", Style::default().add_modifier(Modifier::DIM)),
        };
        Line::from(vec![
            self.label("category", EditorField::Category),
            Span::raw("‹ "),
            Span::styled(label, style),
            Span::raw(" ›"),
        ])
        .render(category, buf);

        if self.state.body.is_empty() && self.state.field != EditorField::Body {
            Line::from(Span::styled("(no content)", self.theme.note_placeholder)).render(body, buf);
        } else {
            Paragraph::new(self.state.body.text()).render(body, buf);
        }
    }
}
