//! Key reference drawn as a centred overlay. `?` opens it outside the search
//! box; `?`, `Esc` or `q` closes it.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};

/// `(keys, action)` rows, grouped by where they apply.
const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "anywhere",
        &[
            ("Ctrl+c", "quit"),
            ("Tab", "focus categories, notes, search in turn"),
            ("Esc", "leave the search box, clear the status"),
        ],
    ),
    (
        "categories & notes",
        &[
            ("q", "quit"),
            ("/", "search"),
            ("[ ]", "previous / next category"),
            ("h l  ← →", "previous / next category (category bar)"),
            ("k j  ↑ ↓", "move the selection"),
            ("PgUp PgDn", "page up / down"),
            ("n", "new note in the current category"),
            ("e", "edit the selected note"),
            ("Ctrl+u Ctrl+d", "page up / down"),
            (":", "command prompt"),
            ("?", "this help"),
        ],
    ),
    (
        "search",
        &[("Enter", "jump to the results"), ("← →", "move the cursor")],
    ),
    (
        "editor",
        &[
            ("Tab", "title, body, category in turn"),
            ("Enter", "next field / new line in the body"),
            ("← →", "change category (category field)"),
            ("Ctrl+s", "save and close"),
            ("Esc", "discard and close"),
        ],
    ),
    (
        "commands",
        &[
            (":new <title>", "create a note in the current category"),
            (":edit", "edit the selected note"),
            (":rm", "delete the selected note"),
            (":cat <category>", "switch category"),
            (":theme <name>", "default or gruvbox"),
            (":ts", "show / hide timestamps"),
        ],
    ),
];

const KEY_COLUMN: usize = 18;

pub struct HelpPopup<'a> {
    theme: &'a Theme,
}

impl<'a> HelpPopup<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let heading = self.theme.match_label.add_modifier(Modifier::BOLD);
        let key = self.theme.note_title.add_modifier(Modifier::BOLD);

        let mut lines = Vec::new();
        for (i, (title, rows)) in SECTIONS.iter().enumerate() {
            if i > 0 {
                lines.push(Line::default());
            }
            lines.push(Line::from(Span::styled(*title, heading)));
            lines.extend(rows.iter().map(|(keys, action)| {
                Line::from(vec![
                    Span::styled(format!("  {keys:<width$}", width = KEY_COLUMN), key),
                    Span::raw(*action),
                ])
            }));
        }
        lines
    }
}

impl Widget for HelpPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self.lines();
        let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX);

        let [row] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(area);
        let [popup] = Layout::horizontal([Constraint::Length(64)])
            .flex(Flex::Center)
            .areas(row);

        Clear.render(popup, buf);
        let frame = Block::bordered()
            .title(" keys ")
            .border_style(self.theme.border_focused);
        let body = frame.inner(popup);
        frame.render(popup, buf);
        Paragraph::new(lines).render(body, buf);
    }
}
