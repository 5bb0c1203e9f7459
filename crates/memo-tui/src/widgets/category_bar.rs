//! Category bar widget: the strip of category tabs at the top of the screen.

use crate::theme::Theme;
use memo_core::{CategoryCounts, ALL};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Tabs, Widget},
};

/// Renders `全部 (n)` followed by every known category with its count.
///
/// `active` indexes into that sequence, so 0 is the "all" tab. Keybinding
/// hints are right-aligned in the same row.
pub struct CategoryBar<'a> {
    counts: &'a CategoryCounts,
    active: usize,
    theme: &'a Theme,
}

impl<'a> CategoryBar<'a> {
    pub fn new(counts: &'a CategoryCounts, active: usize, theme: &'a Theme) -> Self {
        Self {
            counts,
            active,
            theme,
        }
    }
}

impl Widget for CategoryBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let all = Line::from(format!(" {ALL} ({}) ", self.counts.all()));
        let labels: Vec<Line> = std::iter::once(all)
            .chain(self.counts.iter().map(|(label, n)| {
                Line::from(vec![
                    Span::styled(format!(" {label}"), self.theme.category_style(label)),
                    Span::raw(format!(" ({n}) ")),
                ])
            }))
            .collect();

        Tabs::new(labels)
            .select(self.active)
            .highlight_style(self.theme.category_active)
            .divider("")
            .render(area, buf);

        let hint = " :cmd  ?:help ";
        let hint_x = area.right().saturating_sub(hint.len() as u16);
        buf.set_string(
            hint_x,
            area.y,
            hint,
            Style::default().add_modifier(Modifier::DIM),
        );
    }
}
