//! Colour theme for the memo TUI.
//!
//! A theme is a TOML file with one table per screen region. The two shipped
//! themes are compiled in with [`include_str!`]; [`Theme::by_name`] picks one
//! from the `[ui] theme` setting or the `:theme` command.
//!
//! # Colour assignment for categories
//!
//! Category labels are hashed into `[categories] palette` so a category keeps
//! its colour wherever it appears in the category bar.

use std::str::FromStr;

use anyhow::Context;
use config::{Config, ConfigError, File, FileFormat};
use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

/// `(name, toml)` for every theme compiled into the binary. The first entry
/// is the default.
const BUILTIN_THEMES: &[(&str, &str)] = &[
    ("default", include_str!("themes/default.toml")),
    ("gruvbox_dark", include_str!("themes/gruvbox_dark.toml")),
];

/// One inline table such as `{ fg = "cyan", bold = true }`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StyleSpec {
    fg: Option<String>,
    bg: Option<String>,
    bold: bool,
    dim: bool,
    italic: bool,
    underlined: bool,
}

impl From<StyleSpec> for Style {
    fn from(spec: StyleSpec) -> Style {
        let mut style = Style::default();
        if let Some(fg) = spec.fg.as_deref().and_then(parse_color) {
            style = style.fg(fg);
        }
        if let Some(bg) = spec.bg.as_deref().and_then(parse_color) {
            style = style.bg(bg);
        }
        [
            (spec.bold, Modifier::BOLD),
            (spec.dim, Modifier::DIM),
            (spec.italic, Modifier::ITALIC),
            (spec.underlined, Modifier::UNDERLINED),
        ]
        .into_iter()
        .filter(|(on, _)| *on)
        .fold(style, |style, (_, m)| style.add_modifier(m))
    }
}

/// Resolved styles for every themed element.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    pub border_focused: Style,
    pub border_command_bar: Style,
    pub border_unfocused: Style,

    /// Matched span inside an excerpt.
    pub search_highlight: Style,

    pub note_title: Style,
    /// Title style when the "untitled" placeholder is shown.
    pub note_untitled: Style,
    /// Content preview lines. Themes normally underline these.
    pub note_preview: Style,
    /// The "no content" placeholder. Never underlined.
    pub note_placeholder: Style,
    pub match_label: Style,
    pub timestamp: Style,
    pub selected: Style,

    pub status_error: Style,
    pub status_info: Style,

    /// Background for the selected category tab.
    pub category_active: Style,
    category_palette: Vec<Color>,
}

impl Theme {
    /// The first built-in theme.
    pub fn load_default() -> Self {
        let (name, src) = BUILTIN_THEMES[0];
        Self::from_toml_str(name, src).expect("built-in theme must parse")
    }

    /// Look up a built-in theme, case-insensitively; `gruvbox` and
    /// `gruvbox-dark` are accepted for `gruvbox_dark`.
    pub fn by_name(name: &str) -> Option<Self> {
        let wanted = match name.to_ascii_lowercase().replace('-', "_").as_str() {
            "gruvbox" => "gruvbox_dark".to_string(),
            other => other.to_string(),
        };
        BUILTIN_THEMES
            .iter()
            .find(|(n, _)| *n == wanted)
            .map(|(n, src)| Self::from_toml_str(n, src).expect("built-in theme must parse"))
    }

    pub fn from_toml_str(name: &str, src: &str) -> anyhow::Result<Self> {
        let table = Config::builder()
            .add_source(File::from_str(src, FileFormat::Toml))
            .build()
            .with_context(|| format!("theme {name}"))?;

        let style = |key: &str| -> anyhow::Result<Style> {
            let spec: StyleSpec = table
                .get(key)
                .with_context(|| format!("theme {name}: {key}"))?;
            Ok(spec.into())
        };
        let optional = |key: &str| -> anyhow::Result<Style> {
            match table.get::<StyleSpec>(key) {
                Err(ConfigError::NotFound(_)) => Ok(Style::default()),
                other => Ok(other.with_context(|| format!("theme {name}: {key}"))?.into()),
            }
        };
        let palette: Vec<String> = table
            .get("categories.palette")
            .with_context(|| format!("theme {name}: categories.palette"))?;

        Ok(Self {
            name: name.to_string(),
            border_focused: style("borders.focused")?,
            border_command_bar: style("borders.command_bar")?,
            border_unfocused: style("borders.unfocused")?,
            search_highlight: style("search.highlight")?,
            note_title: style("notes.title")?,
            note_untitled: style("notes.untitled")?,
            note_preview: style("notes.preview")?,
            note_placeholder: style("notes.placeholder")?.remove_modifier(Modifier::UNDERLINED),
            match_label: style("notes.match_label")?,
            timestamp: style("notes.timestamp")?,
            selected: optional("notes.selected")?,
            status_error: style("status.error")?,
            status_info: style("status.info")?,
            category_active: style("categories.active")?,
            category_palette: palette.iter().filter_map(|c| parse_color(c)).collect(),
        })
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            self.border_focused
        } else {
            self.border_unfocused
        }
    }

    /// Foreground for a category label, stable across runs.
    pub fn category_style(&self, label: &str) -> Style {
        if self.category_palette.is_empty() {
            return Style::default();
        }
        let len = self.category_palette.len() as u64;
        let idx = (stable_hash(label) % len) as usize;
        Style::default().fg(self.category_palette[idx])
    }
}

/// FNV-1a over the UTF-8 bytes.
fn stable_hash(s: &str) -> u64 {
    s.bytes().fold(0xcbf2_9ce4_8422_2325, |h, b| {
        (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
    })
}

/// Anything ratatui's `Color::from_str` accepts (`dark_gray`, `#rrggbb`, a
/// bare palette index) plus `indexed:N`.
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    let s = s.strip_prefix("indexed:").unwrap_or(s);
    Color::from_str(s).ok()
}
