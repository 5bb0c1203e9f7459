//! Result projector: turns a stored [`Note`] into the [`DisplayModel`] a
//! front end renders.
//!
//! Projection is a pure function of the row, the active [`SearchFilter`] and
//! the [`ProjectorOptions`]. Nothing here touches the store.
//!
//! # Content preview
//!
//! The body is split on `'\n'` and every line is cut into fixed-width chunks
//! (a hard character cut, no word boundaries). The first `preview_lines`
//! chunks across the whole body form the preview; the ellipsis indicator is
//! [`Visibility::Visible`] when more chunks exist and
//! [`Visibility::Invisible`] (space kept) otherwise. An empty body shows a
//! placeholder instead and the indicator is [`Visibility::Collapsed`].

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::Serialize;

use crate::category::CategorySet;
use crate::excerpt::{locate_in_note, Excerpt, MatchLocation, DEFAULT_CONTEXT_CHARS};
use crate::query::SearchFilter;
use crate::types::{Note, NoteId};

/// Display title for notes whose stored title is empty.
pub const UNTITLED: &str = "untitled";

/// Shown in place of the preview when the body is empty.
pub const NO_CONTENT: &str = "no content";

pub const DEFAULT_WRAP_WIDTH: usize = 30;
pub const DEFAULT_PREVIEW_LINES: usize = 3;
pub const DEFAULT_UTC_OFFSET_SECS: i32 = 8 * 3600;
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ---------------------------------------------------------------------------
// Display model
// ---------------------------------------------------------------------------

/// Three-state visibility. `Invisible` keeps its layout space, `Collapsed`
/// does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Visible,
    Invisible,
    Collapsed,
}

impl Visibility {
    pub fn is_visible(self) -> bool {
        self == Visibility::Visible
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentPreview {
    /// Up to `preview_lines` wrapped chunks. Empty for an empty body.
    pub lines: Vec<String>,
    pub ellipsis: Visibility,
    /// [`NO_CONTENT`] when the body is empty.
    pub placeholder: Option<&'static str>,
    /// Preview lines are drawn underlined; the placeholder is not.
    pub underlined: bool,
}

/// Where the keyword was found plus the highlighted snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchAnnotation {
    pub location: MatchLocation,
    /// "match in title" / "match in content, line N".
    pub label: String,
    pub excerpt: Excerpt,
}

/// Everything a front end needs to draw one result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayModel {
    pub id: NoteId,
    /// Stored title, or [`UNTITLED`] when it is empty.
    pub title: String,
    pub untitled: bool,
    pub preview: ContentPreview,
    pub annotation: Option<MatchAnnotation>,
    pub created: String,
    pub modified: String,
    pub category: String,
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectorOptions {
    pub wrap_width: usize,
    pub preview_lines: usize,
    pub context_chars: usize,
    pub utc_offset: FixedOffset,
    pub timestamp_format: String,
}

impl Default for ProjectorOptions {
    fn default() -> Self {
        Self {
            wrap_width: DEFAULT_WRAP_WIDTH,
            preview_lines: DEFAULT_PREVIEW_LINES,
            context_chars: DEFAULT_CONTEXT_CHARS,
            utc_offset: FixedOffset::east_opt(DEFAULT_UTC_OFFSET_SECS).unwrap_or(Utc.fix()),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Projector
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ResultProjector {
    options: ProjectorOptions,
    categories: CategorySet,
}

impl ResultProjector {
    pub fn new(options: ProjectorOptions, categories: CategorySet) -> Self {
        Self { options, categories }
    }

    pub fn options(&self) -> &ProjectorOptions {
        &self.options
    }

    pub fn project(&self, note: &Note, filter: &SearchFilter) -> DisplayModel {
        let opts = &self.options;
        let untitled = note.title.is_empty();

        DisplayModel {
            id: note.id,
            title: if untitled {
                UNTITLED.to_string()
            } else {
                note.title.clone()
            },
            untitled,
            preview: preview(&note.body, opts.wrap_width, opts.preview_lines),
            annotation: filter
                .active_query()
                .and_then(|q| annotate(note, q, opts.context_chars)),
            created: format_timestamp(note.created_at, opts.utc_offset, &opts.timestamp_format),
            modified: format_timestamp(note.modified_at, opts.utc_offset, &opts.timestamp_format),
            category: note
                .category
                .clone()
                .unwrap_or_else(|| self.categories.default_label().to_string()),
        }
    }
}

fn annotate(note: &Note, query: &str, context: usize) -> Option<MatchAnnotation> {
    if note.title.is_empty() && note.body.is_empty() {
        return None;
    }
    let found = locate_in_note(&note.title, &note.body, query, context);
    let label = match found.location {
        MatchLocation::None => return None,
        MatchLocation::Title => "match in title".to_string(),
        MatchLocation::Content { line } => format!("match in content, line {line}"),
    };
    found.excerpt.map(|excerpt| MatchAnnotation {
        location: found.location,
        label,
        excerpt,
    })
}

// ---------------------------------------------------------------------------
// Pure helpers
// ---------------------------------------------------------------------------

/// Cut `line` into chunks of at most `width` characters.
///
/// An empty line yields no chunks. A `width` of 0 is treated as 1.
pub fn wrap_fixed(line: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let chars: Vec<char> = line.chars().collect();
    chars.chunks(width).map(|c| c.iter().collect()).collect()
}

/// Build the content preview for `body`.
pub fn preview(body: &str, width: usize, max_lines: usize) -> ContentPreview {
    if body.is_empty() {
        return ContentPreview {
            lines: Vec::new(),
            ellipsis: Visibility::Collapsed,
            placeholder: Some(NO_CONTENT),
            underlined: false,
        };
    }

    let mut chunks = body.split('\n').flat_map(|line| wrap_fixed(line, width));
    let lines: Vec<String> = chunks.by_ref().take(max_lines).collect();
    let truncated = chunks.next().is_some();

    ContentPreview {
        lines,
        ellipsis: if truncated {
            Visibility::Visible
        } else {
            Visibility::Invisible
        },
        placeholder: None,
        underlined: true,
    }
}

/// Format `ts` in a fixed offset. No locale is consulted.
///
/// A format chrono cannot render falls back to [`DEFAULT_TIMESTAMP_FORMAT`]
/// instead of failing; configuration loading rejects such formats up front
/// (see [`is_valid_timestamp_format`]).
pub fn format_timestamp(ts: DateTime<Utc>, offset: FixedOffset, format: &str) -> String {
    let local = ts.with_timezone(&offset);
    let mut out = String::new();
    if write!(out, "{}", local.format(format)).is_err() {
        tracing::warn!(format, "project: unrenderable timestamp format, using default");
        out.clear();
        out.push_str(&local.format(DEFAULT_TIMESTAMP_FORMAT).to_string());
    }
    out
}

/// Whether every specifier in `format` is one chrono understands.
pub fn is_valid_timestamp_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn note(title: &str, body: &str) -> Note {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 16, 30, 0).unwrap();
        Note {
            id: NoteId(1),
            title: title.to_string(),
            body: body.to_string(),
            category: Some("工作".to_string()),
            created_at: ts,
            modified_at: ts,
        }
    }

    #[rstest]
    #[case("", 30, 0)]
    #[case("abc", 30, 1)]
    #[case(&"x".repeat(30), 30, 1)]
    #[case(&"x".repeat(31), 30, 2)]
    #[case(&"x".repeat(90), 30, 3)]
    #[case("abcdef", 0, 6)]
    fn wrap_chunk_counts(#[case] line: &str, #[case] width: usize, #[case] chunks: usize) {
        assert_eq!(wrap_fixed(line, width).len(), chunks);
    }

    #[test]
    fn wrap_is_a_hard_character_cut() {
        assert_eq!(wrap_fixed("hello world", 4), vec!["hell", "o wo", "rld"]);
        assert_eq!(wrap_fixed("一二三四五", 2), vec!["一二", "三四", "五"]);
    }

    #[test]
    fn four_chunks_show_three_and_ellipsis() {
        let body = "a".repeat(120);
        let p = preview(&body, 30, 3);
        assert_eq!(p.lines, vec!["a".repeat(30); 3]);
        assert_eq!(p.ellipsis, Visibility::Visible);
        assert!(p.underlined);
    }

    #[test]
    fn exactly_three_chunks_hide_but_reserve_ellipsis() {
        let p = preview("one\ntwo\nthree", 30, 3);
        assert_eq!(p.lines, vec!["one", "two", "three"]);
        assert_eq!(p.ellipsis, Visibility::Invisible);
    }

    #[test]
    fn blank_lines_produce_no_chunks() {
        let p = preview("one\n\n\ntwo\n", 30, 3);
        assert_eq!(p.lines, vec!["one", "two"]);
        assert_eq!(p.ellipsis, Visibility::Invisible);
    }

    #[test]
    fn empty_body_shows_placeholder() {
        let p = preview("", 30, 3);
        assert!(p.lines.is_empty());
        assert_eq!(p.placeholder, Some(NO_CONTENT));
        assert!(!p.underlined);
        assert_eq!(p.ellipsis, Visibility::Collapsed);
    }

    #[test]
    fn timestamps_use_fixed_offset() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 16, 30, 5).unwrap();
        let cst = FixedOffset::east_opt(8 * 3600).unwrap();
        assert_eq!(format_timestamp(ts, cst, DEFAULT_TIMESTAMP_FORMAT), "2024-01-16 00:30:05");
        assert_eq!(
            format_timestamp(ts, Utc.fix(), DEFAULT_TIMESTAMP_FORMAT),
            "2024-01-15 16:30:05"
        );
    }

    #[test]
    fn unrenderable_format_falls_back_to_default() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 16, 30, 5).unwrap();
        assert!(!is_valid_timestamp_format("%Y-%Q"));
        assert!(is_valid_timestamp_format(DEFAULT_TIMESTAMP_FORMAT));
        assert_eq!(format_timestamp(ts, Utc.fix(), "%Y-%Q"), "2024-01-15 16:30:05");
    }

    #[test]
    fn untitled_fallback_is_display_only() {
        let n = note("", "body");
        let m = ResultProjector::default().project(&n, &SearchFilter::all());
        assert_eq!(m.title, UNTITLED);
        assert!(m.untitled);
        assert_eq!(n.title, "");
    }

    #[test]
    fn missing_category_shows_default_label() {
        let mut n = note("t", "b");
        n.category = None;
        let m = ResultProjector::default().project(&n, &SearchFilter::all());
        assert_eq!(m.category, "默认");
    }

    #[test]
    fn no_query_no_annotation() {
        let m = ResultProjector::default().project(&note("Q3", "Q3"), &SearchFilter::all());
        assert_eq!(m.annotation, None);
    }

    #[test]
    fn title_match_label() {
        let filter = SearchFilter::all().with_query("Q3");
        let m = ResultProjector::default()
            .project(&note("Meeting notes for Q3 planning session", ""), &filter);
        let a = m.annotation.unwrap();
        assert_eq!(a.location, MatchLocation::Title);
        assert_eq!(a.label, "match in title");
        assert_eq!(a.excerpt.highlighted(), "Q3");
    }

    #[test]
    fn content_match_label_carries_line() {
        let filter = SearchFilter::all().with_query("bar");
        let m = ResultProjector::default().project(&note("t", "hello world\nfoo bar baz"), &filter);
        let a = m.annotation.unwrap();
        assert_eq!(a.location, MatchLocation::Content { line: 2 });
        assert_eq!(a.label, "match in content, line 2");
        assert_eq!(a.excerpt.text, "foo bar baz");
        assert_eq!((a.excerpt.highlight_start, a.excerpt.highlight_end), (4, 7));
    }

    #[test]
    fn row_without_match_has_no_annotation() {
        let filter = SearchFilter::all().with_query("absent");
        let m = ResultProjector::default().project(&note("t", "b"), &filter);
        assert_eq!(m.annotation, None);
    }

    #[test]
    fn timestamps_are_formatted_in_model() {
        let m = ResultProjector::default().project(&note("t", ""), &SearchFilter::all());
        assert_eq!(m.created, "2024-01-16 00:30:00");
        assert_eq!(m.modified, m.created);
    }
}
