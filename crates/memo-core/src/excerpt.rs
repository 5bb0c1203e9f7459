//! Excerpt locator: finds the first match of a keyword and cuts a bounded
//! context snippet around it.
//!
//! All offsets are in characters (Unicode scalar values), never bytes, so a
//! highlight span can be applied to the excerpt with `chars()` regardless of
//! script.
//!
//! # Window
//!
//! The snippet keeps `context` characters on each side of the first match,
//! clamped to the text. `"..."` is prepended when text was cut at the start
//! and appended when text was cut at the end. The highlight span is relative
//! to the returned string, after the leading ellipsis.

use serde::Serialize;

/// Characters of context kept on each side of a match.
pub const DEFAULT_CONTEXT_CHARS: usize = 5;

/// Marker for text elided from either end of an excerpt.
pub const ELLIPSIS: &str = "...";

/// A context snippet with the span of the matched keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Excerpt {
    pub text: String,
    /// Character offset of the first highlighted character.
    pub highlight_start: usize,
    /// Character offset one past the last highlighted character.
    pub highlight_end: usize,
}

impl Excerpt {
    /// Split the excerpt into `(before, highlighted, after)`.
    pub fn parts(&self) -> (&str, &str, &str) {
        let start = byte_offset(&self.text, self.highlight_start);
        let end = byte_offset(&self.text, self.highlight_end);
        (&self.text[..start], &self.text[start..end], &self.text[end..])
    }

    /// The highlighted substring.
    pub fn highlighted(&self) -> &str {
        self.parts().1
    }
}

/// Where in a note the keyword was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum MatchLocation {
    None,
    Title,
    /// 1-based line number within the body.
    Content { line: usize },
}

/// Result of locating a keyword in a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteMatch {
    pub location: MatchLocation,
    /// Present whenever `location` is not [`MatchLocation::None`].
    pub excerpt: Option<Excerpt>,
}

impl NoteMatch {
    fn none() -> Self {
        Self {
            location: MatchLocation::None,
            excerpt: None,
        }
    }
}

/// [`locate_with`] using [`DEFAULT_CONTEXT_CHARS`].
pub fn locate(text: &str, query: &str) -> Option<Excerpt> {
    locate_with(text, query, DEFAULT_CONTEXT_CHARS)
}

/// Excerpt around the first occurrence of `query` in `text`.
///
/// Returns `None` when either input is empty or `query` does not occur.
pub fn locate_with(text: &str, query: &str, context: usize) -> Option<Excerpt> {
    if text.is_empty() || query.is_empty() {
        return None;
    }
    let byte_start = text.find(query)?;

    let match_start = text[..byte_start].chars().count();
    let match_len = query.chars().count();
    let total = text.chars().count();

    let start = match_start.saturating_sub(context);
    let end = match_start
        .saturating_add(match_len)
        .saturating_add(context)
        .min(total);

    // at most four UTF-8 bytes per kept char, plus both ellipses
    let mut excerpt = String::with_capacity((end - start) * 4 + 2 * ELLIPSIS.len());
    let mut lead = 0;
    if start > 0 {
        excerpt.push_str(ELLIPSIS);
        lead = ELLIPSIS.chars().count();
    }
    excerpt.extend(text.chars().skip(start).take(end - start));
    if end < total {
        excerpt.push_str(ELLIPSIS);
    }

    let highlight_start = lead + (match_start - start);
    Some(Excerpt {
        text: excerpt,
        highlight_start,
        highlight_end: highlight_start + match_len,
    })
}

/// First line of `text` (split on `'\n'`) that contains `query`, with its
/// 1-based line number.
pub fn locate_line<'a>(text: &'a str, query: &str) -> Option<(usize, &'a str)> {
    if text.is_empty() || query.is_empty() {
        return None;
    }
    text.split('\n')
        .enumerate()
        .find(|(_, line)| line.contains(query))
        .map(|(i, line)| (i + 1, line))
}

/// Locate `query` in a note, title first.
///
/// A title hit wins and the excerpt is cut from the title. Otherwise the
/// first body line containing the query is excerpted on its own, not the
/// whole body. A query spanning a newline can occur in the body without
/// occurring in any single line; that yields [`MatchLocation::None`].
pub fn locate_in_note(title: &str, body: &str, query: &str, context: usize) -> NoteMatch {
    if let Some(excerpt) = locate_with(title, query, context) {
        return NoteMatch {
            location: MatchLocation::Title,
            excerpt: Some(excerpt),
        };
    }

    locate_line(body, query)
        .and_then(|(line, text)| {
            locate_with(text, query, context).map(|excerpt| NoteMatch {
                location: MatchLocation::Content { line },
                excerpt: Some(excerpt),
            })
        })
        .unwrap_or_else(NoteMatch::none)
}

fn byte_offset(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn line_lookup_is_one_based() {
        let body = "hello world\nfoo bar baz";
        assert_eq!(locate_line(body, "bar"), Some((2, "foo bar baz")));
        assert_eq!(locate_line(body, "hello"), Some((1, "hello world")));
        assert_eq!(locate_line(body, "qux"), None);
    }

    #[test]
    fn window_clamped_both_sides_has_no_ellipsis() {
        let e = locate("foo bar baz", "bar").unwrap();
        assert_eq!(e.text, "foo bar baz");
        assert_eq!((e.highlight_start, e.highlight_end), (4, 7));
        assert_eq!(e.highlighted(), "bar");
    }

    #[test]
    fn ellipsis_on_both_sides() {
        let e = locate("Meeting notes for Q3 planning session", "Q3").unwrap();
        assert_eq!(e.text, "... for Q3 plan...");
        assert_eq!((e.highlight_start, e.highlight_end), (8, 10));
        assert_eq!(e.parts(), ("... for ", "Q3", " plan..."));
    }

    #[test]
    fn only_leading_ellipsis_when_match_is_near_end() {
        let e = locate("a long sentence ending in KEY", "KEY").unwrap();
        assert_eq!(e.text, "...g in KEY");
        assert_eq!(e.highlighted(), "KEY");
    }

    #[test]
    fn offsets_count_characters_not_bytes() {
        let e = locate("今天的会议讨论了第三季度计划安排", "第三季度").unwrap();
        assert_eq!(e.text, "...会议讨论了第三季度计划安排");
        assert_eq!(e.highlighted(), "第三季度");
        assert_eq!(e.highlight_start, 3 + 5);
    }

    #[test]
    fn first_occurrence_wins() {
        let e = locate("ab ab ab", "ab").unwrap();
        assert_eq!(e.highlight_start, 0);
        assert_eq!(e.text, "ab ab a...");
    }

    #[test]
    fn empty_inputs_and_misses_are_none() {
        assert_eq!(locate("", "x"), None);
        assert_eq!(locate("x", ""), None);
        assert_eq!(locate("abc", "d"), None);
        assert_eq!(locate("abc", "ABC"), None);
        assert_eq!(locate_line("", "x"), None);
        assert_eq!(locate_line("x", ""), None);
    }

    #[test]
    fn zero_context_keeps_only_the_match() {
        let e = locate_with("xxQyy", "Q", 0).unwrap();
        assert_eq!(e.text, "...Q...");
        assert_eq!(e.highlighted(), "Q");
    }

    #[test]
    fn huge_context_keeps_whole_text() {
        let e = locate_with("foo bar baz", "bar", usize::MAX).unwrap();
        assert_eq!(e.text, "foo bar baz");
        assert_eq!((e.highlight_start, e.highlight_end), (4, 7));
    }

    #[test]
    fn title_has_priority_over_body() {
        let m = locate_in_note("plan Q3", "Q3 in body", "Q3", DEFAULT_CONTEXT_CHARS);
        assert_eq!(m.location, MatchLocation::Title);
        assert_eq!(m.excerpt.unwrap().text, "plan Q3");
    }

    #[test]
    fn body_match_reports_line_and_excerpts_that_line() {
        let m = locate_in_note("title", "first\nsecond line has KEY here", "KEY", 5);
        assert_eq!(m.location, MatchLocation::Content { line: 2 });
        assert_eq!(m.excerpt.unwrap().text, "... has KEY here");
    }

    #[test]
    fn query_spanning_lines_has_no_location() {
        let m = locate_in_note("", "ab\ncd", "b\nc", 5);
        assert_eq!(m, NoteMatch::none());
    }

    #[test]
    fn locate_is_pure() {
        let a = locate("Meeting notes for Q3 planning session", "Q3");
        let b = locate("Meeting notes for Q3 planning session", "Q3");
        assert_eq!(a, b);
    }
}
