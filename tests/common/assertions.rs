//! Domain-specific assertion macros for memo harnesses.
//!
//! These wrap `pretty_assertions` and add failure messages that name the
//! broken property.

/// Assert that a result list is in the fixed order: `modified_at` descending,
/// then id descending.
///
/// ```rust
/// assert_result_order!(notes);
/// ```
#[macro_export]
macro_rules! assert_result_order {
    ($notes:expr) => {{
        let notes: &[memo_core::Note] = &$notes;
        for pair in notes.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let ordered = a.modified_at > b.modified_at
                || (a.modified_at == b.modified_at && a.id > b.id);
            if !ordered {
                panic!(
                    "assert_result_order! failed:\n  #{} (modified {}) listed before\n  #{} (modified {})",
                    a.id, a.modified_at, b.id, b.modified_at
                );
            }
        }
    }};
}

/// Assert the ids of a result list, in order.
///
/// ```rust
/// assert_ids!(notes, [3, 1]);
/// ```
#[macro_export]
macro_rules! assert_ids {
    ($notes:expr, [$($id:expr),* $(,)?]) => {{
        let actual: Vec<i64> = $notes.iter().map(|n| n.id.0).collect();
        let expected: Vec<i64> = vec![$($id),*];
        pretty_assertions::assert_eq!(actual, expected, "result ids differ");
    }};
}

/// Assert an excerpt's text and highlight span, and that the span covers
/// exactly `query`.
///
/// ```rust
/// assert_excerpt!(excerpt, "foo bar baz", (4, 7), "bar");
/// ```
#[macro_export]
macro_rules! assert_excerpt {
    ($excerpt:expr, $text:expr, ($start:expr, $end:expr), $query:expr) => {{
        let excerpt: &memo_core::excerpt::Excerpt = &$excerpt;
        pretty_assertions::assert_eq!(excerpt.text, $text, "excerpt text");
        pretty_assertions::assert_eq!(
            (excerpt.highlight_start, excerpt.highlight_end),
            ($start, $end),
            "highlight span"
        );
        pretty_assertions::assert_eq!(excerpt.highlighted(), $query, "highlighted substring");
    }};
}
