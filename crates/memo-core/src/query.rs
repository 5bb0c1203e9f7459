//! Query composer: turns a [`SearchFilter`] into one predicate plus an
//! ordered parameter list.
//!
//! Two independent predicates are combined:
//!
//! - category equality, active when a category other than [`ALL`] is set;
//! - keyword containment over title OR body, active when the query is
//!   non-empty.
//!
//! When both are active they are joined with AND, category first. Parameters
//! are positional: the category value precedes the two copies of the query.
//! A mis-ordered parameter list does not fail, it silently returns the wrong
//! rows, so [`Predicate`] is the only way to obtain one.
//!
//! Containment is exact and case-sensitive. The SQL form uses
//! `instr(field, ?) > 0` so no character in the query acts as a wildcard.

use crate::category::ALL;
use crate::types::Note;

/// Fixed result ordering shared by every store: most recently modified
/// first, ties broken by id descending.
pub const ORDER_BY: &str = "modified_at DESC, id DESC";

// ---------------------------------------------------------------------------
// SearchFilter
// ---------------------------------------------------------------------------

/// Immutable description of what the user is looking for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    /// `None` (or [`ALL`]) places no category restriction.
    pub category: Option<String>,
    /// `None` or empty places no text restriction.
    pub query: Option<String>,
}

impl SearchFilter {
    /// A filter that matches every note.
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a filter from the category picker and the raw search box text.
    ///
    /// The query is trimmed; a blank query or the [`ALL`] label disables the
    /// corresponding predicate.
    pub fn from_input(category: &str, raw_query: &str) -> Self {
        let query = raw_query.trim();
        Self {
            category: (!category.is_empty() && category != ALL).then(|| category.to_string()),
            query: (!query.is_empty()).then(|| query.to_string()),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// The category restriction, if one is in effect.
    pub fn active_category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| *c != ALL)
    }

    /// The keyword restriction, if one is in effect.
    pub fn active_query(&self) -> Option<&str> {
        self.query.as_deref().filter(|q| !q.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Predicate
// ---------------------------------------------------------------------------

/// One conjunct of a composed predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clause {
    /// `category = ?`, one parameter.
    CategoryEq,
    /// `instr(title, ?) > 0 OR instr(body, ?) > 0`, two parameters.
    TextContains,
}

impl Clause {
    /// Number of positional parameters this clause binds.
    pub fn arity(self) -> usize {
        match self {
            Clause::CategoryEq => 1,
            Clause::TextContains => 2,
        }
    }

    fn sql(self) -> &'static str {
        match self {
            Clause::CategoryEq => "category = ?",
            Clause::TextContains => "instr(title, ?) > 0 OR instr(body, ?) > 0",
        }
    }
}

/// A composed filter: ordered clauses plus the parameters they bind, in
/// placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    clauses: Vec<Clause>,
    params: Vec<String>,
}

impl Predicate {
    /// The identity predicate.
    pub fn match_all() -> Self {
        Self {
            clauses: Vec::new(),
            params: Vec::new(),
        }
    }

    pub fn is_match_all(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Parameters in the order their placeholders appear in [`sql`](Self::sql).
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Render the predicate as a SQL boolean expression with `?` placeholders.
    ///
    /// The identity predicate renders as `TRUE`. A lone keyword clause is
    /// left bare; next to another clause it is parenthesised.
    pub fn sql(&self) -> String {
        match self.clauses.as_slice() {
            [] => "TRUE".to_string(),
            [only] => only.sql().to_string(),
            many => many
                .iter()
                .map(|c| match c {
                    Clause::TextContains => format!("({})", c.sql()),
                    Clause::CategoryEq => c.sql().to_string(),
                })
                .collect::<Vec<_>>()
                .join(" AND "),
        }
    }

    /// Number of `?` placeholders in [`sql`](Self::sql).
    pub fn placeholder_count(&self) -> usize {
        self.clauses.iter().map(|c| c.arity()).sum()
    }

    /// Evaluate the predicate against a note in memory.
    ///
    /// Parameters are consumed positionally, exactly as a SQL backend binds
    /// them, so this shares the ordering contract of [`sql`](Self::sql).
    pub fn matches(&self, note: &Note) -> bool {
        let mut params = self.params.iter().map(String::as_str);
        self.clauses.iter().all(|clause| match clause {
            Clause::CategoryEq => match params.next() {
                Some(category) => note.category.as_deref() == Some(category),
                None => false,
            },
            Clause::TextContains => match (params.next(), params.next()) {
                (Some(in_title), Some(in_body)) => {
                    note.title.contains(in_title) || note.body.contains(in_body)
                }
                _ => false,
            },
        })
    }
}

/// Compose a filter into a single predicate.
pub fn compose(filter: &SearchFilter) -> Predicate {
    let mut clauses = Vec::with_capacity(2);
    let mut params = Vec::with_capacity(3);

    if let Some(category) = filter.active_category() {
        clauses.push(Clause::CategoryEq);
        params.push(category.to_string());
    }

    if let Some(query) = filter.active_query() {
        clauses.push(Clause::TextContains);
        params.push(query.to_string());
        params.push(query.to_string());
    }

    let predicate = Predicate { clauses, params };
    tracing::debug!(
        sql = %predicate.sql(),
        params = predicate.params.len(),
        "query: composed predicate"
    );
    predicate
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::types::NoteId;

    fn note(title: &str, body: &str, category: Option<&str>) -> Note {
        let now = Utc::now();
        Note {
            id: NoteId(1),
            title: title.to_string(),
            body: body.to_string(),
            category: category.map(str::to_string),
            created_at: now,
            modified_at: now,
        }
    }

    #[test]
    fn empty_filter_is_match_all() {
        let p = compose(&SearchFilter::all());
        assert!(p.is_match_all());
        assert_eq!(p.sql(), "TRUE");
        assert!(p.params().is_empty());
        assert!(p.matches(&note("", "", None)));
    }

    #[test]
    fn category_only() {
        let p = compose(&SearchFilter::all().with_category("学习"));
        assert_eq!(p.sql(), "category = ?");
        assert_eq!(p.params(), ["学习".to_string()]);
    }

    #[test]
    fn query_only() {
        let p = compose(&SearchFilter::all().with_query("bar"));
        assert_eq!(p.sql(), "instr(title, ?) > 0 OR instr(body, ?) > 0");
        assert_eq!(p.params(), ["bar".to_string(), "bar".to_string()]);
    }

    #[test]
    fn category_then_query_group() {
        let p = compose(&SearchFilter::all().with_category("工作").with_query("Q3"));
        assert_eq!(
            p.sql(),
            "category = ? AND (instr(title, ?) > 0 OR instr(body, ?) > 0)"
        );
        assert_eq!(p.params(), ["工作", "Q3", "Q3"].map(String::from));
    }

    #[rstest]
    #[case(None, None, 0)]
    #[case(Some("工作"), None, 1)]
    #[case(None, Some("x"), 2)]
    #[case(Some("工作"), Some("x"), 3)]
    #[case(Some(ALL), Some("x"), 2)]
    #[case(Some("工作"), Some(""), 1)]
    fn placeholders_match_params(
        #[case] category: Option<&str>,
        #[case] query: Option<&str>,
        #[case] expected: usize,
    ) {
        let filter = SearchFilter {
            category: category.map(str::to_string),
            query: query.map(str::to_string),
        };
        let p = compose(&filter);
        assert_eq!(p.params().len(), expected);
        assert_eq!(p.placeholder_count(), expected);
        assert_eq!(p.sql().matches('?').count(), expected);
    }

    #[test]
    fn all_sentinel_is_not_a_restriction() {
        let p = compose(&SearchFilter::all().with_category(ALL));
        assert!(p.is_match_all());
    }

    #[test]
    fn from_input_trims_and_maps_sentinel() {
        let f = SearchFilter::from_input(ALL, "  bar \n");
        assert_eq!(f.category, None);
        assert_eq!(f.query.as_deref(), Some("bar"));

        let f = SearchFilter::from_input("生活", "   ");
        assert_eq!(f.category.as_deref(), Some("生活"));
        assert_eq!(f.query, None);
    }

    #[test]
    fn matching_is_case_sensitive_substring() {
        let p = compose(&SearchFilter::all().with_query("Bar"));
        assert!(p.matches(&note("", "foo Bar", None)));
        assert!(!p.matches(&note("", "foo bar", None)));
        assert!(p.matches(&note("xBarx", "", None)));
    }

    #[test]
    fn wildcard_characters_are_literal() {
        let p = compose(&SearchFilter::all().with_query("50%"));
        assert!(p.matches(&note("", "up 50% today", None)));
        assert!(!p.matches(&note("", "up 500 today", None)));
    }

    #[test]
    fn category_and_query_both_required() {
        let p = compose(&SearchFilter::all().with_category("工作").with_query("plan"));
        assert!(p.matches(&note("plan", "", Some("工作"))));
        assert!(!p.matches(&note("plan", "", Some("生活"))));
        assert!(!p.matches(&note("other", "", Some("工作"))));
        assert!(!p.matches(&note("plan", "", None)));
    }

    #[test]
    fn unknown_category_is_a_literal_value() {
        let p = compose(&SearchFilter::all().with_category("???"));
        assert_eq!(p.params(), ["???".to_string()]);
        assert!(!p.matches(&note("", "", Some("工作"))));
        assert!(p.matches(&note("", "", Some("???"))));
    }
}
