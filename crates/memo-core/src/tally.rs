//! Category tally: per-category note counts for the category picker.
//!
//! Every known category gets a bucket, zero-filled. Rows whose category is
//! NULL or outside the known set are not counted anywhere, and that
//! includes the [`ALL`] total: "all" is the sum of the known buckets, not a
//! raw row count.
//!
//! Counts are advisory. A store failure degrades to the zero baseline and is
//! logged, never returned.

use serde::Serialize;

use crate::category::{CategorySet, ALL};
use crate::query::Predicate;
use crate::store::NoteStore;
use crate::types::Note;

/// Ordered per-category counts plus the derived total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    buckets: Vec<(String, u64)>,
}

impl CategoryCounts {
    /// Every known category at zero.
    pub fn zeroed(known: &CategorySet) -> Self {
        Self {
            buckets: known.iter().map(|c| (c.to_string(), 0)).collect(),
        }
    }

    /// Count for a category label. [`ALL`] returns the total; labels outside
    /// the known set return `None`.
    pub fn get(&self, label: &str) -> Option<u64> {
        if label == ALL {
            return Some(self.all());
        }
        self.buckets
            .iter()
            .find(|(c, _)| c == label)
            .map(|(_, n)| *n)
    }

    /// Sum of the known-category buckets.
    pub fn all(&self) -> u64 {
        self.buckets.iter().map(|(_, n)| n).sum()
    }

    /// Buckets in category-set order, without the total.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.buckets.iter().map(|(c, n)| (c.as_str(), *n))
    }

    /// Add `n` to `label`'s bucket. Returns false when `label` is unknown.
    fn add(&mut self, label: &str, n: u64) -> bool {
        match self.buckets.iter_mut().find(|(c, _)| c == label) {
            Some((_, count)) => {
                *count += n;
                true
            }
            None => false,
        }
    }
}

/// Count `rows` into the buckets of `known`.
pub fn tally<'a, I>(rows: I, known: &CategorySet) -> CategoryCounts
where
    I: IntoIterator<Item = &'a Note>,
{
    let mut counts = CategoryCounts::zeroed(known);
    let mut ignored = 0usize;
    for note in rows {
        let counted = note
            .category
            .as_deref()
            .is_some_and(|c| counts.add(c, 1));
        if !counted {
            ignored += 1;
        }
    }
    if ignored > 0 {
        tracing::debug!(ignored, "tally: rows outside the known category set");
    }
    counts
}

/// Tally straight from a store.
///
/// Uses the store's grouped aggregate when it has one and falls back to
/// counting every row otherwise. Any store error yields the zero baseline.
pub fn tally_store(store: &dyn NoteStore, known: &CategorySet) -> CategoryCounts {
    match store.aggregate_categories() {
        Ok(Some(grouped)) => {
            let mut counts = CategoryCounts::zeroed(known);
            for (category, n) in &grouped {
                counts.add(category, *n);
            }
            counts
        }
        Ok(None) => match store.query(&Predicate::match_all()) {
            Ok(rows) => tally(&rows, known),
            Err(e) => {
                tracing::warn!(error = %e, "tally: store query failed, reporting zero counts");
                CategoryCounts::zeroed(known)
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "tally: aggregate failed, reporting zero counts");
            CategoryCounts::zeroed(known)
        }
    }
}
