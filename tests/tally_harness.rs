//! Category tally integration harness.
//!
//! # What this covers
//!
//! - **Zero fill**: every known category is present, even without rows.
//! - **Exclusion**: NULL and unknown categories count nowhere, not even in
//!   the total.
//! - **Degradation**: a failing store yields the zero baseline on both the
//!   aggregate path and the fallback path.
//! - **Agreement**: SQLite's grouped aggregate equals the in-process
//!   fallback used by the memory store.
//!
//! # Running
//!
//! ```sh
//! cargo test --test tally_harness
//! ```

mod common;
use common::*;

use memo_core::store::{MemoryStore, NoteStore};
use memo_core::tally::{tally, tally_store, CategoryCounts};
use memo_core::{CategorySet, ALL};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn builtin() -> CategorySet {
    CategorySet::builtin()
}

// ---------------------------------------------------------------------------
// Worked example
// ---------------------------------------------------------------------------

/// Two 工作, one 生活, one unknown: the unknown row reaches neither a bucket
/// nor the total.
#[test]
fn unknown_row_is_excluded_from_total() {
    let known = CategorySet::new(["工作", "生活"]);
    let rows: Vec<_> = ["工作", "工作", "生活", "???"]
        .iter()
        .enumerate()
        .map(|(i, c)| NoteBuilder::new("").category(*c).build(i as i64 + 1))
        .collect();

    let counts = tally(&rows, &known);
    assert_eq!(counts.get("工作"), Some(2));
    assert_eq!(counts.get("生活"), Some(1));
    assert_eq!(counts.get(ALL), Some(3));
    assert_eq!(counts.get("???"), None);
}

// ---------------------------------------------------------------------------
// Store paths
// ---------------------------------------------------------------------------

#[test]
fn empty_store_is_all_zero() {
    let counts = tally_store(&MemoryStore::new(), &builtin());
    assert_eq!(counts, CategoryCounts::zeroed(&builtin()));
    assert_eq!(counts.iter().count(), builtin().len());
}

#[test]
fn corpus_counts_on_both_paths() {
    let (memory, sqlite) = twin_stores(&mixed_corpus());

    let fallback = tally_store(&memory, &builtin());
    let grouped = tally_store(&sqlite, &builtin());
    assert_eq!(fallback, grouped);

    assert_eq!(
        grouped.iter().collect::<Vec<_>>(),
        vec![
            ("默认", 0),
            ("工作", 3),
            ("行程", 0),
            ("学习", 1),
            ("灵感", 1),
            ("生活", 1),
            ("其他", 0),
        ]
    );
    // 8 rows, one NULL and one "???"
    assert_eq!(grouped.all(), 6);
}

#[test]
fn sqlite_has_a_grouped_aggregate_and_memory_does_not() {
    let (memory, sqlite) = twin_stores(&mixed_corpus());
    assert_eq!(memory.aggregate_categories().unwrap(), None);

    let grouped = sqlite.aggregate_categories().unwrap().unwrap();
    assert_eq!(grouped.get("工作"), Some(&3));
    assert_eq!(grouped.get("???"), Some(&1));
    assert_eq!(grouped.values().sum::<u64>(), 7);
}

#[test]
fn failing_aggregate_yields_zeros() {
    assert_eq!(tally_store(&FailingStore, &builtin()), CategoryCounts::zeroed(&builtin()));
}

#[test]
fn failing_fallback_query_yields_zeros() {
    assert_eq!(
        tally_store(&FailingQueryStore, &builtin()),
        CategoryCounts::zeroed(&builtin())
    );
}

#[test]
fn counts_follow_deletes() {
    let mut store = MemoryStore::new();
    let ids = seed(
        &mut store,
        &[
            NoteBuilder::new("a").category("学习"),
            NoteBuilder::new("b").category("学习"),
        ],
    );
    store.delete(ids[0]).unwrap();
    assert_eq!(tally_store(&store, &builtin()).get("学习"), Some(1));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn category_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        4 => prop::sample::select(memo_core::category::BUILTIN.to_vec())
            .prop_map(|c| Some(c.to_string())),
        1 => Just(None),
        1 => "[a-z?]{1,3}".prop_map(Some),
    ]
}

proptest! {
    #[test]
    fn prop_total_is_sum_of_buckets(categories in prop::collection::vec(category_strategy(), 0..40)) {
        let known = builtin();
        let rows: Vec<_> = categories
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let b = NoteBuilder::new("");
                let b = match c {
                    Some(c) => b.category(c.clone()),
                    None => b.uncategorised(),
                };
                b.build(i as i64 + 1)
            })
            .collect();

        let counts = tally(&rows, &known);
        prop_assert_eq!(counts.all(), counts.iter().map(|(_, n)| n).sum::<u64>());

        let expected = categories
            .iter()
            .filter(|c| c.as_deref().is_some_and(|c| known.contains(c)))
            .count() as u64;
        prop_assert_eq!(counts.all(), expected);
    }

    #[test]
    fn prop_sqlite_aggregate_matches_fallback(categories in prop::collection::vec(category_strategy(), 0..20)) {
        let builders: Vec<_> = categories
            .into_iter()
            .map(|c| match c {
                Some(c) => NoteBuilder::new("").category(c),
                None => NoteBuilder::new("").uncategorised(),
            })
            .collect();
        let (memory, sqlite) = twin_stores(&builders);
        prop_assert_eq!(tally_store(&memory, &builtin()), tally_store(&sqlite, &builtin()));
    }
}
