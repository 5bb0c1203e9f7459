//! Clocks, failing stores and note corpora shared across harnesses.

use std::cell::Cell;
use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use memo_core::error::{StoreError, StoreResult};
use memo_core::query::Predicate;
use memo_core::store::NoteStore;
use memo_core::types::{NewNote, Note, NoteId, NoteUpdate};
use memo_core::Clock;

use super::builders::NoteBuilder;

// ---------------------------------------------------------------------------
// Clocks
// ---------------------------------------------------------------------------

/// Always returns the same instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Advances one second on every reading.
pub struct StepClock {
    next: Cell<i64>,
}

impl StepClock {
    pub fn starting_at(secs: i64) -> Self {
        Self { next: Cell::new(secs) }
    }
}

impl Clock for StepClock {
    fn now(&self) -> DateTime<Utc> {
        let secs = self.next.get();
        self.next.set(secs + 1);
        Utc.timestamp_opt(secs, 0).unwrap()
    }
}

// ---------------------------------------------------------------------------
// Failing stores
// ---------------------------------------------------------------------------

/// Every operation fails with [`StoreError::Unavailable`].
pub struct FailingStore;

fn unavailable<T>() -> StoreResult<T> {
    Err(StoreError::Unavailable("disk ejected".to_string()))
}

impl NoteStore for FailingStore {
    fn insert(&mut self, _: &NewNote) -> StoreResult<NoteId> {
        unavailable()
    }
    fn update(&mut self, _: NoteId, _: &NoteUpdate) -> StoreResult<usize> {
        unavailable()
    }
    fn delete(&mut self, _: NoteId) -> StoreResult<usize> {
        unavailable()
    }
    fn get(&self, _: NoteId) -> StoreResult<Option<Note>> {
        unavailable()
    }
    fn query(&self, _: &Predicate) -> StoreResult<Vec<Note>> {
        unavailable()
    }
    fn aggregate_categories(&self) -> StoreResult<Option<HashMap<String, u64>>> {
        unavailable()
    }
}

/// Has no grouped aggregate and fails on query, so the tally fallback path
/// hits the error.
pub struct FailingQueryStore;

impl NoteStore for FailingQueryStore {
    fn insert(&mut self, _: &NewNote) -> StoreResult<NoteId> {
        unavailable()
    }
    fn update(&mut self, _: NoteId, _: &NoteUpdate) -> StoreResult<usize> {
        unavailable()
    }
    fn delete(&mut self, _: NoteId) -> StoreResult<usize> {
        unavailable()
    }
    fn get(&self, _: NoteId) -> StoreResult<Option<Note>> {
        unavailable()
    }
    fn query(&self, _: &Predicate) -> StoreResult<Vec<Note>> {
        unavailable()
    }
}

// ---------------------------------------------------------------------------
// Corpora
// ---------------------------------------------------------------------------

/// A small mixed notebook: several categories, a NULL category, an unknown
/// category, CJK text, multi-line bodies and a modified-time tie.
pub fn mixed_corpus() -> Vec<NoteBuilder> {
    vec![
        NoteBuilder::new("Meeting notes for Q3 planning session")
            .body("agenda\nstaffing for Q3\nbudget")
            .category("工作")
            .at(100),
        NoteBuilder::new("groceries")
            .body("milk\neggs\nQ3 cheese")
            .category("生活")
            .at(200),
        NoteBuilder::new("")
            .body("hello world\nfoo bar baz")
            .category("工作")
            .at(300),
        NoteBuilder::new("会议记录")
            .body("今天的会议讨论了第三季度计划安排")
            .category("工作")
            .at(300),
        NoteBuilder::new("legacy row").body("no category column").uncategorised().at(50),
        NoteBuilder::new("imported").body("from another tool").category("???").at(400),
        NoteBuilder::new("Reading list").category("学习").at(150).modified(500),
        NoteBuilder::new("empty body Q3").category("灵感").at(250),
    ]
}

/// Queries worth running against [`mixed_corpus`].
pub const CORPUS_QUERIES: &[&str] = &["Q3", "q3", "bar", "会议", "o", "%", "_", "\n", "absent"];
