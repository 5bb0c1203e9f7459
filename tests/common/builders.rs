//! Test builders: ergonomic constructors for notes and notebooks.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use chrono::{DateTime, TimeZone, Utc};
use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::Fake;
use memo_core::store::{MemoryStore, NoteStore, SqliteStore};
use memo_core::types::{NewNote, Note, NoteId};
use memo_core::{CategorySet, Notebook, ResultProjector};

use super::fixtures::StepClock;

/// Seconds-since-epoch to a UTC instant.
pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

// ---------------------------------------------------------------------------
// NoteBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for note fixtures.
///
/// # Example
///
/// ```rust
/// let id = NoteBuilder::new("Q3 planning")
///     .body("agenda\nstaffing")
///     .category("工作")
///     .at(1_700_000_000)
///     .insert_into(&mut store);
/// ```
#[derive(Debug, Clone)]
pub struct NoteBuilder {
    title: String,
    body: String,
    category: Option<String>,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

impl NoteBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: String::new(),
            category: Some("默认".to_string()),
            created_at: at(1_700_000_000),
            modified_at: at(1_700_000_000),
        }
    }

    /// A note with lorem-ipsum title and body.
    pub fn fake() -> Self {
        let title: String = Sentence(2..6).fake();
        let body: String = Paragraph(1..4).fake();
        Self::new(title).body(body)
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Store NULL in the category column.
    pub fn uncategorised(mut self) -> Self {
        self.category = None;
        self
    }

    /// Set both timestamps.
    pub fn at(mut self, secs: i64) -> Self {
        self.created_at = at(secs);
        self.modified_at = at(secs);
        self
    }

    pub fn modified(mut self, secs: i64) -> Self {
        self.modified_at = at(secs);
        self
    }

    pub fn build_new(&self) -> NewNote {
        NewNote {
            title: self.title.clone(),
            body: self.body.clone(),
            category: self.category.clone(),
            created_at: self.created_at,
            modified_at: self.modified_at,
        }
    }

    pub fn build(&self, id: i64) -> Note {
        Note {
            id: NoteId(id),
            title: self.title.clone(),
            body: self.body.clone(),
            category: self.category.clone(),
            created_at: self.created_at,
            modified_at: self.modified_at,
        }
    }

    pub fn insert_into(&self, store: &mut dyn NoteStore) -> NoteId {
        store.insert(&self.build_new()).expect("insert fixture note")
    }
}

/// Insert every builder in order and return the assigned ids.
pub fn seed(store: &mut dyn NoteStore, notes: &[NoteBuilder]) -> Vec<NoteId> {
    notes.iter().map(|n| n.insert_into(store)).collect()
}

/// Memory and SQLite stores holding the same notes, inserted in the same
/// order.
pub fn twin_stores(notes: &[NoteBuilder]) -> (MemoryStore, SqliteStore) {
    let mut memory = MemoryStore::new();
    let mut sqlite = SqliteStore::open_in_memory().expect("in-memory sqlite");
    seed(&mut memory, notes);
    seed(&mut sqlite, notes);
    (memory, sqlite)
}

// ---------------------------------------------------------------------------
// Notebooks
// ---------------------------------------------------------------------------

/// Notebook over a [`MemoryStore`] with a stepping clock.
pub fn memory_notebook() -> Notebook {
    notebook_over(Box::new(MemoryStore::new()))
}

/// Notebook over `store` with the built-in categories, default projector and
/// a [`StepClock`].
pub fn notebook_over(store: Box<dyn NoteStore>) -> Notebook {
    Notebook::new(store, CategorySet::builtin(), ResultProjector::default())
        .with_clock(Box::new(StepClock::starting_at(1_700_000_000)))
}
