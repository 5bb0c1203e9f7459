//! Store: the persistence collaborator behind the query engine.
//!
//! The core never talks SQL directly; it hands a composed
//! [`Predicate`](crate::query::Predicate) to a [`NoteStore`] and receives a
//! finite, already-ordered `Vec<Note>`. Two implementations ship:
//!
//! - [`SqliteStore`]: the on-disk store used by the binary;
//! - [`MemoryStore`]: evaluates predicates in process, used by tests and
//!   benches.
//!
//! All calls are synchronous and run to completion on the caller's thread.

use std::collections::HashMap;

use crate::error::StoreResult;
use crate::query::Predicate;
use crate::types::{NewNote, Note, NoteId, NoteUpdate};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Persistence operations the core relies on.
pub trait NoteStore {
    /// Insert a row and return its freshly assigned id.
    fn insert(&mut self, note: &NewNote) -> StoreResult<NoteId>;

    /// Replace the mutable fields of `id`. Returns the number of rows
    /// affected (0 when the id does not exist).
    fn update(&mut self, id: NoteId, update: &NoteUpdate) -> StoreResult<usize>;

    /// Hard-delete `id`. Returns the number of rows affected.
    fn delete(&mut self, id: NoteId) -> StoreResult<usize>;

    fn get(&self, id: NoteId) -> StoreResult<Option<Note>>;

    /// All rows matching `predicate`, ordered by
    /// [`ORDER_BY`](crate::query::ORDER_BY).
    fn query(&self, predicate: &Predicate) -> StoreResult<Vec<Note>>;

    /// Row counts grouped by raw category value. NULL categories are
    /// omitted.
    ///
    /// `Ok(None)` means the store has no grouped count; callers fall back
    /// to counting over [`query`](Self::query).
    fn aggregate_categories(&self) -> StoreResult<Option<HashMap<String, u64>>> {
        Ok(None)
    }
}
