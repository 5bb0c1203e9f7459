//! In-process note store.
//!
//! Evaluates [`Predicate::matches`] over every row and sorts with the same
//! fixed ordering as the SQL store. It offers no grouped aggregate, so
//! tallies over a `MemoryStore` take the counting fallback.

use std::collections::BTreeMap;

use super::NoteStore;
use crate::error::StoreResult;
use crate::query::Predicate;
use crate::types::{NewNote, Note, NoteId, NoteUpdate};

#[derive(Debug, Default)]
pub struct MemoryStore {
    notes: BTreeMap<NoteId, Note>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl NoteStore for MemoryStore {
    fn insert(&mut self, note: &NewNote) -> StoreResult<NoteId> {
        self.next_id += 1;
        let id = NoteId(self.next_id);
        self.notes.insert(
            id,
            Note {
                id,
                title: note.title.clone(),
                body: note.body.clone(),
                category: note.category.clone(),
                created_at: note.created_at,
                modified_at: note.modified_at,
            },
        );
        Ok(id)
    }

    fn update(&mut self, id: NoteId, update: &NoteUpdate) -> StoreResult<usize> {
        let Some(note) = self.notes.get_mut(&id) else {
            return Ok(0);
        };
        note.title.clone_from(&update.title);
        note.body.clone_from(&update.body);
        note.category.clone_from(&update.category);
        note.modified_at = update.modified_at;
        Ok(1)
    }

    fn delete(&mut self, id: NoteId) -> StoreResult<usize> {
        Ok(usize::from(self.notes.remove(&id).is_some()))
    }

    fn get(&self, id: NoteId) -> StoreResult<Option<Note>> {
        Ok(self.notes.get(&id).cloned())
    }

    fn query(&self, predicate: &Predicate) -> StoreResult<Vec<Note>> {
        let mut hits: Vec<Note> = self
            .notes
            .values()
            .filter(|n| predicate.matches(n))
            .cloned()
            .collect();
        hits.sort_by(|a, b| {
            b.modified_at
                .cmp(&a.modified_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn new_note(title: &str, secs: i64) -> NewNote {
        let ts = Utc.timestamp_opt(secs, 0).unwrap();
        NewNote {
            title: title.to_string(),
            body: String::new(),
            category: None,
            created_at: ts,
            modified_at: ts,
        }
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let mut store = MemoryStore::new();
        let a = store.insert(&new_note("a", 1)).unwrap();
        store.delete(a).unwrap();
        let b = store.insert(&new_note("b", 1)).unwrap();
        assert!(b > a);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn ties_on_modified_break_by_id_descending() {
        let mut store = MemoryStore::new();
        let a = store.insert(&new_note("a", 5)).unwrap();
        let b = store.insert(&new_note("b", 5)).unwrap();
        let c = store.insert(&new_note("c", 1)).unwrap();
        let ids: Vec<_> = store
            .query(&Predicate::match_all())
            .unwrap()
            .iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, vec![b, a, c]);
    }

    #[test]
    fn no_grouped_aggregate() {
        assert!(MemoryStore::new().aggregate_categories().unwrap().is_none());
    }
}
