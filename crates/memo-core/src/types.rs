//! Core types for memo-core.
//!
//! This module defines the note record shared by every layer: the stored
//! [`Note`], its [`NoteId`], and the write-side shapes handed to a store
//! ([`NewNote`], [`NoteUpdate`]) or to the notebook ([`NoteDraft`],
//! [`NoteEdit`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque note identity, assigned by the store on insert.
///
/// Backed by the SQLite rowid. Ids are also the tie-breaker of the fixed
/// result ordering, so they must be comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub i64);

impl std::fmt::Display for NoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for NoteId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(NoteId)
    }
}

/// A note as stored and returned by a [`NoteStore`](crate::store::NoteStore).
///
/// `modified_at >= created_at` always holds for notes written through the
/// [`Notebook`](crate::notebook::Notebook).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub body: String,
    /// `None` for rows written without a category (legacy rows, other tools).
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Field values for a store insert. Timestamps are decided by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub title: String,
    pub body: String,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Full replacement of the mutable fields of a stored note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteUpdate {
    pub title: String,
    pub body: String,
    pub category: Option<String>,
    pub modified_at: DateTime<Utc>,
}

/// User-facing input for creating a note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub body: String,
    /// Falls back to the default category when `None`.
    pub category: Option<String>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            category: None,
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// A partial edit. `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteEdit {
    pub title: Option<String>,
    pub body: Option<String>,
    pub category: Option<String>,
}

impl NoteEdit {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none() && self.category.is_none()
    }
}
