//! Notebook: the service front ends talk to.
//!
//! Owns the store, the clock, the known [`CategorySet`] and the
//! [`ResultProjector`]. Writes go through here so timestamps stay
//! consistent: `created_at` is set once, and `modified_at` never moves
//! backwards and never precedes `created_at`.
//!
//! The editor lifecycle is modelled by [`EditSession`]. A new note is
//! inserted as soon as the editor opens ([`Notebook::begin_new`]); discarding
//! it deletes the row again. Editing an existing note snapshots its values
//! ([`Notebook::begin_edit`]) and discarding puts them back.

use chrono::{DateTime, SubsecRound, Utc};

use crate::category::CategorySet;
use crate::error::{StoreError, StoreResult};
use crate::project::{DisplayModel, ResultProjector};
use crate::query::{compose, SearchFilter};
use crate::store::NoteStore;
use crate::tally::{tally_store, CategoryCounts};
use crate::types::{NewNote, Note, NoteDraft, NoteEdit, NoteId, NoteUpdate};

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of "now" for note timestamps.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock truncated to milliseconds, the precision the store keeps.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(3)
    }
}

// ---------------------------------------------------------------------------
// Edit sessions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// The note was created when the session began.
    Insert,
    /// The note existed before the session began.
    Edit,
}

/// An open editor on one note.
///
/// `title`, `body` and `category` hold the working values; nothing reaches
/// the store until [`Notebook::commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    id: NoteId,
    mode: EditMode,
    original: (String, String, Option<String>),
    pub title: String,
    pub body: String,
    pub category: Option<String>,
}

impl EditSession {
    fn open(note: &Note, mode: EditMode) -> Self {
        Self {
            id: note.id,
            mode,
            original: (note.title.clone(), note.body.clone(), note.category.clone()),
            title: note.title.clone(),
            body: note.body.clone(),
            category: note.category.clone(),
        }
    }

    pub fn id(&self) -> NoteId {
        self.id
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// Whether the working values differ from those at session start.
    pub fn is_dirty(&self) -> bool {
        (&self.title, &self.body, &self.category)
            != (&self.original.0, &self.original.1, &self.original.2)
    }
}

// ---------------------------------------------------------------------------
// Notebook
// ---------------------------------------------------------------------------

pub struct Notebook {
    store: Box<dyn NoteStore>,
    clock: Box<dyn Clock>,
    categories: CategorySet,
    projector: ResultProjector,
}

impl Notebook {
    pub fn new(store: Box<dyn NoteStore>, categories: CategorySet, projector: ResultProjector) -> Self {
        Self {
            store,
            clock: Box::new(SystemClock),
            categories,
            projector,
        }
    }

    /// Replace the clock. Tests use this to pin timestamps.
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    pub fn projector(&self) -> &ResultProjector {
        &self.projector
    }

    pub fn create(&mut self, draft: NoteDraft) -> StoreResult<NoteId> {
        let now = self.clock.now();
        let category = draft
            .category
            .unwrap_or_else(|| self.categories.default_label().to_string());
        self.warn_unknown(&category);

        let id = self.store.insert(&NewNote {
            title: draft.title,
            body: draft.body,
            category: Some(category),
            created_at: now,
            modified_at: now,
        })?;
        tracing::debug!(%id, "notebook: created note");
        Ok(id)
    }

    /// Apply `edit` to `id`. Returns `false` without writing when nothing
    /// actually changed.
    pub fn edit(&mut self, id: NoteId, edit: NoteEdit) -> StoreResult<bool> {
        let current = self.get(id)?;
        let update = NoteUpdate {
            title: edit.title.unwrap_or_else(|| current.title.clone()),
            body: edit.body.unwrap_or_else(|| current.body.clone()),
            category: edit.category.or_else(|| current.category.clone()),
            modified_at: current.modified_at,
        };
        self.replace(&current, update)
    }

    /// Overwrite every mutable field of `current`, a missing category
    /// included. `update.modified_at` is recomputed here.
    fn replace(&mut self, current: &Note, mut update: NoteUpdate) -> StoreResult<bool> {
        let id = current.id;
        if update.title == current.title
            && update.body == current.body
            && update.category == current.category
        {
            tracing::debug!(%id, "notebook: edit left note unchanged");
            return Ok(false);
        }
        if let Some(c) = update.category.as_deref() {
            self.warn_unknown(c);
        }

        update.modified_at = self.clock.now().max(current.modified_at);
        if self.store.update(id, &update)? == 0 {
            return Err(StoreError::NotFound(id));
        }
        tracing::debug!(%id, "notebook: updated note");
        Ok(true)
    }

    pub fn delete(&mut self, id: NoteId) -> StoreResult<()> {
        match self.store.delete(id)? {
            0 => Err(StoreError::NotFound(id)),
            _ => {
                tracing::debug!(%id, "notebook: deleted note");
                Ok(())
            }
        }
    }

    pub fn get(&self, id: NoteId) -> StoreResult<Note> {
        self.store.get(id)?.ok_or(StoreError::NotFound(id))
    }

    /// Notes matching `filter` in result order. Store failures surface.
    pub fn search(&self, filter: &SearchFilter) -> StoreResult<Vec<Note>> {
        self.store.query(&compose(filter))
    }

    /// [`search`](Self::search) projected for display.
    pub fn results(&self, filter: &SearchFilter) -> StoreResult<Vec<DisplayModel>> {
        Ok(self
            .search(filter)?
            .iter()
            .map(|note| self.projector.project(note, filter))
            .collect())
    }

    /// Per-category counts. Never fails; see [`tally_store`].
    pub fn counts(&self) -> CategoryCounts {
        tally_store(self.store.as_ref(), &self.categories)
    }

    // -- editor lifecycle ---------------------------------------------------

    /// Insert an empty note and open it.
    pub fn begin_new(&mut self) -> StoreResult<EditSession> {
        let id = self.create(NoteDraft::default())?;
        let note = self.get(id)?;
        Ok(EditSession::open(&note, EditMode::Insert))
    }

    pub fn begin_edit(&self, id: NoteId) -> StoreResult<EditSession> {
        let note = self.get(id)?;
        Ok(EditSession::open(&note, EditMode::Edit))
    }

    /// Save the session's working values if they differ from the store.
    pub fn commit(&mut self, session: &EditSession) -> StoreResult<bool> {
        let current = self.get(session.id)?;
        self.replace(
            &current,
            NoteUpdate {
                title: session.title.clone(),
                body: session.body.clone(),
                category: session.category.clone(),
                modified_at: current.modified_at,
            },
        )
    }

    /// Close the session without keeping its changes.
    ///
    /// A note created by [`begin_new`](Self::begin_new) is deleted. An
    /// existing note gets its snapshotted values back, including a missing
    /// category.
    pub fn discard(&mut self, session: EditSession) -> StoreResult<()> {
        match session.mode {
            EditMode::Insert => self.delete(session.id),
            EditMode::Edit => {
                let current = self.get(session.id)?;
                let (title, body, category) = session.original;
                self.replace(
                    &current,
                    NoteUpdate {
                        title,
                        body,
                        category,
                        modified_at: current.modified_at,
                    },
                )
                .map(|_| ())
            }
        }
    }

    fn warn_unknown(&self, category: &str) {
        if !self.categories.contains(category) {
            tracing::warn!(category, "notebook: category is not in the known set and will not be counted");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
