//! SQLite-backed note store.
//!
//! Timestamps are stored as epoch milliseconds. Rowids come from
//! `AUTOINCREMENT`, so ids of deleted notes are never handed out again and
//! the id tie-breaker stays consistent with insertion order.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::NoteStore;
use crate::error::{StoreError, StoreResult};
use crate::query::{Predicate, ORDER_BY};
use crate::types::{NewNote, Note, NoteId, NoteUpdate};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS notes (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT    NOT NULL DEFAULT '',
    body        TEXT    NOT NULL DEFAULT '',
    category    TEXT,
    created_at  INTEGER NOT NULL,
    modified_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS notes_by_modified ON notes (modified_at DESC, id DESC);
CREATE INDEX IF NOT EXISTS notes_by_category ON notes (category);
"#;

const COLUMNS: &str = "id, title, body, category, created_at, modified_at";

// ---------------------------------------------------------------------------
// SqliteStore
// ---------------------------------------------------------------------------

/// Note store backed by a single SQLite connection.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open an in-memory database with the notes schema.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_schema(conn)
    }

    /// Open or create the database at `path`, creating parent directories
    /// as needed.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "store: opened sqlite database");
        Self::with_schema(conn)
    }

    fn with_schema(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }
}

impl NoteStore for SqliteStore {
    fn insert(&mut self, note: &NewNote) -> StoreResult<NoteId> {
        self.conn.execute(
            "INSERT INTO notes (title, body, category, created_at, modified_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                note.title,
                note.body,
                note.category,
                note.created_at.timestamp_millis(),
                note.modified_at.timestamp_millis(),
            ],
        )?;
        Ok(NoteId(self.conn.last_insert_rowid()))
    }

    fn update(&mut self, id: NoteId, update: &NoteUpdate) -> StoreResult<usize> {
        let rows = self.conn.execute(
            "UPDATE notes SET title = ?1, body = ?2, category = ?3, modified_at = ?4
             WHERE id = ?5",
            params![
                update.title,
                update.body,
                update.category,
                update.modified_at.timestamp_millis(),
                id.0,
            ],
        )?;
        Ok(rows)
    }

    fn delete(&mut self, id: NoteId) -> StoreResult<usize> {
        Ok(self.conn.execute("DELETE FROM notes WHERE id = ?1", [id.0])?)
    }

    fn get(&self, id: NoteId) -> StoreResult<Option<Note>> {
        let raw = self
            .conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM notes WHERE id = ?1"),
                [id.0],
                RawRow::from_row,
            )
            .optional()?;
        raw.map(RawRow::into_note).transpose()
    }

    fn query(&self, predicate: &Predicate) -> StoreResult<Vec<Note>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM notes WHERE {} ORDER BY {ORDER_BY}",
            predicate.sql()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(predicate.params()), RawRow::from_row)?;

        let mut notes = Vec::new();
        for row in rows {
            notes.push(row?.into_note()?);
        }
        tracing::debug!(rows = notes.len(), "store: sqlite query finished");
        Ok(notes)
    }

    fn aggregate_categories(&self) -> StoreResult<Option<HashMap<String, u64>>> {
        let mut stmt = self.conn.prepare(
            "SELECT category, COUNT(*) FROM notes
             WHERE category IS NOT NULL
             GROUP BY category",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut counts = HashMap::new();
        for row in rows {
            let (category, count) = row?;
            counts.insert(category, u64::try_from(count).unwrap_or(0));
        }
        Ok(Some(counts))
    }
}

// ---------------------------------------------------------------------------
// Row decoding
// ---------------------------------------------------------------------------

struct RawRow {
    id: i64,
    title: String,
    body: String,
    category: Option<String>,
    created_at: i64,
    modified_at: i64,
}

impl RawRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            body: row.get(2)?,
            category: row.get(3)?,
            created_at: row.get(4)?,
            modified_at: row.get(5)?,
        })
    }

    fn into_note(self) -> StoreResult<Note> {
        let id = NoteId(self.id);
        let created_at = from_millis(self.created_at).ok_or(StoreError::CorruptRow {
            id,
            column: "created_at",
        })?;
        let modified_at = from_millis(self.modified_at).ok_or(StoreError::CorruptRow {
            id,
            column: "modified_at",
        })?;
        Ok(Note {
            id,
            title: self.title,
            body: self.body,
            category: self.category,
            created_at,
            modified_at,
        })
    }
}

fn from_millis(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(ms)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
