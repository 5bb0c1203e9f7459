//! Error types for memo-core.

use std::path::PathBuf;

use crate::types::NoteId;

/// Failure talking to the note store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("could not prepare store directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("note {0} not found")]
    NotFound(NoteId),

    #[error("note {id} has an unreadable {column} column")]
    CorruptRow { id: NoteId, column: &'static str },

    /// The backend cannot serve requests at all. Nothing in this crate
    /// raises it; it is the variant for [`NoteStore`](crate::store::NoteStore)
    /// implementations outside it (remote or mounted stores).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Invalid values in an otherwise well-formed configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("display.utc_offset_hours must be within -23..=23, got {0}")]
    UtcOffset(i32),

    #[error("display.{field} must be at least 1")]
    Zero { field: &'static str },

    #[error("display.{field} must be at most {max}, got {value}")]
    TooLarge {
        field: &'static str,
        max: usize,
        value: usize,
    },

    #[error("display.timestamp_format {0:?} has a specifier chrono does not know")]
    TimestampFormat(String),
}
