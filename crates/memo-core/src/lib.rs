//! memo-core: the query engine behind the memo notes app.
//!
//! # Architecture
//!
//! ```text
//! SearchFilter ──► compose ──► Predicate ──► NoteStore::query ──► Vec<Note>
//!                                                                   │
//!                      ResultProjector (ExcerptLocator) ◄───────────┘
//!                                 │
//!                                 ▼
//!                           DisplayModel ──► UI
//!
//! NoteStore ──► tally ──► CategoryCounts ──► category picker
//! ```
//!
//! Everything is synchronous. A query runs to completion on the caller's
//! thread and returns a finite, ordered result.

pub mod category;
pub mod config;
pub mod error;
pub mod excerpt;
pub mod notebook;
pub mod project;
pub mod query;
pub mod store;
pub mod tally;
pub mod types;

pub use category::{CategorySet, ALL};
pub use error::{ConfigError, StoreError, StoreResult};
pub use notebook::{Clock, EditMode, EditSession, Notebook, SystemClock};
pub use project::{DisplayModel, ProjectorOptions, ResultProjector, Visibility};
pub use query::{compose, Predicate, SearchFilter};
pub use tally::CategoryCounts;
pub use types::{Note, NoteDraft, NoteEdit, NoteId};
