//! memo: categorised personal notes with keyword search.
//!
//! The binary is a thin shell: [`cli`] parses arguments and runs the
//! non-interactive commands, `memo-tui` owns the interactive front end, and
//! everything else lives in `memo-core`.

pub mod cli;
