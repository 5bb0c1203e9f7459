//! Ratatui widgets for the memo TUI.

pub mod category_bar;
pub mod command_bar;
pub mod editor;
pub mod help;
pub mod line_input;
pub mod note_list;
pub mod query_bar;
