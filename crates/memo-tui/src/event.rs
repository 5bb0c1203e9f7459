//! Key translation. Crossterm events become [`AppEvent`]s here and nowhere
//! else, so widgets and app state only ever see the semantic vocabulary.
//!
//! Two keymaps exist. [`KeyMode::Browse`] is active while the category bar
//! or the note list has focus and binds single letters to actions.
//! [`KeyMode::Typing`] is active in the query bar, the command bar and the
//! note editor, where every printable character (CJK included) is text.
//!
//! | Key                   | Browse            | Typing           |
//! |-----------------------|-------------------|------------------|
//! | `q`                   | `Quit`            | `Char('q')`      |
//! | `Ctrl+c`              | `Quit`            | `Quit`           |
//! | `Ctrl+s`              | `Save`            | `Save`           |
//! | `Tab`                 | `FocusNext`       | `FocusNext`      |
//! | `/`                   | `QueryFocus`      | `Char('/')`      |
//! | `]` / `[`             | category next/prev | `Char`          |
//! | `PageUp` / `Ctrl+u`   | `ScrollUp`        | none             |
//! | `PageDown` / `Ctrl+d` | `ScrollDown`      | none             |
//! | arrows                | `Nav`             | `Nav`            |
//! | `h` `j` `k` `l`       | `Nav`             | `Char`           |
//! | `Enter`, `Esc`, `Backspace` | same name   | same name        |

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    /// Cycle focus categories → list → query bar.
    FocusNext,
    QueryFocus,
    ScrollUp,
    ScrollDown,
    /// Next category tab, wrapping past the last one.
    CategoryNext,
    CategoryPrev,
    Nav(Direction),
    Char(char),
    Backspace,
    Enter,
    Resize(u16, u16),
    Escape,
    /// Write the open editor back to the notebook.
    Save,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    Browse,
    Typing,
}

/// Translate a terminal event. Mouse events and unbound keys yield `None`.
pub fn translate(event: &Event, mode: KeyMode) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(*w, *h)),
        Event::Key(key) => translate_key(key, mode),
        _ => None,
    }
}

fn translate_key(key: &KeyEvent, mode: KeyMode) -> Option<AppEvent> {
    let plain = key.modifiers == KeyModifiers::NONE;
    let ctrl = key.modifiers == KeyModifiers::CONTROL;
    let printable = plain || key.modifiers == KeyModifiers::SHIFT;

    // bindings shared by both keymaps
    let shared = match key.code {
        KeyCode::Char('c') if ctrl => Some(AppEvent::Quit),
        KeyCode::Char('s') if ctrl => Some(AppEvent::Save),
        KeyCode::Tab if plain => Some(AppEvent::FocusNext),
        KeyCode::Enter if plain => Some(AppEvent::Enter),
        KeyCode::Backspace if plain => Some(AppEvent::Backspace),
        KeyCode::Esc => Some(AppEvent::Escape),
        KeyCode::Up => Some(AppEvent::Nav(Direction::Up)),
        KeyCode::Down => Some(AppEvent::Nav(Direction::Down)),
        KeyCode::Left => Some(AppEvent::Nav(Direction::Left)),
        KeyCode::Right => Some(AppEvent::Nav(Direction::Right)),
        _ => None,
    };
    if shared.is_some() {
        return shared;
    }

    match (mode, key.code) {
        (KeyMode::Typing, KeyCode::Char(c)) if printable => Some(AppEvent::Char(c)),
        (KeyMode::Typing, _) => None,

        (KeyMode::Browse, KeyCode::PageUp) => Some(AppEvent::ScrollUp),
        (KeyMode::Browse, KeyCode::PageDown) => Some(AppEvent::ScrollDown),
        (KeyMode::Browse, KeyCode::Char('u')) if ctrl => Some(AppEvent::ScrollUp),
        (KeyMode::Browse, KeyCode::Char('d')) if ctrl => Some(AppEvent::ScrollDown),
        (KeyMode::Browse, KeyCode::Char(c)) if plain => Some(browse_letter(c)),
        (KeyMode::Browse, KeyCode::Char(c)) if printable => Some(AppEvent::Char(c)),
        (KeyMode::Browse, _) => None,
    }
}

fn browse_letter(c: char) -> AppEvent {
    match c {
        'q' => AppEvent::Quit,
        '/' => AppEvent::QueryFocus,
        ']' => AppEvent::CategoryNext,
        '[' => AppEvent::CategoryPrev,
        'k' => AppEvent::Nav(Direction::Up),
        'j' => AppEvent::Nav(Direction::Down),
        'h' => AppEvent::Nav(Direction::Left),
        'l' => AppEvent::Nav(Direction::Right),
        other => AppEvent::Char(other),
    }
}
