//! Application state, key dispatch and the frame loop.
//!
//! Search is live: any change to the query text or the selected category
//! rebuilds the [`SearchFilter`] and re-queries the notebook, and the
//! per-category counts are recomputed alongside.
//!
//! Keys are routed in layers. The help popup swallows everything but its
//! close keys. The command prompt and the note editor each own the keyboard
//! while open. Otherwise global bindings apply and whatever is left goes to
//! the focused pane.
//!
//! The editor follows the notebook's edit sessions: `n` inserts a note and
//! opens it, `e` opens the selected one. `Ctrl+s` commits and closes, `Esc`
//! discards, which deletes a note that was inserted for the session.

use std::time::Duration;

use crossterm::event::{self as term, Event, KeyEventKind};
use memo_core::{
    config::Config, CategoryCounts, DisplayModel, EditMode, EditSession, NoteId, Notebook,
    SearchFilter, ALL,
};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Widget,
    DefaultTerminal, Frame,
};

use crate::commands::Command;
use crate::event::{self, AppEvent, Direction, KeyMode};
use crate::theme::Theme;
use crate::widgets::{
    category_bar::CategoryBar,
    command_bar::{CommandBar, CommandBarState},
    editor::{Editor, EditorState},
    help::HelpPopup,
    note_list::{NoteList, NoteListState},
    query_bar::{QueryBar, QueryBarState},
};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Categories,
    List,
    QueryBar,
    /// The `:` prompt.
    Command,
    Editor,
}

impl Focus {
    fn next(self) -> Focus {
        match self {
            Focus::Categories => Focus::List,
            Focus::List => Focus::QueryBar,
            Focus::QueryBar | Focus::Command | Focus::Editor => Focus::Categories,
        }
    }

    fn key_mode(self) -> KeyMode {
        match self {
            Focus::QueryBar | Focus::Command | Focus::Editor => KeyMode::Typing,
            Focus::Categories | Focus::List => KeyMode::Browse,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

pub struct AppState {
    pub notebook: Notebook,
    pub config: Config,
    pub theme: Theme,
    pub focus: Focus,
    /// Where focus returns when the prompt closes.
    pub prev_focus: Focus,
    /// Selected category tab; 0 is the "all" tab.
    pub category: usize,
    pub query: QueryBarState,
    pub list: NoteListState,
    pub results: Vec<DisplayModel>,
    pub counts: CategoryCounts,
    pub status: Option<Status>,
    pub show_help: bool,
    pub command_bar: CommandBarState,
    /// Open while [`Focus::Editor`] is active.
    pub editor: Option<EditorState>,
    pub quit: bool,
}

impl AppState {
    /// Label of the selected category tab.
    pub fn active_category(&self) -> &str {
        match self.category {
            0 => ALL,
            n => self.notebook.categories().get(n - 1).unwrap_or(ALL),
        }
    }

    pub fn filter(&self) -> SearchFilter {
        SearchFilter::from_input(self.active_category(), self.query.text())
    }

    pub fn selected_note(&self) -> Option<&DisplayModel> {
        self.results.get(self.list.selected)
    }

    /// Re-run the search and the tally.
    pub fn refresh(&mut self) {
        let filter = self.filter();
        match self.notebook.results(&filter) {
            Ok(results) => {
                self.results = results;
                if matches!(self.status, Some(Status::Error(_))) {
                    self.status = None;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "app: search failed");
                self.results.clear();
                self.status = Some(Status::Error(format!("search failed: {e}")));
            }
        }
        self.counts = self.notebook.counts();
        self.list.clamp(self.results.len());
        tracing::debug!(
            category = self.active_category(),
            query = %self.query.text(),
            results = self.results.len(),
            "app: refreshed"
        );
    }

    fn tab_count(&self) -> usize {
        self.notebook.categories().len() + 1
    }

    fn select_category(&mut self, index: usize) {
        if index != self.category {
            self.category = index;
            self.list.selected = 0;
            self.refresh();
        }
    }

    fn step_category(&mut self, forward: bool) {
        let n = self.tab_count();
        let next = if forward {
            (self.category + 1) % n
        } else {
            (self.category + n - 1) % n
        };
        self.select_category(next);
    }

    fn open_prompt(&mut self) {
        tracing::debug!(from = ?self.focus, "app: prompt opened");
        self.prev_focus = self.focus;
        self.command_bar.clear();
        self.focus = Focus::Command;
    }

    fn close_prompt(&mut self) {
        self.command_bar.clear();
        self.focus = self.prev_focus;
    }

    fn select_id(&mut self, id: NoteId) {
        if let Some(pos) = self.results.iter().position(|m| m.id == id) {
            self.list.selected = pos;
        }
    }

    fn open_editor(&mut self, session: EditSession) {
        tracing::debug!(id = %session.id(), mode = ?session.mode(), "app: editor opened");
        self.editor = Some(EditorState::open(session, self.notebook.categories()));
        self.prev_focus = self.focus;
        self.focus = Focus::Editor;
    }

    /// Insert a note titled `title` in the selected category and edit it.
    fn new_note(&mut self, title: String) {
        let created = self.notebook.begin_new().and_then(|mut session| {
            session.title = title;
            if self.category > 0 {
                session.category = Some(self.active_category().to_string());
            }
            self.notebook.commit(&session)?;
            Ok(session)
        });
        match created {
            Ok(session) => {
                let id = session.id();
                self.refresh();
                self.select_id(id);
                self.status = Some(Status::Info(format!("created note #{id}")));
                self.open_editor(session);
            }
            Err(e) => self.status = Some(Status::Error(format!("create failed: {e}"))),
        }
    }

    fn edit_selected(&mut self) {
        let Some(id) = self.selected_note().map(|m| m.id) else {
            self.status = Some(Status::Error("no note selected".to_string()));
            return;
        };
        match self.notebook.begin_edit(id) {
            Ok(session) => self.open_editor(session),
            Err(e) => self.status = Some(Status::Error(format!("edit failed: {e}"))),
        }
    }

    /// Commit the editor and close it. A failed write keeps it open.
    fn save_editor(&mut self) {
        let Some(session) = self.editor.as_ref().map(EditorState::session) else {
            return;
        };
        let id = session.id();
        match self.notebook.commit(&session) {
            Ok(changed) => {
                self.editor = None;
                self.focus = self.prev_focus;
                self.refresh();
                self.select_id(id);
                let msg = if changed { "saved" } else { "no changes to" };
                self.status = Some(Status::Info(format!("{msg} note #{id}")));
            }
            Err(e) => {
                tracing::warn!(%id, error = %e, "app: save failed");
                self.status = Some(Status::Error(format!("save failed: {e}")));
            }
        }
    }

    fn discard_editor(&mut self) {
        let Some(editor) = self.editor.take() else {
            return;
        };
        self.focus = self.prev_focus;
        let session = editor.session();
        let (id, mode) = (session.id(), session.mode());
        let status = match self.notebook.discard(session) {
            Ok(()) if mode == EditMode::Insert => Status::Info(format!("discarded new note #{id}")),
            Ok(()) => Status::Info(format!("left note #{id} unchanged")),
            Err(e) => Status::Error(format!("discard failed: {e}")),
        };
        self.refresh();
        self.status = Some(status);
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    state: AppState,
}

impl App {
    pub fn new(notebook: Notebook, config: Config, theme: Theme) -> Self {
        let counts = CategoryCounts::zeroed(notebook.categories());
        let mut list = NoteListState::default();
        list.show_timestamps = config.ui.show_timestamps;

        let mut state = AppState {
            notebook,
            config,
            theme,
            focus: Focus::List,
            prev_focus: Focus::List,
            category: 0,
            query: QueryBarState::default(),
            list,
            results: Vec::new(),
            counts,
            status: None,
            show_help: false,
            command_bar: CommandBarState::default(),
            editor: None,
            quit: false,
        };
        state.refresh();
        App { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Take over the terminal until the user quits. ratatui's init installs
    /// a panic hook that restores the screen, and restore runs on every
    /// normal exit path including loop errors.
    pub fn run(mut self) -> anyhow::Result<()> {
        let mut terminal = ratatui::init();
        let outcome = self.frame_loop(&mut terminal);
        ratatui::restore();
        outcome
    }

    fn frame_loop(&mut self, terminal: &mut DefaultTerminal) -> anyhow::Result<()> {
        while !self.state.quit {
            terminal.draw(|frame| draw(frame, &self.state))?;

            if !term::poll(POLL_INTERVAL)? {
                continue;
            }
            match term::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Press => {}
                raw => {
                    if let Some(ev) = event::translate(&raw, self.state.focus.key_mode()) {
                        tracing::debug!(focus = ?self.state.focus, event = ?ev, "app: key event");
                        self.handle(ev);
                    }
                }
            }
        }
        Ok(())
    }

    pub fn handle(&mut self, event: AppEvent) {
        let s = &mut self.state;
        if s.show_help {
            help_key(s, &event);
        } else if s.focus == Focus::Command {
            prompt_key(s, event);
        } else if s.focus == Focus::Editor {
            editor_key(s, event);
        } else if let Some(event) = global_key(s, event) {
            pane_key(s, event);
        }
    }
}

// ---------------------------------------------------------------------------
// Key layers
// ---------------------------------------------------------------------------

fn help_key(s: &mut AppState, event: &AppEvent) {
    if matches!(event, AppEvent::Char('?') | AppEvent::Escape | AppEvent::Quit) {
        tracing::debug!("app: help closed");
        s.show_help = false;
    }
}

fn prompt_key(s: &mut AppState, event: AppEvent) {
    match event {
        AppEvent::Escape => {
            tracing::debug!("app: prompt cancelled");
            s.close_prompt();
        }
        AppEvent::Quit => s.quit = true,
        AppEvent::Enter => match Command::parse(s.command_bar.text()) {
            Ok(parsed) => {
                s.close_prompt();
                if let Some(cmd) = parsed {
                    tracing::debug!(command = ?cmd, "app: executing command");
                    execute_command(s, cmd);
                }
            }
            Err(msg) => s.command_bar.error = Some(msg),
        },
        other => s.command_bar.handle(&other),
    }
}

fn editor_key(s: &mut AppState, event: AppEvent) {
    match event {
        AppEvent::Save => s.save_editor(),
        AppEvent::Escape => s.discard_editor(),
        AppEvent::Quit => {
            s.discard_editor();
            s.quit = true;
        }
        AppEvent::Resize(..) => {}
        other => {
            if let Some(editor) = s.editor.as_mut() {
                editor.handle(&other);
            }
        }
    }
}

/// Bindings that apply whichever pane has focus. Returns the event when it
/// is not one of them.
fn global_key(s: &mut AppState, event: AppEvent) -> Option<AppEvent> {
    let typing = s.focus == Focus::QueryBar;
    match event {
        AppEvent::Char('?') if !typing => {
            tracing::debug!("app: help opened");
            s.show_help = true;
        }
        AppEvent::Char(':') if !typing => s.open_prompt(),
        AppEvent::Char('n') if !typing => s.new_note(String::new()),
        AppEvent::Char('e') if !typing => s.edit_selected(),
        AppEvent::Quit => {
            tracing::debug!("app: quit");
            s.quit = true;
        }
        AppEvent::Escape => {
            if typing {
                s.focus = Focus::List;
            }
            s.status = None;
        }
        AppEvent::FocusNext => {
            let next = s.focus.next();
            tracing::debug!(from = ?s.focus, to = ?next, "app: focus cycle");
            s.focus = next;
        }
        AppEvent::QueryFocus => s.focus = Focus::QueryBar,
        AppEvent::CategoryNext => s.step_category(true),
        AppEvent::CategoryPrev => s.step_category(false),
        AppEvent::Resize(..) => {}
        other => return Some(other),
    }
    None
}

fn pane_key(s: &mut AppState, event: AppEvent) {
    match (s.focus, event) {
        (Focus::Categories, AppEvent::Nav(Direction::Left)) => s.step_category(false),
        (Focus::Categories, AppEvent::Nav(Direction::Right)) => s.step_category(true),
        (Focus::Categories, AppEvent::Nav(Direction::Down) | AppEvent::Enter) => {
            s.focus = Focus::List;
        }
        (Focus::List, event) => s.list.handle(&event, s.results.len()),
        (Focus::QueryBar, AppEvent::Enter) => s.focus = Focus::List,
        (Focus::QueryBar, event) => {
            if s.query.handle(&event) {
                s.list.selected = 0;
                s.refresh();
            }
        }
        _ => {}
    }
}

fn execute_command(s: &mut AppState, cmd: Command) {
    match cmd {
        Command::Quit => s.quit = true,
        Command::Help => s.show_help = !s.show_help,
        Command::Timestamps => s.list.show_timestamps = !s.list.show_timestamps,
        Command::Theme(name) => match Theme::by_name(&name) {
            Some(theme) => s.theme = theme,
            None => s.status = Some(Status::Error(format!("unknown theme: {name}"))),
        },
        Command::Category(label) => {
            let index = if label == ALL {
                Some(0)
            } else {
                s.notebook.categories().position(&label).map(|i| i + 1)
            };
            match index {
                Some(i) => s.select_category(i),
                None => s.status = Some(Status::Error(format!("unknown category: {label}"))),
            }
        }
        Command::New(title) => s.new_note(title),
        Command::Edit => s.edit_selected(),
        Command::Delete => {
            let Some(id) = s.selected_note().map(|m| m.id) else {
                s.status = Some(Status::Error("no note selected".to_string()));
                return;
            };
            match s.notebook.delete(id) {
                Ok(()) => {
                    s.refresh();
                    s.status = Some(Status::Info(format!("deleted note #{id}")));
                }
                Err(e) => s.status = Some(Status::Error(format!("delete failed: {e}"))),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

fn draw(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let [tabs, notes, search, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    let theme = &state.theme;
    let searching = state.focus == Focus::QueryBar;
    let query_bar = QueryBar::new(&state.query, state.results.len(), searching, theme);

    frame.render_widget(CategoryBar::new(&state.counts, state.category, theme), tabs);
    frame.render_widget(
        NoteList::new(&state.results, &state.list, state.focus == Focus::List, theme),
        notes,
    );
    frame.render_widget(StatusLine(state), status);
    if searching {
        frame.set_cursor_position(query_bar.cursor_position(search));
    }
    frame.render_widget(query_bar, search);

    if state.show_help {
        frame.render_widget(HelpPopup::new(theme), area);
    }

    if let Some(editor) = &state.editor {
        frame.render_widget(Editor::new(editor, theme), notes);
        if let Some(pos) = editor.cursor_position(notes) {
            frame.set_cursor_position(pos);
        }
    }

    // the prompt replaces the status line
    if state.focus == Focus::Command {
        frame.render_widget(CommandBar::new(&state.command_bar, theme), status);
        frame.set_cursor_position((state.command_bar.cursor_col(status), status.y));
    }
}

struct StatusLine<'a>(&'a AppState);

impl Widget for StatusLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let theme = &self.0.theme;
        let line = match &self.0.status {
            Some(Status::Error(msg)) => Line::from(Span::styled(msg.as_str(), theme.status_error)),
            Some(Status::Info(msg)) => Line::from(Span::styled(msg.as_str(), theme.status_info)),
            None => return,
        };
        line.render(area, buf);
    }
}
