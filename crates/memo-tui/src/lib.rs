//! memo TUI: ratatui front end over a [`Notebook`].

pub mod app;
pub mod commands;
pub mod event;
pub mod theme;
pub mod widgets;

pub use app::App;

use memo_core::{config::Config, Notebook};

/// Run the terminal UI until the user quits.
///
/// An unknown `[ui] theme` name falls back to the default theme.
pub fn run(notebook: Notebook, config: Config) -> anyhow::Result<()> {
    let theme = theme::Theme::by_name(&config.ui.theme).unwrap_or_else(|| {
        tracing::warn!(theme = %config.ui.theme, "tui: unknown theme, using default");
        theme::Theme::load_default()
    });
    App::new(notebook, config, theme).run()
}
