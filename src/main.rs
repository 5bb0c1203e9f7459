use clap::Parser;
use memo::cli::{self, Cli, Commands};
use memo_core::config::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        let path = std::env::temp_dir().join("memo-debug.log");
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!(path = %path.display(), "memo debug log started");
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "config: falling back to defaults");
            Config::defaults()
        }),
    };
    let db = cli.db.clone().unwrap_or_else(|| config.store.resolved_path());
    let mut notebook = cli::open_notebook(&db, &config)?;

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => memo_tui::run(notebook, config),
        command => cli::execute(
            command,
            &mut notebook,
            &mut std::io::stdout().lock(),
            &mut std::io::stdin().lock(),
        ),
    }
}
