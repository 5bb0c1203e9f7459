//! Command-line surface for memo.
//!
//! Parsing is clap derive. [`execute`] runs one non-interactive command
//! against a [`Notebook`], writing to any [`Write`] so integration tests can
//! capture the output.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use memo_core::config::Config;
use memo_core::project::{format_timestamp, UNTITLED};
use memo_core::store::SqliteStore;
use memo_core::{
    CategorySet, DisplayModel, NoteDraft, NoteEdit, NoteId, Notebook, ResultProjector,
    SearchFilter, Visibility, ALL,
};

#[derive(Debug, Parser)]
#[command(name = "memo", about = "memo: categorised personal notes with keyword search")]
pub struct Cli {
    /// Write debug logs to <tmp>/memo-debug.log (tail -f to inspect).
    #[arg(long)]
    pub debug: bool,

    /// Notes database. Defaults to `[store] path` or $XDG_DATA_HOME/memo/notes.db.
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Config file. Defaults to ~/.config/memo/config.toml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Open the terminal UI (default).
    Tui,

    /// Create a note. The body is read from stdin when omitted or `-`.
    Add {
        #[arg(long, short)]
        title: Option<String>,
        #[arg(long, short)]
        category: Option<String>,
        body: Option<String>,
    },

    /// Change fields of an existing note. Only given fields are touched.
    Edit {
        id: NoteId,
        #[arg(long, short)]
        title: Option<String>,
        #[arg(long, short)]
        body: Option<String>,
        #[arg(long, short)]
        category: Option<String>,
    },

    /// Delete a note.
    Rm { id: NoteId },

    /// Print one note in full.
    Show { id: NoteId },

    /// List notes, newest first.
    List {
        #[arg(long, short)]
        category: Option<String>,
        #[arg(long, short)]
        query: Option<String>,
        #[arg(long)]
        json: bool,
    },

    /// Per-category note counts.
    Counts {
        #[arg(long)]
        json: bool,
    },

    /// Known categories, default first.
    Categories,
}

/// Open the SQLite notebook at `db` with projector settings from `config`.
pub fn open_notebook(db: &Path, config: &Config) -> anyhow::Result<Notebook> {
    let store = SqliteStore::open(db)
        .with_context(|| format!("opening notes database {}", db.display()))?;
    let options = config.projector_options().context("invalid [display] settings")?;
    let categories = CategorySet::builtin();
    Ok(Notebook::new(
        Box::new(store),
        categories.clone(),
        ResultProjector::new(options, categories),
    ))
}

/// Run a non-interactive command. [`Commands::Tui`] is the caller's job.
pub fn execute(
    command: Commands,
    notebook: &mut Notebook,
    out: &mut impl Write,
    input: &mut impl Read,
) -> anyhow::Result<()> {
    match command {
        Commands::Tui => bail!("the tui command is not handled here"),

        Commands::Add {
            title,
            category,
            body,
        } => {
            let body = match body.as_deref() {
                None | Some("-") => {
                    let mut buf = String::new();
                    input.read_to_string(&mut buf).context("reading note body from stdin")?;
                    buf.trim_end_matches('\n').to_string()
                }
                Some(text) => text.to_string(),
            };
            let mut draft = NoteDraft::new(title.unwrap_or_default(), body);
            if let Some(c) = category {
                check_category(notebook.categories(), &c)?;
                draft.category = Some(c);
            }
            let id = notebook.create(draft)?;
            writeln!(out, "created #{id}")?;
        }

        Commands::Edit {
            id,
            title,
            body,
            category,
        } => {
            if let Some(c) = category.as_deref() {
                check_category(notebook.categories(), c)?;
            }
            let edit = NoteEdit {
                title,
                body,
                category,
            };
            if edit.is_empty() {
                bail!("nothing to change: pass --title, --body or --category");
            }
            let verb = if notebook.edit(id, edit)? { "updated" } else { "unchanged" };
            writeln!(out, "{verb} #{id}")?;
        }

        Commands::Rm { id } => {
            notebook.delete(id)?;
            writeln!(out, "deleted #{id}")?;
        }

        Commands::Show { id } => {
            let note = notebook.get(id)?;
            let opts = notebook.projector().options();
            let ts = |t| format_timestamp(t, opts.utc_offset, &opts.timestamp_format);
            let category = note
                .category
                .as_deref()
                .unwrap_or_else(|| notebook.categories().default_label());
            let title = if note.title.is_empty() { UNTITLED } else { note.title.as_str() };

            writeln!(out, "#{id}  {title}  [{category}]")?;
            writeln!(out, "created  {}", ts(note.created_at))?;
            writeln!(out, "modified {}", ts(note.modified_at))?;
            writeln!(out)?;
            writeln!(out, "{}", note.body)?;
        }

        Commands::List {
            category,
            query,
            json,
        } => {
            let filter = SearchFilter::from_input(
                category.as_deref().unwrap_or(ALL),
                query.as_deref().unwrap_or(""),
            );
            let models = notebook.results(&filter)?;
            if json {
                serde_json::to_writer_pretty(&mut *out, &models)?;
                writeln!(out)?;
            } else {
                for model in &models {
                    write_card(out, model)?;
                }
            }
        }

        Commands::Counts { json } => {
            let counts = notebook.counts();
            if json {
                let mut rows = vec![serde_json::json!({ "category": ALL, "count": counts.all() })];
                rows.extend(counts.iter().map(|(category, count)| {
                    serde_json::json!({ "category": category, "count": count })
                }));
                serde_json::to_writer_pretty(&mut *out, &rows)?;
                writeln!(out)?;
            } else {
                writeln!(out, "{ALL}\t{}", counts.all())?;
                for (category, count) in counts.iter() {
                    writeln!(out, "{category}\t{count}")?;
                }
            }
        }

        Commands::Categories => {
            for label in notebook.categories().iter() {
                writeln!(out, "{label}")?;
            }
        }
    }
    Ok(())
}

fn check_category(known: &CategorySet, label: &str) -> anyhow::Result<()> {
    if !known.contains(label) {
        let list: Vec<&str> = known.iter().collect();
        bail!("unknown category {label:?} (known: {})", list.join(", "));
    }
    Ok(())
}

/// Plain-text card. The matched span is wrapped in brackets.
fn write_card(out: &mut impl Write, model: &DisplayModel) -> std::io::Result<()> {
    writeln!(out, "#{}  {}  [{}]", model.id, model.title, model.category)?;
    match model.preview.placeholder {
        Some(placeholder) => writeln!(out, "    ({placeholder})")?,
        None => {
            for line in &model.preview.lines {
                writeln!(out, "    {line}")?;
            }
        }
    }
    if model.preview.ellipsis == Visibility::Visible {
        writeln!(out, "    ...")?;
    }
    if let Some(annotation) = &model.annotation {
        let (before, hit, after) = annotation.excerpt.parts();
        writeln!(out, "    {}: {before}[{hit}]{after}", annotation.label)?;
    }
    writeln!(out, "    {} · {}", model.created, model.modified)?;
    writeln!(out)
}
