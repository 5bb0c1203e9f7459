//! Settings file.
//!
//! Every load starts from the TOML embedded below and layers the user's file
//! over it, so a user file only needs the keys it changes. [`Config::load`]
//! uses `$XDG_CONFIG_HOME/memo/config.toml` (falling back to `~/.config`) and
//! writes the defaults there on first run. [`Config::defaults`] never touches
//! the filesystem.

use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use config::{File, FileFormat};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::project::{is_valid_timestamp_format, ProjectorOptions};

const DEFAULT_CONFIG: &str = r#"
[store]
# empty = $XDG_DATA_HOME/memo/notes.db
path = ""

[display]
wrap_width       = 30
preview_lines    = 3
context_chars    = 5
utc_offset_hours = 8
timestamp_format = "%Y-%m-%d %H:%M:%S"

[ui]
theme           = "default"
show_timestamps = true
"#;

/// Whole hours either side of UTC that a display offset may take.
const MAX_OFFSET_HOURS: i32 = 23;

/// Upper bound for every `[display]` size. Larger values are typos.
const MAX_DISPLAY_SIZE: usize = 1_000;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    pub display: DisplayConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    /// Database file. Blank selects the XDG data location.
    pub path: String,
}

/// How notes are turned into display models. See [`ProjectorOptions`].
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    pub wrap_width: usize,
    pub preview_lines: usize,
    pub context_chars: usize,
    pub utc_offset_hours: i32,
    pub timestamp_format: String,
}

/// Read by the terminal front end only.
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    pub theme: String,
    pub show_timestamps: bool,
}

impl Config {
    /// The user's config file, created from the defaults if absent.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_dir().join("config.toml");
        if !path.exists() {
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
            tracing::info!(path = %path.display(), "config: wrote defaults");
        }
        Self::load_from(&path)
    }

    /// `path` layered over the defaults. A missing file is not an error.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let cfg = Self::layers(Some(path))?;
        tracing::debug!(path = %path.display(), "config: loaded");
        Ok(cfg)
    }

    pub fn defaults() -> Self {
        Self::layers(None).expect("embedded default config must deserialize")
    }

    fn layers(user: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder =
            config::Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));
        if let Some(path) = user {
            builder = builder.add_source(File::from(path).required(false));
        }
        builder.build()?.try_deserialize()
    }

    /// Validated projector settings from `[display]`.
    pub fn projector_options(&self) -> Result<ProjectorOptions, ConfigError> {
        ProjectorOptions::try_from(&self.display)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl StoreConfig {
    pub fn resolved_path(&self) -> PathBuf {
        match self.path.trim() {
            "" => data_dir().join("notes.db"),
            explicit => PathBuf::from(explicit),
        }
    }
}

impl TryFrom<&DisplayConfig> for ProjectorOptions {
    type Error = ConfigError;

    fn try_from(cfg: &DisplayConfig) -> Result<Self, ConfigError> {
        for (field, value) in [("wrap_width", cfg.wrap_width), ("preview_lines", cfg.preview_lines)] {
            if value == 0 {
                return Err(ConfigError::Zero { field });
            }
        }
        for (field, value) in [
            ("wrap_width", cfg.wrap_width),
            ("preview_lines", cfg.preview_lines),
            ("context_chars", cfg.context_chars),
        ] {
            if value > MAX_DISPLAY_SIZE {
                return Err(ConfigError::TooLarge { field, max: MAX_DISPLAY_SIZE, value });
            }
        }
        if !is_valid_timestamp_format(&cfg.timestamp_format) {
            return Err(ConfigError::TimestampFormat(cfg.timestamp_format.clone()));
        }
        let hours = cfg.utc_offset_hours;
        let utc_offset = Some(hours)
            .filter(|h| h.abs() <= MAX_OFFSET_HOURS)
            .and_then(|h| FixedOffset::east_opt(h * 3600))
            .ok_or(ConfigError::UtcOffset(hours))?;

        Ok(Self {
            wrap_width: cfg.wrap_width,
            preview_lines: cfg.preview_lines,
            context_chars: cfg.context_chars,
            utc_offset,
            timestamp_format: cfg.timestamp_format.clone(),
        })
    }
}

/// `$<var>/memo`, or `~/<fallback>/memo` when the variable is unset.
fn xdg_dir(var: &str, fallback: &[&str]) -> PathBuf {
    let base = std::env::var_os(var).map(PathBuf::from).unwrap_or_else(|| {
        let home = std::env::var_os("HOME").map_or_else(|| PathBuf::from("."), PathBuf::from);
        fallback.iter().fold(home, |p, part| p.join(part))
    });
    base.join("memo")
}

fn config_dir() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", &[".config"])
}

fn data_dir() -> PathBuf {
    xdg_dir("XDG_DATA_HOME", &[".local", "share"])
}
