use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::bookmark::TargetKind;

/// Environment variable that overrides the bookmarks file location
pub const BOOKMARKS_ENV: &str = "TMARK_BOOKMARKS";

/// Application settings (from config file)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Bookmarks file; `None` means the platform data directory
    #[serde(default)]
    pub bookmarks_path: Option<PathBuf>,

    /// Kind used by `add`/`replace` when none is given
    #[serde(default)]
    pub default_kind: TargetKind,

    /// tmux binary to run
    #[serde(default = "default_tmux_command")]
    pub tmux_command: String,

    /// Record the hostname on new bookmarks
    #[serde(default = "default_record_host")]
    pub record_host: bool,
}

fn default_tmux_command() -> String {
    "tmux".to_string()
}

fn default_record_host() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bookmarks_path: None,
            default_kind: TargetKind::default(),
            tmux_command: default_tmux_command(),
            record_host: default_record_host(),
        }
    }
}

impl Settings {
    /// Load settings from config file or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        // Try custom path first
        if let Some(p) = path {
            if p.exists() {
                return Self::load_file(p);
            }
        }

        // Try default config locations
        let default_paths = [
            dirs::config_dir().map(|p| p.join("tmark/config.toml")),
            dirs::home_dir().map(|p| p.join(".config/tmark/config.toml")),
            dirs::home_dir().map(|p| p.join(".tmark.toml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                return Self::load_file(path);
            }
        }

        // Return defaults if no config file found
        Ok(Self::default())
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Where the bookmarks file lives.
    ///
    /// `TMARK_BOOKMARKS` beats the config file, which beats the default.
    pub fn bookmarks_file(&self) -> PathBuf {
        if let Some(env) = std::env::var_os(BOOKMARKS_ENV).filter(|v| !v.is_empty()) {
            return PathBuf::from(env);
        }
        self.bookmarks_path
            .clone()
            .unwrap_or_else(default_bookmarks_file)
    }
}

/// `<data dir>/tmark/bookmarks.json`, or `~/.tmark/bookmarks.json`
pub fn default_bookmarks_file() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("tmark"))
        .or_else(|| dirs::home_dir().map(|h| h.join(".tmark")))
        .unwrap_or_else(|| PathBuf::from(".tmark"))
        .join("bookmarks.json")
}
