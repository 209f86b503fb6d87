use clap::{Parser, Subcommand};
use std::path::PathBuf;

use tmark_core::bookmark::{BookmarkRef, TargetKind};
use tmark_core::config::Settings;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Bookmarks for tmux sessions, windows and panes"
)]
pub struct Config {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Bookmarks file (overrides TMARK_BOOKMARKS and the config file)
    #[arg(long, global = true)]
    pub bookmarks: Option<PathBuf>,

    /// tmux binary to run
    #[arg(long, global = true)]
    pub tmux: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Bookmark the current pane, window or session
    Add {
        label: String,
        /// session, window or pane (default from config)
        #[arg(short, long)]
        kind: Option<TargetKind>,
    },
    /// List bookmarks in slot order
    #[command(alias = "ls")]
    List,
    /// Switch to a bookmark by slot, id or label
    Jump {
        #[arg(value_parser = parse_ref)]
        reference: BookmarkRef,
    },
    /// Switch back to the previously viewed bookmark
    Prev,
    /// Remove a bookmark
    Rm {
        #[arg(value_parser = parse_ref)]
        reference: BookmarkRef,
    },
    /// Give a bookmark a new label
    Rename {
        #[arg(value_parser = parse_ref)]
        reference: BookmarkRef,
        label: String,
    },
    /// Overwrite a slot with the current location
    Replace {
        slot: usize,
        label: String,
        #[arg(short, long)]
        kind: Option<TargetKind>,
    },
    /// Move the bookmark at one slot to another
    Mv { from: usize, to: usize },
    /// Check whether every bookmark still resolves
    Doctor,
}

fn parse_ref(s: &str) -> Result<BookmarkRef, String> {
    if s.trim().is_empty() {
        return Err("bookmark reference must not be empty".to_string());
    }
    Ok(BookmarkRef::parse(s))
}

impl Config {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Command {
    /// Whether the command has to talk to a running tmux server
    pub fn needs_tmux(&self) -> bool {
        matches!(
            self,
            Command::Add { .. }
                | Command::Jump { .. }
                | Command::Prev
                | Command::Replace { .. }
                | Command::Doctor
        )
    }
}

/// Apply CLI overrides on top of loaded settings
pub fn merge_cli(settings: &mut Settings, cli: &Config) {
    if let Some(bookmarks) = &cli.bookmarks {
        settings.bookmarks_path = Some(bookmarks.clone());
    }
    if let Some(tmux) = &cli.tmux {
        settings.tmux_command = tmux.clone();
    }
}

/// The bookmarks file to open. `--bookmarks` wins over everything.
pub fn bookmarks_file(settings: &Settings, cli: &Config) -> PathBuf {
    cli.bookmarks
        .clone()
        .unwrap_or_else(|| settings.bookmarks_file())
}
