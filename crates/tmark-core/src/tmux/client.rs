use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::process::Command;

use super::parse::{
    parse_lines, parse_location, parse_pane, parse_session, parse_window, LOCATION_FORMAT,
    PANE_FORMAT, SESSION_FORMAT, WINDOW_FORMAT,
};
use crate::bookmark::StableTarget;
use crate::snapshot::{
    Location, PaneEntry, SessionEntry, Snapshot, SnapshotProvider, WindowEntry,
};

/// tmux ids: `$N` session, `@N` window, `%N` pane
static ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[$@%]\d+$").expect("Invalid ID_PATTERN regex"));

/// Reject anything that is not a bare tmux id before it reaches `-t`
fn validate_id(id: &str) -> Result<()> {
    if !ID_PATTERN.is_match(id) {
        anyhow::bail!("Invalid tmux id: {:?}", id);
    }
    Ok(())
}

/// Client for interacting with tmux
pub struct TmuxClient {
    /// tmux binary to run
    command: String,
}

impl TmuxClient {
    /// Creates a new TmuxClient using `tmux` from PATH
    pub fn new() -> Self {
        Self::with_command("tmux")
    }

    /// Creates a new TmuxClient with a custom binary
    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Check if tmux is available and running
    pub async fn is_available(&self) -> bool {
        Command::new(&self.command)
            .arg("list-sessions")
            .output()
            .await
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Run a tmux subcommand and return its stdout
    async fn run(&self, args: &[&str]) -> Result<String> {
        let subcommand = args.first().copied().unwrap_or_default();
        let output = Command::new(&self.command)
            .args(args)
            .output()
            .await
            .with_context(|| format!("Failed to execute tmux {}", subcommand))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("tmux {} failed: {}", subcommand, stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Lists all sessions
    pub async fn list_sessions(&self) -> Result<Vec<SessionEntry>> {
        let stdout = self.run(&["list-sessions", "-F", SESSION_FORMAT]).await?;
        Ok(parse_lines(&stdout, "session", parse_session))
    }

    /// Lists windows across all sessions
    pub async fn list_windows(&self) -> Result<Vec<WindowEntry>> {
        let stdout = self.run(&["list-windows", "-a", "-F", WINDOW_FORMAT]).await?;
        Ok(parse_lines(&stdout, "window", parse_window))
    }

    /// Lists panes across all sessions
    pub async fn list_panes(&self) -> Result<Vec<PaneEntry>> {
        let stdout = self.run(&["list-panes", "-a", "-F", PANE_FORMAT]).await?;
        Ok(parse_lines(&stdout, "pane", parse_pane))
    }

    /// Selects a window by id
    pub async fn select_window(&self, window_id: &str) -> Result<()> {
        validate_id(window_id)?;
        self.run(&["select-window", "-t", window_id]).await?;
        Ok(())
    }

    /// Selects a pane by id
    pub async fn select_pane(&self, pane_id: &str) -> Result<()> {
        validate_id(pane_id)?;
        self.run(&["select-pane", "-t", pane_id]).await?;
        Ok(())
    }

    /// Moves the current client to another session
    pub async fn switch_client(&self, session_id: &str) -> Result<()> {
        validate_id(session_id)?;
        self.run(&["switch-client", "-t", session_id]).await?;
        Ok(())
    }
}

impl Default for TmuxClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotProvider for TmuxClient {
    async fn snapshot(&self) -> Result<Snapshot> {
        let (sessions, windows, panes) =
            tokio::try_join!(self.list_sessions(), self.list_windows(), self.list_panes())?;
        tracing::debug!(
            sessions = sessions.len(),
            windows = windows.len(),
            panes = panes.len(),
            "tmux snapshot"
        );
        Ok(Snapshot::new(sessions, windows, panes))
    }

    async fn current_location(&self) -> Result<Location> {
        // Inside tmux, ask about the calling pane rather than the last active client
        let pane = std::env::var("TMUX_PANE").ok().filter(|p| validate_id(p).is_ok());
        let mut args = vec!["display-message", "-p"];
        if let Some(pane) = pane.as_deref() {
            args.extend(["-t", pane]);
        }
        args.push(LOCATION_FORMAT);

        let stdout = self.run(&args).await?;
        parse_location(&stdout).context("Invalid tmux display-message output")
    }

    async fn switch_to(&self, target: &StableTarget) -> Result<()> {
        validate_id(&target.session_id)?;
        if let Some(window_id) = target.window_id.as_deref() {
            self.select_window(window_id).await?;
        }
        if let Some(pane_id) = target.pane_id.as_deref() {
            self.select_pane(pane_id).await?;
        }
        self.switch_client(&target.session_id).await
    }
}
