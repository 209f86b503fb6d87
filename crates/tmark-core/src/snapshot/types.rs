use serde::{Deserialize, Serialize};

/// A live session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEntry {
    /// Stable id (`$N`)
    pub id: String,
    pub name: String,
    /// Number of attached clients
    #[serde(default)]
    pub attached: u32,
}

/// A live window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowEntry {
    /// Stable id (`@N`)
    pub id: String,
    pub index: u32,
    pub name: String,
    pub session_id: String,
    #[serde(default)]
    pub active: bool,
}

/// A live pane
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaneEntry {
    /// Stable id (`%N`)
    pub id: String,
    pub index: u32,
    pub window_id: String,
    pub session_id: String,
    pub cwd: String,
    #[serde(default)]
    pub active: bool,
}

/// Where the user currently is, as reported by the multiplexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub session_id: String,
    pub session_name: String,
    pub window_id: String,
    pub window_name: String,
    pub window_index: u32,
    pub pane_id: String,
    pub cwd: String,
}

/// Sessions, windows and panes as read at one instant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    sessions: Vec<SessionEntry>,
    windows: Vec<WindowEntry>,
    panes: Vec<PaneEntry>,
}

impl Snapshot {
    pub fn new(
        sessions: Vec<SessionEntry>,
        windows: Vec<WindowEntry>,
        panes: Vec<PaneEntry>,
    ) -> Self {
        Self {
            sessions,
            windows,
            panes,
        }
    }

    pub fn sessions(&self) -> &[SessionEntry] {
        &self.sessions
    }

    pub fn windows(&self) -> &[WindowEntry] {
        &self.windows
    }

    /// Panes in the order the multiplexer listed them
    pub fn panes(&self) -> &[PaneEntry] {
        &self.panes
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn find_session_by_id(&self, id: &str) -> Option<&SessionEntry> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn find_window_by_id(&self, id: &str) -> Option<&WindowEntry> {
        self.windows.iter().find(|w| w.id == id)
    }

    pub fn find_pane_by_id(&self, id: &str) -> Option<&PaneEntry> {
        self.panes.iter().find(|p| p.id == id)
    }

    /// Exact name match; tmux keeps session names unique
    pub fn find_session_by_name(&self, name: &str) -> Option<&SessionEntry> {
        self.sessions.iter().find(|s| s.name == name)
    }

    /// First window in `session_id` with exactly this name
    pub fn find_window_by_name(&self, session_id: &str, name: &str) -> Option<&WindowEntry> {
        self.windows
            .iter()
            .find(|w| w.session_id == session_id && w.name == name)
    }

    pub fn find_window_by_index(&self, session_id: &str, index: u32) -> Option<&WindowEntry> {
        self.windows
            .iter()
            .find(|w| w.session_id == session_id && w.index == index)
    }

    /// First pane whose current directory is exactly `cwd`
    pub fn find_pane_by_cwd(&self, cwd: &str) -> Option<&PaneEntry> {
        self.panes.iter().find(|p| p.cwd == cwd)
    }
}
