use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Granularity of a bookmark
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// A whole session
    Session,
    /// A window inside a session
    Window,
    /// A single pane
    #[default]
    Pane,
}

impl TargetKind {
    /// Lowercase name as stored on disk
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Session => "session",
            TargetKind::Window => "window",
            TargetKind::Pane => "pane",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "session" | "s" => Ok(TargetKind::Session),
            "window" | "w" => Ok(TargetKind::Window),
            "pane" | "p" => Ok(TargetKind::Pane),
            other => Err(format!("unknown target kind: {}", other)),
        }
    }
}

/// Identifiers tmux never reassigns while the entity is alive
/// (`$N` sessions, `@N` windows, `%N` panes).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StableTarget {
    #[serde(default)]
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pane_id: Option<String>,
}

impl StableTarget {
    pub fn session(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            window_id: None,
            pane_id: None,
        }
    }

    pub fn window(session_id: impl Into<String>, window_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            window_id: Some(window_id.into()),
            pane_id: None,
        }
    }

    pub fn pane(
        session_id: impl Into<String>,
        window_id: impl Into<String>,
        pane_id: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            window_id: Some(window_id.into()),
            pane_id: Some(pane_id.into()),
        }
    }

    /// Drop the identifiers that carry no meaning for `kind`.
    pub fn narrowed_to(mut self, kind: TargetKind) -> Self {
        match kind {
            TargetKind::Session => {
                self.window_id = None;
                self.pane_id = None;
            }
            TargetKind::Window => {
                self.pane_id = None;
            }
            TargetKind::Pane => {}
        }
        self
    }

    /// Whether the populated fields agree with `kind`.
    ///
    /// A missing window/pane id is acceptable (the fallback tier can make up
    /// for it); an id finer than the kind, or a pane id without its window,
    /// is not.
    pub fn is_consistent_with(&self, kind: TargetKind) -> bool {
        match kind {
            TargetKind::Session => self.window_id.is_none() && self.pane_id.is_none(),
            TargetKind::Window => self.pane_id.is_none(),
            TargetKind::Pane => self.pane_id.is_none() || self.window_id.is_some(),
        }
    }
}

impl fmt::Display for StableTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.session_id)?;
        if let Some(window_id) = &self.window_id {
            write!(f, ":{}", window_id)?;
        }
        if let Some(pane_id) = &self.pane_id {
            write!(f, ".{}", pane_id)?;
        }
        Ok(())
    }
}

/// Human-mutable identifiers, trusted only when the stable ids are gone
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_index: Option<u32>,
}

/// Bookkeeping carried alongside each bookmark
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkMeta {
    /// Working directory of the pane at capture time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
    /// Host the bookmark was captured on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
}

/// A persisted bookmark
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    /// Unique, immutable identifier; only `replace` mints a new one
    pub id: String,
    pub label: String,
    pub kind: TargetKind,
    pub target: StableTarget,
    #[serde(default)]
    pub fallback: FallbackDescriptor,
    pub meta: BookmarkMeta,
}

/// Everything the caller supplies when creating or replacing a bookmark
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBookmark {
    pub label: String,
    pub kind: TargetKind,
    pub target: StableTarget,
    pub fallback: FallbackDescriptor,
    pub cwd: Option<String>,
    pub host: Option<String>,
}

impl NewBookmark {
    pub fn new(
        label: impl Into<String>,
        kind: TargetKind,
        target: StableTarget,
        fallback: FallbackDescriptor,
    ) -> Self {
        Self {
            label: label.into(),
            kind,
            target,
            fallback,
            cwd: None,
            host: None,
        }
    }

    pub fn with_cwd(mut self, cwd: impl Into<String>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn with_host(mut self, host: Option<String>) -> Self {
        self.host = host;
        self
    }

    /// Assign a fresh id and timestamps.
    pub(crate) fn mint(self) -> Bookmark {
        let now = Utc::now();
        Bookmark {
            id: uuid::Uuid::new_v4().to_string(),
            label: self.label,
            kind: self.kind,
            target: self.target.narrowed_to(self.kind),
            fallback: self.fallback,
            meta: BookmarkMeta {
                cwd: self.cwd,
                host: self.host,
                created_at: now,
                last_used: now,
            },
        }
    }
}
