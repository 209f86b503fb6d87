//! Map a stored bookmark onto the live hierarchy.
//!
//! Three tiers, tried in order, first hit wins:
//!
//! 1. stable ids (`$N`/`@N`/`%N`), authoritative when alive; a pane follows
//!    its own id into whatever window now holds it
//! 2. session name, then window name or window index
//! 3. exact match on a pane's current working directory
//!
//! Resolution only reads the snapshot. It never switches or writes.

use std::fmt;

use serde::Serialize;

use crate::bookmark::{Bookmark, StableTarget, TargetKind};
use crate::snapshot::Snapshot;

/// Which tier produced a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolveMethod {
    /// Stable ids still alive
    Id,
    /// Session/window names or index matched
    Fallback,
    /// Pane bookmark whose pane could only be narrowed to its window
    FallbackWindowForPane,
    /// A pane sitting in the recorded working directory
    Cwd,
}

impl ResolveMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolveMethod::Id => "id",
            ResolveMethod::Fallback => "fallback",
            ResolveMethod::FallbackWindowForPane => "fallback-window-for-pane",
            ResolveMethod::Cwd => "cwd",
        }
    }

    /// True for both fallback variants
    pub fn is_fallback(&self) -> bool {
        matches!(
            self,
            ResolveMethod::Fallback | ResolveMethod::FallbackWindowForPane
        )
    }
}

impl fmt::Display for ResolveMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`resolve`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    Resolved {
        method: ResolveMethod,
        target: StableTarget,
    },
    Unresolved {
        /// One clause per tier explaining the miss
        reason: String,
    },
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved { .. })
    }

    pub fn method(&self) -> Option<ResolveMethod> {
        match self {
            Resolution::Resolved { method, .. } => Some(*method),
            Resolution::Unresolved { .. } => None,
        }
    }

    pub fn target(&self) -> Option<&StableTarget> {
        match self {
            Resolution::Resolved { target, .. } => Some(target),
            Resolution::Unresolved { .. } => None,
        }
    }
}

/// Resolve `bookmark` against a freshly fetched `snapshot`.
pub fn resolve(bookmark: &Bookmark, snapshot: &Snapshot) -> Resolution {
    let mut misses = Vec::with_capacity(3);

    match by_stable_id(bookmark, snapshot) {
        Ok(target) => {
            tracing::debug!(id = %bookmark.id, %target, "Resolved by stable id");
            return Resolution::Resolved {
                method: ResolveMethod::Id,
                target,
            };
        }
        Err(miss) => misses.push(format!("id: {}", miss)),
    }

    match by_fallback(bookmark, snapshot) {
        Ok((method, target)) => {
            tracing::debug!(id = %bookmark.id, %target, %method, "Resolved by fallback");
            return Resolution::Resolved { method, target };
        }
        Err(miss) => misses.push(format!("fallback: {}", miss)),
    }

    match by_cwd(bookmark, snapshot) {
        Ok(target) => {
            tracing::debug!(id = %bookmark.id, %target, "Resolved by cwd");
            return Resolution::Resolved {
                method: ResolveMethod::Cwd,
                target,
            };
        }
        Err(miss) => misses.push(format!("cwd: {}", miss)),
    }

    let reason = misses.join("; ");
    tracing::debug!(id = %bookmark.id, %reason, "Bookmark unresolved");
    Resolution::Unresolved { reason }
}

fn by_stable_id(bookmark: &Bookmark, snapshot: &Snapshot) -> Result<StableTarget, String> {
    let recorded = &bookmark.target;
    if recorded.session_id.is_empty() {
        return Err("no session id recorded".to_string());
    }
    snapshot
        .find_session_by_id(&recorded.session_id)
        .ok_or_else(|| format!("session {} is gone", recorded.session_id))?;

    if bookmark.kind == TargetKind::Session {
        return Ok(StableTarget::session(&recorded.session_id));
    }

    let window_id = recorded
        .window_id
        .as_deref()
        .ok_or("no window id recorded")?;

    if bookmark.kind == TargetKind::Pane {
        // A live pane id is enough; join-pane may have moved it out of a closed window
        let pane_id = recorded.pane_id.as_deref().ok_or("no pane id recorded")?;
        let pane = snapshot
            .find_pane_by_id(pane_id)
            .ok_or_else(|| format!("pane {} is gone", pane_id))?;
        return Ok(StableTarget::pane(&pane.session_id, &pane.window_id, &pane.id));
    }

    let window = snapshot
        .find_window_by_id(window_id)
        .ok_or_else(|| format!("window {} is gone", window_id))?;
    Ok(StableTarget::window(&window.session_id, &window.id))
}

fn by_fallback(
    bookmark: &Bookmark,
    snapshot: &Snapshot,
) -> Result<(ResolveMethod, StableTarget), String> {
    let fallback = &bookmark.fallback;
    let session_name = fallback
        .session_name
        .as_deref()
        .ok_or("no session name recorded")?;
    let session = snapshot
        .find_session_by_name(session_name)
        .ok_or_else(|| format!("no session named '{}'", session_name))?;

    if bookmark.kind == TargetKind::Session {
        return Ok((ResolveMethod::Fallback, StableTarget::session(&session.id)));
    }

    let by_name = fallback
        .window_name
        .as_deref()
        .and_then(|name| snapshot.find_window_by_name(&session.id, name));
    let window = by_name
        .or_else(|| {
            fallback
                .window_index
                .and_then(|index| snapshot.find_window_by_index(&session.id, index))
        })
        .ok_or_else(|| {
            format!(
                "no window {} in session '{}'",
                describe_window(fallback.window_name.as_deref(), fallback.window_index),
                session_name
            )
        })?;

    let method = match bookmark.kind {
        TargetKind::Pane => ResolveMethod::FallbackWindowForPane,
        _ => ResolveMethod::Fallback,
    };
    Ok((method, StableTarget::window(&session.id, &window.id)))
}

fn by_cwd(bookmark: &Bookmark, snapshot: &Snapshot) -> Result<StableTarget, String> {
    let cwd = bookmark.meta.cwd.as_deref().ok_or("no cwd recorded")?;
    let pane = snapshot
        .find_pane_by_cwd(cwd)
        .ok_or_else(|| format!("no pane in {}", cwd))?;
    Ok(StableTarget::pane(&pane.session_id, &pane.window_id, &pane.id))
}

fn describe_window(name: Option<&str>, index: Option<u32>) -> String {
    match (name, index) {
        (Some(name), Some(index)) => format!("named '{}' or at index {}", name, index),
        (Some(name), None) => format!("named '{}'", name),
        (None, Some(index)) => format!("at index {}", index),
        (None, None) => "(no window name or index recorded)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookmark::{FallbackDescriptor, NewBookmark};
    use crate::snapshot::{PaneEntry, SessionEntry, WindowEntry};
    use pretty_assertions::assert_eq;

    fn session(id: &str, name: &str) -> SessionEntry {
        SessionEntry {
            id: id.to_string(),
            name: name.to_string(),
            attached: 0,
        }
    }

    fn window(id: &str, session_id: &str, index: u32, name: &str) -> WindowEntry {
        WindowEntry {
            id: id.to_string(),
            index,
            name: name.to_string(),
            session_id: session_id.to_string(),
            active: false,
        }
    }

    fn pane(id: &str, window_id: &str, session_id: &str, cwd: &str) -> PaneEntry {
        PaneEntry {
            id: id.to_string(),
            index: 0,
            window_id: window_id.to_string(),
            session_id: session_id.to_string(),
            cwd: cwd.to_string(),
            active: false,
        }
    }

    /// `work` ($1) has `editor` @1 (index 0) with %1 and `logs` @2 (index 1) with %2
    fn live() -> Snapshot {
        Snapshot::new(
            vec![session("$1", "work"), session("$2", "scratch")],
            vec![
                window("@1", "$1", 0, "editor"),
                window("@2", "$1", 1, "logs"),
                window("@3", "$2", 0, "zsh"),
            ],
            vec![
                pane("%1", "@1", "$1", "/src/app"),
                pane("%2", "@2", "$1", "/var/log"),
                pane("%3", "@3", "$2", "/tmp"),
            ],
        )
    }

    fn bookmark(kind: TargetKind, target: StableTarget, fallback: FallbackDescriptor) -> Bookmark {
        NewBookmark::new("test", kind, target, fallback).mint()
    }

    fn names(session: &str, window: Option<&str>, index: Option<u32>) -> FallbackDescriptor {
        FallbackDescriptor {
            session_name: Some(session.to_string()),
            window_name: window.map(str::to_string),
            window_index: index,
        }
    }

    #[test]
    fn test_stable_id_wins_despite_name_drift() {
        let b = bookmark(
            TargetKind::Pane,
            StableTarget::pane("$1", "@2", "%2"),
            names("renamed-away", Some("old-name"), Some(9)),
        );
        assert_eq!(
            resolve(&b, &live()),
            Resolution::Resolved {
                method: ResolveMethod::Id,
                target: StableTarget::pane("$1", "@2", "%2"),
            }
        );
    }

    #[test]
    fn test_session_fallback_by_name() {
        let snapshot = Snapshot::new(vec![session("$7", "work")], vec![], vec![]);
        let b = bookmark(
            TargetKind::Session,
            StableTarget::session("$1"),
            names("work", None, None),
        );
        assert_eq!(
            resolve(&b, &snapshot),
            Resolution::Resolved {
                method: ResolveMethod::Fallback,
                target: StableTarget::session("$7"),
            }
        );
    }

    #[test]
    fn test_window_fallback_prefers_name_over_index() {
        let b = bookmark(
            TargetKind::Window,
            StableTarget::window("$1", "@99"),
            names("work", Some("logs"), Some(0)),
        );
        let resolution = resolve(&b, &live());
        assert_eq!(resolution.method(), Some(ResolveMethod::Fallback));
        assert_eq!(resolution.target(), Some(&StableTarget::window("$1", "@2")));
    }

    #[test]
    fn test_window_fallback_by_index_when_name_drifted() {
        let b = bookmark(
            TargetKind::Window,
            StableTarget::window("$1", "@99"),
            names("work", Some("renamed"), Some(1)),
        );
        assert_eq!(
            resolve(&b, &live()).target(),
            Some(&StableTarget::window("$1", "@2"))
        );
    }

    #[test]
    fn test_pane_fallback_degrades_to_window() {
        let b = bookmark(
            TargetKind::Pane,
            StableTarget::pane("$1", "@1", "%99"),
            names("work", Some("editor"), Some(0)),
        );
        // @1 is alive but %99 is not, so the id tier fails as a whole
        let resolution = resolve(&b, &live());
        assert_eq!(resolution.method(), Some(ResolveMethod::FallbackWindowForPane));
        assert!(resolution.method().is_some_and(|m| m.is_fallback()));
        assert_eq!(resolution.target(), Some(&StableTarget::window("$1", "@1")));
    }

    #[test]
    fn test_fallback_never_returns_partial_target() {
        // Session matches but no window does: the whole tier fails
        let b = bookmark(
            TargetKind::Window,
            StableTarget::window("$9", "@9"),
            names("work", Some("nope"), Some(42)),
        );
        match resolve(&b, &live()) {
            Resolution::Unresolved { reason } => {
                assert!(reason.contains("no window named 'nope' or at index 42"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_cwd_tier_after_fallback_fails() {
        let b = NewBookmark::new(
            "logs",
            TargetKind::Window,
            StableTarget::window("$9", "@9"),
            names("gone", Some("logs"), Some(1)),
        )
        .with_cwd("/var/log")
        .mint();
        assert_eq!(
            resolve(&b, &live()),
            Resolution::Resolved {
                method: ResolveMethod::Cwd,
                target: StableTarget::pane("$1", "@2", "%2"),
            }
        );
    }

    #[test]
    fn test_cwd_requires_exact_match() {
        let b = NewBookmark::new(
            "x",
            TargetKind::Pane,
            StableTarget::pane("$9", "@9", "%9"),
            FallbackDescriptor::default(),
        )
        .with_cwd("/var")
        .mint();
        assert!(!resolve(&b, &live()).is_resolved());
    }

    #[test]
    fn test_degrades_then_fails() {
        let b = bookmark(
            TargetKind::Window,
            StableTarget::window("$1", "@2"),
            names("work", Some("logs"), None),
        );
        assert_eq!(resolve(&b, &live()).method(), Some(ResolveMethod::Id));

        // Window destroyed and recreated under the same name: fallback
        let recreated = Snapshot::new(
            vec![session("$1", "work")],
            vec![window("@8", "$1", 1, "logs")],
            vec![pane("%8", "@8", "$1", "/elsewhere")],
        );
        assert_eq!(resolve(&b, &recreated).method(), Some(ResolveMethod::Fallback));

        // Both gone and no cwd recorded
        let empty = Snapshot::new(vec![session("$1", "work")], vec![], vec![]);
        let resolution = resolve(&b, &empty);
        assert!(!resolution.is_resolved());
        match resolution {
            Resolution::Unresolved { reason } => {
                assert!(reason.contains("id: window @2 is gone"));
                assert!(reason.contains("cwd: no cwd recorded"));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_window_moved_to_other_session_follows_window() {
        let moved = Snapshot::new(
            vec![session("$1", "work"), session("$2", "scratch")],
            vec![window("@2", "$2", 3, "logs")],
            vec![],
        );
        let b = bookmark(
            TargetKind::Window,
            StableTarget::window("$1", "@2"),
            FallbackDescriptor::default(),
        );
        assert_eq!(
            resolve(&b, &moved).target(),
            Some(&StableTarget::window("$2", "@2"))
        );
    }

    #[test]
    fn test_fallback_beats_cwd_match() {
        // Ids are stale, names still match, and a live pane sits in the recorded cwd
        let b = NewBookmark::new(
            "logs",
            TargetKind::Window,
            StableTarget::window("$9", "@9"),
            names("work", Some("logs"), Some(1)),
        )
        .with_cwd("/src/app")
        .mint();
        assert_eq!(
            resolve(&b, &live()),
            Resolution::Resolved {
                method: ResolveMethod::Fallback,
                target: StableTarget::window("$1", "@2"),
            }
        );
    }

    #[test]
    fn test_stable_id_beats_fallback_and_cwd() {
        // Every tier could answer; each would pick a different pane
        let b = NewBookmark::new(
            "app",
            TargetKind::Pane,
            StableTarget::pane("$2", "@3", "%3"),
            names("work", Some("logs"), Some(1)),
        )
        .with_cwd("/src/app")
        .mint();
        assert_eq!(
            resolve(&b, &live()),
            Resolution::Resolved {
                method: ResolveMethod::Id,
                target: StableTarget::pane("$2", "@3", "%3"),
            }
        );
    }

    #[test]
    fn test_joined_pane_keeps_stable_id_match() {
        // %2 was moved into @3 and its original window @2 closed
        let joined = Snapshot::new(
            vec![session("$1", "work"), session("$2", "scratch")],
            vec![window("@1", "$1", 0, "editor"), window("@3", "$2", 0, "zsh")],
            vec![
                pane("%1", "@1", "$1", "/src/app"),
                pane("%2", "@3", "$2", "/var/log"),
            ],
        );
        let b = bookmark(
            TargetKind::Pane,
            StableTarget::pane("$1", "@2", "%2"),
            names("work", Some("logs"), Some(1)),
        );
        assert_eq!(
            resolve(&b, &joined),
            Resolution::Resolved {
                method: ResolveMethod::Id,
                target: StableTarget::pane("$2", "@3", "%2"),
            }
        );
    }

    #[test]
    fn test_method_serialization() {
        assert_eq!(
            serde_json::to_string(&ResolveMethod::FallbackWindowForPane).unwrap(),
            "\"fallback-window-for-pane\""
        );
        let json = serde_json::to_value(Resolution::Resolved {
            method: ResolveMethod::Id,
            target: StableTarget::session("$1"),
        })
        .unwrap();
        assert_eq!(json["status"], "resolved");
        assert_eq!(json["method"], "id");
    }
}
