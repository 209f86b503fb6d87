use crate::snapshot::Location;

use super::types::{FallbackDescriptor, NewBookmark, StableTarget, TargetKind};

/// Build the stable and fallback identifiers for `kind` from the current location.
///
/// Session bookmarks keep only the session; window bookmarks add the window's
/// id, name and index; pane bookmarks additionally keep the pane id.
pub fn capture(kind: TargetKind, location: &Location) -> (StableTarget, FallbackDescriptor) {
    let session_fallback = FallbackDescriptor {
        session_name: Some(location.session_name.clone()),
        window_name: None,
        window_index: None,
    };

    match kind {
        TargetKind::Session => (StableTarget::session(&location.session_id), session_fallback),
        TargetKind::Window | TargetKind::Pane => {
            let fallback = FallbackDescriptor {
                window_name: Some(location.window_name.clone()),
                window_index: Some(location.window_index),
                ..session_fallback
            };
            let target = StableTarget::pane(
                &location.session_id,
                &location.window_id,
                &location.pane_id,
            )
            .narrowed_to(kind);
            (target, fallback)
        }
    }
}

impl Location {
    /// Bookmark request for this location, with its cwd recorded.
    pub fn to_new_bookmark(&self, label: impl Into<String>, kind: TargetKind) -> NewBookmark {
        let (target, fallback) = capture(kind, self);
        NewBookmark::new(label, kind, target, fallback).with_cwd(&self.cwd)
    }
}
