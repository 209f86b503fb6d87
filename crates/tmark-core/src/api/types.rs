//! Owned result types for the Facade API.

use serde::Serialize;
use thiserror::Error;

use crate::bookmark::{Bookmark, StableTarget};
use crate::error::StoreError;
use crate::resolver::{Resolution, ResolveMethod};

/// Error type for Facade API operations
#[derive(Debug, Error)]
pub enum ApiError {
    /// No bookmark matches the given slot, id or label
    #[error("bookmark not found: {reference}")]
    BookmarkNotFound { reference: String },

    /// Slot 0, or a slot past the end where one is required
    #[error("invalid slot: {slot}")]
    InvalidSlot { slot: usize },

    /// `move` with a slot out of range
    #[error("cannot move slot {from} to slot {to}")]
    InvalidMove { from: usize, to: usize },

    /// Every resolution tier failed
    #[error("cannot resolve '{label}': {reason}")]
    Unresolved { label: String, reason: String },

    /// "Jump to previous" with no earlier jump recorded
    #[error("no previous bookmark to jump to")]
    NoPrevious,

    /// Reading or writing the bookmarks file failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A tmux operation failed
    #[error("tmux command failed: {0}")]
    Mux(#[from] anyhow::Error),
}

/// What a successful jump did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JumpOutcome {
    pub bookmark: Bookmark,
    pub method: ResolveMethod,
    pub target: StableTarget,
}

/// One line of a doctor report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoctorEntry {
    /// 1-based position at the time of the check
    pub slot: usize,
    pub bookmark: Bookmark,
    pub resolution: Resolution,
}
