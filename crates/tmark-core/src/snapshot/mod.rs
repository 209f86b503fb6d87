//! Point-in-time view of the multiplexer hierarchy.
//!
//! A [`Snapshot`] is fetched fresh for every resolution attempt through a
//! [`SnapshotProvider`]; the resolver only ever reads it.

mod types;

pub use types::{Location, PaneEntry, SessionEntry, Snapshot, WindowEntry};

use anyhow::Result;

use crate::bookmark::StableTarget;

/// Capability interface over a live multiplexer.
///
/// Implementations may block on external processes; nothing here retries or
/// times out.
#[allow(async_fn_in_trait)]
pub trait SnapshotProvider {
    /// Read sessions, windows and panes in one go
    async fn snapshot(&self) -> Result<Snapshot>;

    /// Describe the pane the user is currently in
    async fn current_location(&self) -> Result<Location>;

    /// Best-effort activation of a resolved target
    ///
    /// May fail if the hierarchy changed since the snapshot was taken.
    async fn switch_to(&self, target: &StableTarget) -> Result<()>;
}
