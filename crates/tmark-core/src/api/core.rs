//! TmarkCore: the Facade entry-point for the command layer.
//!
//! Owns a [`BookmarkStore`] and a [`SnapshotProvider`] and exposes the
//! bookmark workflows on top of them. Query methods live in `queries.rs`,
//! side-effecting ones in `actions.rs`.

use crate::snapshot::SnapshotProvider;
use crate::store::BookmarkStore;

/// The Facade that wires store, resolver and provider together.
pub struct TmarkCore<P> {
    store: BookmarkStore,
    provider: P,
    /// Hostname stamped on new bookmarks
    host: Option<String>,
}

impl<P: SnapshotProvider> TmarkCore<P> {
    pub fn new(store: BookmarkStore, provider: P) -> Self {
        Self {
            store,
            provider,
            host: None,
        }
    }

    /// Stamp `host` on bookmarks created through this instance
    pub fn with_host(mut self, host: Option<String>) -> Self {
        self.host = host;
        self
    }

    pub fn store(&self) -> &BookmarkStore {
        &self.store
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub(crate) fn host(&self) -> Option<String> {
        self.host.clone()
    }
}

/// Hostname of this machine, if the OS will tell us
pub fn current_host() -> Option<String> {
    nix::unistd::gethostname()
        .ok()
        .and_then(|h| h.into_string().ok())
        .filter(|h| !h.is_empty())
}
