//! Public API layer (Facade) for tmark-core.
//!
//! [`TmarkCore`] wires a [`BookmarkStore`](crate::store::BookmarkStore), the
//! resolver and a [`SnapshotProvider`](crate::snapshot::SnapshotProvider).
//! The command-line binary uses this API instead of orchestrating the pieces
//! itself.
//!
//! ```ignore
//! use tmark_core::api::TmarkCore;
//! use tmark_core::bookmark::BookmarkRef;
//!
//! let core = TmarkCore::new(store, TmuxClient::new());
//! let outcome = core.jump(&BookmarkRef::parse("2")).await?;
//! println!("{} via {}", outcome.target, outcome.method);
//! ```

mod actions;
mod core;
mod queries;
pub mod types;

pub use core::{current_host, TmarkCore};
pub use types::{ApiError, DoctorEntry, JumpOutcome};
