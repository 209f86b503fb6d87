//! Bookmark persistence.
//!
//! One JSON document (`{version, items}`) plus a small view-state sidecar,
//! both replaced atomically on every write.

mod atomic;
mod bookmarks;
pub mod schema;
mod view_state;

pub use bookmarks::BookmarkStore;
pub use schema::{BookmarksFile, CURRENT_VERSION};
pub use view_state::ViewState;
