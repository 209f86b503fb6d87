//! Bookmark data model.

mod capture;
mod reference;
mod types;

pub use capture::capture;
pub use reference::BookmarkRef;
pub use types::{
    Bookmark, BookmarkMeta, FallbackDescriptor, NewBookmark, StableTarget, TargetKind,
};
