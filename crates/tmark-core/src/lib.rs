//! Core library for tmark.
//!
//! Bookmarks point at a tmux session, window or pane. They are persisted in
//! a versioned JSON file by [`store::BookmarkStore`] and mapped back onto the
//! live tmux hierarchy by [`resolver::resolve`], which tries stable ids, then
//! names/index, then the recorded working directory.
//!
//! Consumers normally go through [`api::TmarkCore`], which wires the store,
//! the resolver and a [`snapshot::SnapshotProvider`] together.

pub mod api;
pub mod bookmark;
pub mod config;
pub mod error;
pub mod resolver;
pub mod snapshot;
pub mod store;
pub mod tmux;
