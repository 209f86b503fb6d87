//! tmux-backed [`SnapshotProvider`](crate::snapshot::SnapshotProvider).

mod client;
mod parse;

pub use client::TmuxClient;
