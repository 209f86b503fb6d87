//! On-disk envelope and schema migration.
//!
//! Every known schema version decodes into its own variant of
//! [`VersionedFile`]; [`migrate`] walks the variants forward one step at a
//! time until it reaches [`CURRENT_VERSION`]. Nothing is ever downgraded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::bookmark::{Bookmark, BookmarkMeta, FallbackDescriptor, StableTarget, TargetKind};

/// Schema version written by this build
pub const CURRENT_VERSION: u32 = 2;

/// Persisted envelope at the current schema version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarksFile {
    pub version: u32,
    #[serde(default)]
    pub items: Vec<Bookmark>,
}

impl Default for BookmarksFile {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            items: Vec::new(),
        }
    }
}

/// Version 1 stored every identifier flat on the record and had no
/// `host`/`lastUsed`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkV1 {
    pub id: String,
    pub label: String,
    pub kind: TargetKind,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub window_id: Option<String>,
    #[serde(default)]
    pub pane_id: Option<String>,
    #[serde(default)]
    pub session_name: Option<String>,
    #[serde(default)]
    pub window_name: Option<String>,
    #[serde(default)]
    pub window_index: Option<u32>,
    #[serde(default)]
    pub cwd: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileV1 {
    #[serde(default)]
    pub items: Vec<BookmarkV1>,
}

/// A decoded envelope tagged with the schema it was written in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionedFile {
    V1(FileV1),
    V2(BookmarksFile),
}

impl VersionedFile {
    pub fn version(&self) -> u32 {
        match self {
            VersionedFile::V1(_) => 1,
            VersionedFile::V2(file) => file.version,
        }
    }
}

/// Why raw file contents could not be turned into a [`VersionedFile`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Not JSON, or not the shape its version promises
    Malformed(String),
    /// Written by a newer build
    FutureVersion(u32),
}

/// Decode raw file contents, dispatching on the `version` field.
///
/// An envelope without `version` predates versioning and is read as v1.
pub fn decode(raw: &str) -> Result<VersionedFile, DecodeError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| DecodeError::Malformed(e.to_string()))?;

    let version = match value.get("version") {
        None => 1,
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| DecodeError::Malformed(format!("invalid version field: {}", v)))?,
    };

    match version {
        1 => serde_json::from_value(value)
            .map(VersionedFile::V1)
            .map_err(|e| DecodeError::Malformed(e.to_string())),
        CURRENT_VERSION => serde_json::from_value(value)
            .map(VersionedFile::V2)
            .map_err(|e| DecodeError::Malformed(e.to_string())),
        v if v > CURRENT_VERSION => Err(DecodeError::FutureVersion(v)),
        v => Err(DecodeError::Malformed(format!("unknown schema version {}", v))),
    }
}

/// Bring any known version up to [`CURRENT_VERSION`].
///
/// Total and pure. A file already at the current version comes back as is.
pub fn migrate(mut file: VersionedFile) -> BookmarksFile {
    loop {
        file = match file {
            VersionedFile::V1(v1) => VersionedFile::V2(v1_to_v2(v1)),
            VersionedFile::V2(current) => return current,
        };
    }
}

/// Drop ids finer than each record's kind. Returns how many records changed.
pub(crate) fn normalize_targets(items: &mut [Bookmark]) -> usize {
    let mut changed = 0;
    for bookmark in items.iter_mut() {
        if bookmark.target.is_consistent_with(bookmark.kind) {
            continue;
        }
        let narrowed = bookmark.target.clone().narrowed_to(bookmark.kind);
        tracing::debug!(
            id = %bookmark.id,
            kind = %bookmark.kind,
            from = %bookmark.target,
            to = %narrowed,
            "Narrowed bookmark target to its kind"
        );
        bookmark.target = narrowed;
        changed += 1;
    }
    changed
}

fn v1_to_v2(file: FileV1) -> BookmarksFile {
    let mut items: Vec<Bookmark> = file
        .items
        .into_iter()
        .map(|old| Bookmark {
            id: old.id,
            label: old.label,
            kind: old.kind,
            target: StableTarget {
                session_id: old.session_id.unwrap_or_default(),
                window_id: old.window_id,
                pane_id: old.pane_id,
            },
            fallback: FallbackDescriptor {
                session_name: old.session_name,
                window_name: old.window_name,
                window_index: old.window_index,
            },
            meta: BookmarkMeta {
                cwd: old.cwd,
                host: None,
                created_at: old.created_at,
                last_used: old.created_at,
            },
        })
        .collect();
    normalize_targets(&mut items);

    BookmarksFile {
        version: 2,
        items,
    }
}
