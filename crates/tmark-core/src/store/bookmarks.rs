use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::bookmark::{Bookmark, NewBookmark};
use crate::error::StoreError;

use super::atomic::{read_optional, write_atomic};
use super::schema::{self, BookmarksFile, DecodeError, CURRENT_VERSION};
use super::view_state::ViewState;

/// Durable, slot-addressed bookmark list.
///
/// Every mutation re-reads the whole file, applies one change and atomically
/// replaces the file. There is no cross-process lock: two concurrent writers
/// both succeed and the later rename wins. The file itself is never left
/// half-written.
#[derive(Debug, Clone)]
pub struct BookmarkStore {
    path: PathBuf,
    state_path: PathBuf,
}

impl BookmarkStore {
    /// Store backed by `path`, with view state in `<stem>.state.json` beside it
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state_path = sidecar_path(&path);
        Self { path, state_path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    /// Read and migrate the envelope.
    ///
    /// A missing or unreadable file yields an empty envelope; a file from a
    /// newer schema is an error.
    pub async fn load(&self) -> Result<BookmarksFile, StoreError> {
        let Some(bytes) = read_optional(&self.path).await? else {
            return Ok(BookmarksFile::default());
        };
        let decoded = String::from_utf8(bytes)
            .map_err(|e| DecodeError::Malformed(e.to_string()))
            .and_then(|raw| {
                if raw.trim().is_empty() {
                    Ok(None)
                } else {
                    schema::decode(&raw).map(Some)
                }
            });

        match decoded {
            Ok(None) => Ok(BookmarksFile::default()),
            Ok(Some(decoded)) => {
                let from = decoded.version();
                if from < CURRENT_VERSION {
                    tracing::debug!(path = ?self.path, from, to = CURRENT_VERSION, "Migrating bookmarks file");
                }
                let mut file = schema::migrate(decoded);
                schema::normalize_targets(&mut file.items);
                Ok(file)
            }
            Err(DecodeError::FutureVersion(found)) => Err(StoreError::FutureVersion {
                path: self.path.clone(),
                found,
                supported: CURRENT_VERSION,
            }),
            Err(DecodeError::Malformed(reason)) => {
                tracing::warn!(path = ?self.path, "Ignoring unreadable bookmarks file: {}", reason);
                Ok(BookmarksFile::default())
            }
        }
    }

    async fn save(&self, file: &BookmarksFile) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(file)
            .map_err(|e| StoreError::serialize(&self.path, e))?;
        write_atomic(&self.path, json.as_bytes()).await
    }

    /// Read-modify-write. `apply` returns `None` to skip the write.
    async fn mutate<T>(
        &self,
        operation: &'static str,
        apply: impl FnOnce(&mut Vec<Bookmark>) -> Option<T>,
    ) -> Result<Option<T>, StoreError> {
        let mut file = self.load().await?;
        let Some(out) = apply(&mut file.items) else {
            return Ok(None);
        };
        file.version = CURRENT_VERSION;
        self.save(&file).await?;
        tracing::debug!(operation, path = ?self.path, count = file.items.len(), "Bookmarks written");
        Ok(Some(out))
    }

    pub async fn list(&self) -> Result<Vec<Bookmark>, StoreError> {
        Ok(self.load().await?.items)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Bookmark>, StoreError> {
        Ok(self.list().await?.into_iter().find(|b| b.id == id))
    }

    /// Labels are not unique; the last match wins.
    pub async fn get_by_label(&self, label: &str) -> Result<Option<Bookmark>, StoreError> {
        Ok(self.list().await?.into_iter().rev().find(|b| b.label == label))
    }

    /// 1-based lookup; anything out of range is `None`.
    pub async fn get_by_slot(&self, slot: usize) -> Result<Option<Bookmark>, StoreError> {
        let mut items = self.list().await?;
        Ok(slot_index(slot, items.len()).map(|i| items.swap_remove(i)))
    }

    /// Append a freshly minted bookmark at slot `len + 1`.
    pub async fn add(&self, new: NewBookmark) -> Result<Bookmark, StoreError> {
        Ok(self.append(new).await?.1)
    }

    /// Like [`add`](Self::add), also returning the slot as of the write.
    pub async fn append(&self, new: NewBookmark) -> Result<(usize, Bookmark), StoreError> {
        let bookmark = new.mint();
        let stored = bookmark.clone();
        let slot = self
            .mutate("add", move |items| {
                items.push(stored);
                Some(items.len())
            })
            .await?
            .unwrap_or_default();
        tracing::info!(id = %bookmark.id, label = %bookmark.label, slot, "Bookmark added");
        Ok((slot, bookmark))
    }

    pub async fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let removed = self
            .mutate("remove", |items| {
                let index = items.iter().position(|b| b.id == id)?;
                Some(items.remove(index))
            })
            .await?;
        if let Some(b) = &removed {
            tracing::info!(id = %b.id, label = %b.label, "Bookmark removed");
        }
        Ok(removed.is_some())
    }

    /// Remove by position; later slots shift down by one.
    pub async fn remove_by_slot(&self, slot: usize) -> Result<bool, StoreError> {
        let removed = self
            .mutate("remove_by_slot", |items| {
                let index = slot_index(slot, items.len())?;
                Some(items.remove(index))
            })
            .await?;
        if let Some(b) = &removed {
            tracing::info!(id = %b.id, slot, "Bookmark removed");
        }
        Ok(removed.is_some())
    }

    /// Change the label in place; id, slot and target are untouched.
    pub async fn rename(&self, id: &str, label: &str) -> Result<bool, StoreError> {
        let renamed = self
            .mutate("rename", |items| {
                let bookmark = items.iter_mut().find(|b| b.id == id)?;
                bookmark.label = label.to_string();
                Some(())
            })
            .await?;
        Ok(renamed.is_some())
    }

    /// Overwrite `slot` with a new bookmark (new id, new timestamps).
    ///
    /// Slot 0 is rejected. A slot past the end appends.
    pub async fn replace(
        &self,
        slot: usize,
        new: NewBookmark,
    ) -> Result<Option<Bookmark>, StoreError> {
        if slot == 0 {
            return Ok(None);
        }

        let bookmark = new.mint();
        let stored = bookmark.clone();
        let previous = self
            .mutate("replace", move |items| {
                let previous = match items.get_mut(slot - 1) {
                    Some(existing) => Some(std::mem::replace(existing, stored)),
                    None => {
                        items.push(stored);
                        None
                    }
                };
                Some(previous)
            })
            .await?
            .flatten();

        match previous {
            Some(old) => tracing::info!(slot, old_id = %old.id, new_id = %bookmark.id, "Bookmark replaced"),
            None => tracing::info!(slot, new_id = %bookmark.id, "Bookmark appended by replace"),
        }
        Ok(Some(bookmark))
    }

    /// Take the bookmark at `from` and reinsert it at `to`.
    ///
    /// Both slots must be in range, otherwise nothing happens and `false` is
    /// returned.
    pub async fn move_slot(&self, from: usize, to: usize) -> Result<bool, StoreError> {
        if from == to {
            let len = self.load().await?.items.len();
            return Ok(slot_index(from, len).is_some());
        }

        let moved = self
            .mutate("move", |items| {
                let len = items.len();
                let from_index = slot_index(from, len)?;
                let to_index = slot_index(to, len)?;
                let bookmark = items.remove(from_index);
                items.insert(to_index, bookmark);
                Some(())
            })
            .await?;
        Ok(moved.is_some())
    }

    /// Bump `meta.lastUsed`; unknown ids are ignored.
    pub async fn touch(&self, id: &str) -> Result<(), StoreError> {
        self.mutate("touch", |items| {
            let bookmark = items.iter_mut().find(|b| b.id == id)?;
            bookmark.meta.last_used = Utc::now().max(bookmark.meta.last_used);
            Some(())
        })
        .await?;
        Ok(())
    }

    pub async fn view_state(&self) -> Result<ViewState, StoreError> {
        let Some(bytes) = read_optional(&self.state_path).await? else {
            return Ok(ViewState::default());
        };
        match serde_json::from_slice(&bytes) {
            Ok(state) => Ok(state),
            Err(e) => {
                tracing::warn!(path = ?self.state_path, "Ignoring unreadable view state: {}", e);
                Ok(ViewState::default())
            }
        }
    }

    /// Record `id` as the most recently viewed bookmark.
    pub async fn record_view(&self, id: &str) -> Result<ViewState, StoreError> {
        let mut state = self.view_state().await?;
        if state.record(id) {
            let json = serde_json::to_string_pretty(&state)
                .map_err(|e| StoreError::serialize(&self.state_path, e))?;
            write_atomic(&self.state_path, json.as_bytes()).await?;
        }
        Ok(state)
    }
}

/// Convert a 1-based slot into an index, if it is in range
fn slot_index(slot: usize, len: usize) -> Option<usize> {
    (1..=len).contains(&slot).then(|| slot - 1)
}

fn sidecar_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("bookmarks");
    path.with_file_name(format!("{}.state.json", stem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookmark::{FallbackDescriptor, StableTarget, TargetKind};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, BookmarkStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = BookmarkStore::new(dir.path().join("bookmarks.json"));
        (dir, store)
    }

    fn request(label: &str) -> NewBookmark {
        NewBookmark::new(
            label,
            TargetKind::Session,
            StableTarget::session("$1"),
            FallbackDescriptor {
                session_name: Some("work".to_string()),
                ..Default::default()
            },
        )
    }

    async fn labels(store: &BookmarkStore) -> Vec<String> {
        store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.label)
            .collect()
    }

    async fn seeded(names: &[&str]) -> (TempDir, BookmarkStore) {
        let (dir, store) = temp_store();
        for name in names {
            store.add(request(name)).await.unwrap();
        }
        (dir, store)
    }

    #[tokio::test]
    async fn test_missing_file_lists_empty() {
        let (_dir, store) = temp_store();
        assert!(store.list().await.unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_add_then_get_round_trip() {
        let (_dir, store) = temp_store();
        let added = store.add(request("api").with_cwd("/src/api")).await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed, vec![added.clone()]);
        assert_eq!(store.get(&added.id).await.unwrap(), Some(added));
    }

    #[tokio::test]
    async fn test_add_appends_in_order() {
        let (_dir, store) = seeded(&["first", "second", "third"]).await;
        assert_eq!(labels(&store).await, vec!["first", "second", "third"]);
        assert_eq!(
            store.get_by_slot(3).await.unwrap().map(|b| b.label),
            Some("third".to_string())
        );
    }

    #[tokio::test]
    async fn test_append_reports_slot_of_its_own_write() {
        let (_dir, store) = seeded(&["first"]).await;
        let other = BookmarkStore::new(store.path());

        let (slot, added) = store.append(request("second")).await.unwrap();
        assert_eq!(slot, 2);

        // Another writer changes the list afterwards; the reported slot stays
        other.remove_by_slot(1).await.unwrap();
        assert_eq!(store.get_by_slot(1).await.unwrap(), Some(added));
    }

    #[tokio::test]
    async fn test_slot_lookup_bounds() {
        let (_dir, store) = seeded(&["a", "b"]).await;
        let items = store.list().await.unwrap();
        for (k, expected) in items.iter().enumerate() {
            assert_eq!(store.get_by_slot(k + 1).await.unwrap().as_ref(), Some(expected));
        }
        assert_eq!(store.get_by_slot(0).await.unwrap(), None);
        assert_eq!(store.get_by_slot(3).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_label_lookup_last_match_wins() {
        let (_dir, store) = temp_store();
        store.add(request("dup")).await.unwrap();
        let second = store.add(request("dup")).await.unwrap();
        assert_eq!(store.get_by_label("dup").await.unwrap(), Some(second));
        assert_eq!(store.get_by_label("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_by_slot_shifts_down() {
        let (_dir, store) = seeded(&["first", "second", "third"]).await;

        assert!(store.remove_by_slot(2).await.unwrap());
        assert_eq!(labels(&store).await, vec!["first", "third"]);
        assert_eq!(
            store.get_by_slot(2).await.unwrap().map(|b| b.label),
            Some("third".to_string())
        );
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop() {
        let (_dir, store) = seeded(&["only"]).await;
        assert!(!store.remove("missing").await.unwrap());
        assert!(!store.remove_by_slot(0).await.unwrap());
        assert!(!store.remove_by_slot(5).await.unwrap());
        assert_eq!(labels(&store).await, vec!["only"]);
    }

    #[tokio::test]
    async fn test_remove_by_id() {
        let (_dir, store) = seeded(&["a", "b"]).await;
        let a = store.get_by_slot(1).await.unwrap().unwrap();
        assert!(store.remove(&a.id).await.unwrap());
        assert_eq!(labels(&store).await, vec!["b"]);
    }

    #[tokio::test]
    async fn test_rename_keeps_identity() {
        let (_dir, store) = seeded(&["a", "b"]).await;
        let before = store.get_by_slot(2).await.unwrap().unwrap();

        assert!(store.rename(&before.id, "renamed").await.unwrap());
        let after = store.get_by_slot(2).await.unwrap().unwrap();
        assert_eq!(after.id, before.id);
        assert_eq!(after.target, before.target);
        assert_eq!(after.meta, before.meta);
        assert_eq!(after.label, "renamed");

        assert!(!store.rename("missing", "x").await.unwrap());
    }

    #[tokio::test]
    async fn test_replace_mints_new_id_in_same_slot() {
        let (_dir, store) = seeded(&["a", "b", "c"]).await;
        let old = store.get_by_slot(2).await.unwrap().unwrap();

        let new = store.replace(2, request("b2")).await.unwrap().unwrap();
        assert_ne!(new.id, old.id);
        assert!(new.meta.created_at >= old.meta.created_at);
        assert_eq!(labels(&store).await, vec!["a", "b2", "c"]);
        assert_eq!(store.get(&old.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_replace_rejects_slot_zero_and_appends_past_end() {
        let (_dir, store) = seeded(&["a"]).await;
        assert_eq!(store.replace(0, request("x")).await.unwrap(), None);

        store.replace(7, request("tail")).await.unwrap().unwrap();
        assert_eq!(labels(&store).await, vec!["a", "tail"]);
    }

    #[tokio::test]
    async fn test_move_is_a_permutation() {
        let (_dir, store) = seeded(&["a", "b", "c", "d"]).await;
        let before = store.list().await.unwrap();

        assert!(store.move_slot(1, 3).await.unwrap());
        let after = store.list().await.unwrap();
        assert_eq!(after[2], before[0]);
        assert_eq!(labels(&store).await, vec!["b", "c", "a", "d"]);

        let mut ids_before: Vec<_> = before.iter().map(|b| b.id.clone()).collect();
        let mut ids_after: Vec<_> = after.iter().map(|b| b.id.clone()).collect();
        ids_before.sort();
        ids_after.sort();
        assert_eq!(ids_before, ids_after);

        assert!(store.move_slot(4, 1).await.unwrap());
        assert_eq!(labels(&store).await, vec!["d", "b", "c", "a"]);
    }

    #[tokio::test]
    async fn test_move_out_of_range_is_noop() {
        let (_dir, store) = seeded(&["a", "b"]).await;
        assert!(!store.move_slot(0, 1).await.unwrap());
        assert!(!store.move_slot(1, 3).await.unwrap());
        assert!(!store.move_slot(3, 3).await.unwrap());
        assert!(store.move_slot(2, 2).await.unwrap());
        assert_eq!(labels(&store).await, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_touch_updates_last_used_only() {
        let (_dir, store) = seeded(&["a"]).await;
        let before = store.get_by_slot(1).await.unwrap().unwrap();

        store.touch(&before.id).await.unwrap();
        let after = store.get(&before.id).await.unwrap().unwrap();
        assert!(after.meta.last_used >= before.meta.last_used);
        assert_eq!(after.meta.created_at, before.meta.created_at);
        assert_eq!(after.label, before.label);

        store.touch("missing").await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_file_reads_as_empty() {
        let (_dir, store) = temp_store();
        std::fs::write(store.path(), "{ this is not json").unwrap();

        assert!(store.list().await.unwrap().is_empty());

        // The next write replaces the damaged file with a valid one
        store.add(request("fresh")).await.unwrap();
        assert_eq!(labels(&store).await, vec!["fresh"]);
    }

    #[tokio::test]
    async fn test_hand_edited_target_is_narrowed_on_load() {
        let (_dir, store) = temp_store();
        std::fs::write(
            store.path(),
            r#"{
                "version": 2,
                "items": [{
                    "id": "s1",
                    "label": "work",
                    "kind": "session",
                    "target": {"sessionId": "$1", "windowId": "@2"},
                    "fallback": {"sessionName": "work"},
                    "meta": {
                        "createdAt": "2025-01-01T00:00:00Z",
                        "lastUsed": "2025-01-01T00:00:00Z"
                    }
                }]
            }"#,
        )
        .unwrap();

        let items = store.list().await.unwrap();
        assert_eq!(items[0].target, StableTarget::session("$1"));
    }

    #[tokio::test]
    async fn test_non_utf8_files_read_as_empty() {
        let (_dir, store) = temp_store();
        std::fs::write(store.path(), [0xff, 0xfe, 0x00, 0x7b]).unwrap();
        std::fs::write(store.state_path(), [0xff, 0xfe]).unwrap();

        assert!(store.list().await.unwrap().is_empty());
        assert_eq!(store.view_state().await.unwrap(), ViewState::default());

        let added = store.add(request("fresh")).await.unwrap();
        assert_eq!(labels(&store).await, vec!["fresh"]);
        let state = store.record_view(&added.id).await.unwrap();
        assert_eq!(state.last_viewed_id.as_deref(), Some(added.id.as_str()));
    }

    #[tokio::test]
    async fn test_future_version_is_an_error() {
        let (_dir, store) = temp_store();
        std::fs::write(store.path(), r#"{"version": 99, "items": []}"#).unwrap();

        let err = store.list().await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::FutureVersion {
                found: 99,
                supported: CURRENT_VERSION,
                ..
            }
        ));
        assert!(store.add(request("x")).await.is_err());
    }

    #[tokio::test]
    async fn test_v1_file_is_upgraded_on_next_write() {
        let (_dir, store) = temp_store();
        std::fs::write(
            store.path(),
            r#"{"version": 1, "items": [{"id": "old", "label": "legacy", "kind": "session",
                "sessionId": "$2", "sessionName": "ops", "createdAt": "2024-01-01T00:00:00Z"}]}"#,
        )
        .unwrap();

        let legacy = store.get("old").await.unwrap().unwrap();
        assert_eq!(legacy.fallback.session_name.as_deref(), Some("ops"));

        // A pure read leaves the file alone
        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["version"], 1);

        store.add(request("new")).await.unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["version"], CURRENT_VERSION);
        assert_eq!(raw["items"][0]["target"]["sessionId"], "$2");
        assert_eq!(labels(&store).await, vec!["legacy", "new"]);
    }

    #[tokio::test]
    async fn test_write_visible_to_fresh_instance() {
        let (_dir, store) = temp_store();
        let added = store.add(request("shared")).await.unwrap();

        let other = BookmarkStore::new(store.path());
        assert_eq!(other.get(&added.id).await.unwrap(), Some(added));
    }

    #[tokio::test]
    async fn test_interrupted_write_leaves_previous_file() {
        let (dir, store) = seeded(&["kept"]).await;

        // A temp file from a write that never reached rename
        std::fs::write(dir.path().join(".bookmarks.json.deadbeef.tmp"), "{ partial").unwrap();

        assert_eq!(labels(&BookmarkStore::new(store.path())).await, vec!["kept"]);
    }

    #[tokio::test]
    async fn test_last_writer_wins_across_instances() {
        let (_dir, store) = seeded(&["base"]).await;
        let other = BookmarkStore::new(store.path());

        // Both instances read the same starting point, then write in turn
        let stale = store.load().await.unwrap();
        other.add(request("from-other")).await.unwrap();
        store.save(&stale).await.unwrap();

        assert_eq!(labels(&other).await, vec!["base"]);
    }

    #[tokio::test]
    async fn test_view_state_sidecar() {
        let (_dir, store) = temp_store();
        assert_eq!(store.view_state().await.unwrap(), ViewState::default());
        assert_eq!(
            store.state_path().file_name().and_then(|n| n.to_str()),
            Some("bookmarks.state.json")
        );

        store.record_view("a").await.unwrap();
        let state = store.record_view("b").await.unwrap();
        assert_eq!(state.prev_viewed_id.as_deref(), Some("a"));

        let reread = BookmarkStore::new(store.path()).view_state().await.unwrap();
        assert_eq!(reread, state);

        std::fs::write(store.state_path(), "garbage").unwrap();
        assert_eq!(store.view_state().await.unwrap(), ViewState::default());
    }
}
