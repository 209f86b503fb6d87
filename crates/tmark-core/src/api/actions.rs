//! Action methods on [`TmarkCore`].
//!
//! These methods write the store or switch the tmux client.

use crate::bookmark::{Bookmark, BookmarkRef, TargetKind};
use crate::resolver::Resolution;
use crate::snapshot::SnapshotProvider;

use super::core::TmarkCore;
use super::types::{ApiError, JumpOutcome};

impl<P: SnapshotProvider> TmarkCore<P> {
    /// Bookmark the pane the user is in, appended at the end
    pub async fn add_current(&self, label: &str, kind: TargetKind) -> Result<Bookmark, ApiError> {
        Ok(self.add_current_with_slot(label, kind).await?.1)
    }

    /// [`add_current`](Self::add_current) plus the slot the bookmark landed in
    pub async fn add_current_with_slot(
        &self,
        label: &str,
        kind: TargetKind,
    ) -> Result<(usize, Bookmark), ApiError> {
        let location = self.provider().current_location().await?;
        let request = location.to_new_bookmark(label, kind).with_host(self.host());
        Ok(self.store().append(request).await?)
    }

    /// Overwrite `slot` with the current location under a new id
    pub async fn replace_current(
        &self,
        slot: usize,
        label: &str,
        kind: TargetKind,
    ) -> Result<Bookmark, ApiError> {
        if slot == 0 {
            return Err(ApiError::InvalidSlot { slot });
        }
        let location = self.provider().current_location().await?;
        let request = location.to_new_bookmark(label, kind).with_host(self.host());
        self.store()
            .replace(slot, request)
            .await?
            .ok_or(ApiError::InvalidSlot { slot })
    }

    /// Remove a bookmark, returning what was removed
    pub async fn remove(&self, reference: &BookmarkRef) -> Result<Bookmark, ApiError> {
        let bookmark = self.require(reference).await?;
        if !self.store().remove(&bookmark.id).await? {
            // Removed by someone else between the lookup and the write
            return Err(ApiError::BookmarkNotFound {
                reference: reference.to_string(),
            });
        }
        Ok(bookmark)
    }

    /// Relabel a bookmark in place
    pub async fn rename(&self, reference: &BookmarkRef, label: &str) -> Result<Bookmark, ApiError> {
        let mut bookmark = self.require(reference).await?;
        if !self.store().rename(&bookmark.id, label).await? {
            return Err(ApiError::BookmarkNotFound {
                reference: reference.to_string(),
            });
        }
        bookmark.label = label.to_string();
        Ok(bookmark)
    }

    pub async fn move_slot(&self, from: usize, to: usize) -> Result<(), ApiError> {
        if self.store().move_slot(from, to).await? {
            Ok(())
        } else {
            Err(ApiError::InvalidMove { from, to })
        }
    }

    /// Resolve, switch, then record usage.
    pub async fn jump(&self, reference: &BookmarkRef) -> Result<JumpOutcome, ApiError> {
        let bookmark = self.require(reference).await?;
        self.jump_to(bookmark).await
    }

    /// Jump to the bookmark viewed before the current one
    pub async fn jump_previous(&self) -> Result<JumpOutcome, ApiError> {
        let state = self.store().view_state().await?;
        let id = state.prev_viewed_id.ok_or(ApiError::NoPrevious)?;
        let bookmark = self
            .store()
            .get(&id)
            .await?
            .ok_or_else(|| ApiError::BookmarkNotFound {
                reference: id.clone(),
            })?;
        self.jump_to(bookmark).await
    }

    async fn jump_to(&self, bookmark: Bookmark) -> Result<JumpOutcome, ApiError> {
        let (method, target) = match self.resolve(&bookmark).await? {
            Resolution::Resolved { method, target } => (method, target),
            Resolution::Unresolved { reason } => {
                return Err(ApiError::Unresolved {
                    label: bookmark.label,
                    reason,
                })
            }
        };

        self.provider().switch_to(&target).await?;
        tracing::info!(id = %bookmark.id, %method, %target, "Jumped to bookmark");

        self.store().touch(&bookmark.id).await?;
        self.store().record_view(&bookmark.id).await?;

        Ok(JumpOutcome {
            bookmark,
            method,
            target,
        })
    }
}
