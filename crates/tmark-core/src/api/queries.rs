//! Read-only query methods on [`TmarkCore`].

use crate::bookmark::{Bookmark, BookmarkRef};
use crate::resolver::{self, Resolution};
use crate::snapshot::SnapshotProvider;

use super::core::TmarkCore;
use super::types::{ApiError, DoctorEntry};

impl<P: SnapshotProvider> TmarkCore<P> {
    /// All bookmarks in slot order
    pub async fn list(&self) -> Result<Vec<Bookmark>, ApiError> {
        Ok(self.store().list().await?)
    }

    /// Look a bookmark up by slot, or by id then label
    pub async fn find(&self, reference: &BookmarkRef) -> Result<Option<Bookmark>, ApiError> {
        let found = match reference {
            BookmarkRef::Slot(slot) => self.store().get_by_slot(*slot).await?,
            BookmarkRef::Key(key) => match self.store().get(key).await? {
                Some(bookmark) => Some(bookmark),
                None => self.store().get_by_label(key).await?,
            },
        };
        Ok(found)
    }

    /// Like [`find`](Self::find) but a miss is an error
    pub async fn require(&self, reference: &BookmarkRef) -> Result<Bookmark, ApiError> {
        self.find(reference)
            .await?
            .ok_or_else(|| ApiError::BookmarkNotFound {
                reference: reference.to_string(),
            })
    }

    /// Resolve against a freshly fetched snapshot
    pub async fn resolve(&self, bookmark: &Bookmark) -> Result<Resolution, ApiError> {
        let snapshot = self.provider().snapshot().await?;
        Ok(resolver::resolve(bookmark, &snapshot))
    }

    /// Resolve every bookmark against one snapshot, without switching or writing.
    pub async fn doctor(&self) -> Result<Vec<DoctorEntry>, ApiError> {
        let bookmarks = self.store().list().await?;
        let snapshot = self.provider().snapshot().await?;

        Ok(bookmarks
            .into_iter()
            .enumerate()
            .map(|(i, bookmark)| DoctorEntry {
                slot: i + 1,
                resolution: resolver::resolve(&bookmark, &snapshot),
                bookmark,
            })
            .collect())
    }
}
