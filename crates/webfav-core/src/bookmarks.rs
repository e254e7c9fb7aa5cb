//! Bookmark store
//!
//! CRUD over the `bookmarks` collection. Every mutation reads the whole
//! collection, changes it in memory, and writes the whole collection back.
//! The read and the write are separate substrate calls, so two overlapping
//! mutations can lose one of the updates.
//!
//! Updating or deleting an id that is not stored does nothing and is not an
//! error. Those calls are counted in [`BookmarkStore::noop_writes`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::access::{self, Write};
use crate::error::{Operation, StoreResult};
use crate::models::Bookmark;
use crate::storage::{keys, KeyValueStore};

/// Store for the bookmark collection
pub struct BookmarkStore {
    substrate: Arc<dyn KeyValueStore>,
    noop_writes: AtomicU64,
}

impl BookmarkStore {
    /// Create a store over a substrate
    pub fn new(substrate: Arc<dyn KeyValueStore>) -> Self {
        Self {
            substrate,
            noop_writes: AtomicU64::new(0),
        }
    }

    async fn load(&self, op: Operation) -> StoreResult<Vec<Bookmark>> {
        let record = access::read(self.substrate.as_ref(), &[keys::BOOKMARKS], op).await?;
        access::collection(&record, keys::BOOKMARKS, op)
    }

    async fn store(&self, bookmarks: &[Bookmark], op: Operation) -> StoreResult<()> {
        Write::new(op)
            .entry(keys::BOOKMARKS, &bookmarks)?
            .commit(self.substrate.as_ref())
            .await
    }

    fn record_noop(&self, what: &str, id: &str) {
        self.noop_writes.fetch_add(1, Ordering::Relaxed);
        debug!("{} of unknown bookmark {} ignored", what, id);
    }

    /// Append a bookmark. Duplicate ids are not rejected.
    pub async fn save(&self, bookmark: &Bookmark) -> StoreResult<()> {
        let op = Operation::SaveBookmark;
        let mut bookmarks = self.load(op).await?;
        bookmarks.push(bookmark.clone());
        self.store(&bookmarks, op).await
    }

    /// All bookmarks in insertion order
    pub async fn list(&self) -> StoreResult<Vec<Bookmark>> {
        self.load(Operation::ListBookmarks).await
    }

    /// The first bookmark with this id
    pub async fn get(&self, id: &str) -> StoreResult<Option<Bookmark>> {
        let bookmarks = self.load(Operation::ListBookmarks).await?;
        Ok(bookmarks.into_iter().find(|b| b.id == id))
    }

    /// Replace the first bookmark with the same id, keeping its position
    ///
    /// Returns `false` without writing when no bookmark has that id.
    pub async fn update(&self, bookmark: &Bookmark) -> StoreResult<bool> {
        let op = Operation::UpdateBookmark;
        let mut bookmarks = self.load(op).await?;

        let Some(slot) = bookmarks.iter_mut().find(|b| b.id == bookmark.id) else {
            self.record_noop("Update", &bookmark.id);
            return Ok(false);
        };
        *slot = bookmark.clone();

        self.store(&bookmarks, op).await?;
        Ok(true)
    }

    /// Remove every bookmark with this id
    ///
    /// The collection is written back even when nothing matched. Returns
    /// whether anything was removed.
    pub async fn delete(&self, id: &str) -> StoreResult<bool> {
        let op = Operation::DeleteBookmark;
        let mut bookmarks = self.load(op).await?;

        let before = bookmarks.len();
        bookmarks.retain(|b| b.id != id);
        let removed = bookmarks.len() != before;
        if !removed {
            self.record_noop("Delete", id);
        }

        self.store(&bookmarks, op).await?;
        Ok(removed)
    }

    /// Number of update/delete calls that matched no bookmark
    pub fn noop_writes(&self) -> u64 {
        self.noop_writes.load(Ordering::Relaxed)
    }
}
