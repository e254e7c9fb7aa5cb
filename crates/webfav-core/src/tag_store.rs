//! Tag store
//!
//! CRUD over the `tags` collection. Bookmarks refer to tags by name, so a
//! rename or delete also rewrites every bookmark that carries the name. Both
//! collections are read in one substrate call and written back in one
//! substrate call.
//!
//! Usage counts only grow: `increment_usage` is called once per bookmark
//! save, and deleting a bookmark leaves counts alone.

use std::sync::Arc;

use tracing::{debug, info};

use crate::access::{self, Write};
use crate::error::{Operation, StoreResult};
use crate::models::{Bookmark, Tag};
use crate::storage::{keys, KeyValueStore};

/// Store for the tag collection
pub struct TagStore {
    substrate: Arc<dyn KeyValueStore>,
}

impl TagStore {
    /// Create a store over a substrate
    pub fn new(substrate: Arc<dyn KeyValueStore>) -> Self {
        Self { substrate }
    }

    async fn load(&self, op: Operation) -> StoreResult<Vec<Tag>> {
        let record = access::read(self.substrate.as_ref(), &[keys::TAGS], op).await?;
        access::collection(&record, keys::TAGS, op)
    }

    async fn load_with_bookmarks(&self, op: Operation) -> StoreResult<(Vec<Tag>, Vec<Bookmark>)> {
        let record =
            access::read(self.substrate.as_ref(), &[keys::TAGS, keys::BOOKMARKS], op).await?;
        let tags = access::collection(&record, keys::TAGS, op)?;
        let bookmarks = access::collection(&record, keys::BOOKMARKS, op)?;
        Ok((tags, bookmarks))
    }

    async fn store(&self, tags: &[Tag], op: Operation) -> StoreResult<()> {
        Write::new(op)
            .entry(keys::TAGS, &tags)?
            .commit(self.substrate.as_ref())
            .await
    }

    async fn store_with_bookmarks(
        &self,
        tags: &[Tag],
        bookmarks: &[Bookmark],
        op: Operation,
    ) -> StoreResult<()> {
        Write::new(op)
            .entry(keys::TAGS, &tags)?
            .entry(keys::BOOKMARKS, &bookmarks)?
            .commit(self.substrate.as_ref())
            .await
    }

    /// All tags in insertion order
    pub async fn list(&self) -> StoreResult<Vec<Tag>> {
        self.load(Operation::ListTags).await
    }

    /// Append an already-built tag
    pub async fn insert(&self, tag: &Tag) -> StoreResult<()> {
        let op = Operation::CreateTag;
        let mut tags = self.load(op).await?;
        tags.push(tag.clone());
        self.store(&tags, op).await
    }

    /// Create an unused tag and append it
    ///
    /// Existing tags with the same name are not checked for.
    pub async fn create(&self, tag: Tag) -> StoreResult<Tag> {
        self.insert(&tag).await?;
        debug!("Created tag {} ({})", tag.name, tag.id);
        Ok(tag)
    }

    /// Bump the count of every tag whose name is in `names`
    pub async fn increment_usage<S: AsRef<str>>(&self, names: &[S]) -> StoreResult<()> {
        let op = Operation::IncrementTagUsage;
        let mut tags = self.load(op).await?;

        for tag in tags
            .iter_mut()
            .filter(|t| names.iter().any(|n| n.as_ref() == t.name))
        {
            tag.count = tag.count.saturating_add(1);
        }

        self.store(&tags, op).await
    }

    /// Rename a tag and rewrite the old name on every bookmark
    ///
    /// Returns `false` without writing when no tag has that id.
    pub async fn rename(&self, id: &str, new_name: &str) -> StoreResult<bool> {
        let op = Operation::RenameTag;
        let (mut tags, mut bookmarks) = self.load_with_bookmarks(op).await?;

        let Some(tag) = tags.iter_mut().find(|t| t.id == id) else {
            debug!("Rename of unknown tag {} ignored", id);
            return Ok(false);
        };
        let old_name = std::mem::replace(&mut tag.name, new_name.to_string());

        let rewritten = bookmarks
            .iter_mut()
            .map(|b| b.replace_tag_name(&old_name, new_name))
            .filter(|changed| *changed)
            .count();

        self.store_with_bookmarks(&tags, &bookmarks, op).await?;
        info!(
            "Renamed tag '{}' to '{}' on {} bookmark(s)",
            old_name, new_name, rewritten
        );
        Ok(true)
    }

    /// Delete a tag and remove its name from every bookmark
    ///
    /// Returns `false` without writing when no tag has that id.
    pub async fn delete(&self, id: &str) -> StoreResult<bool> {
        let op = Operation::DeleteTag;
        let (mut tags, mut bookmarks) = self.load_with_bookmarks(op).await?;

        let Some(name) = tags.iter().find(|t| t.id == id).map(|t| t.name.clone()) else {
            debug!("Delete of unknown tag {} ignored", id);
            return Ok(false);
        };
        tags.retain(|t| t.id != id);

        let stripped = bookmarks
            .iter_mut()
            .map(|b| b.strip_tag_name(&name))
            .filter(|changed| *changed)
            .count();

        self.store_with_bookmarks(&tags, &bookmarks, op).await?;
        info!("Deleted tag '{}' from {} bookmark(s)", name, stripped);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookmarks::BookmarkStore;
    use crate::error::StoreError;
    use crate::storage::MemoryStore;
    use chrono::Utc;

    struct Fixture {
        substrate: Arc<MemoryStore>,
        tags: TagStore,
        bookmarks: BookmarkStore,
    }

    fn setup() -> Fixture {
        let substrate = Arc::new(MemoryStore::new());
        Fixture {
            tags: TagStore::new(substrate.clone()),
            bookmarks: BookmarkStore::new(substrate.clone()),
            substrate,
        }
    }

    fn tag(id: &str, name: &str) -> Tag {
        Tag {
            id: id.to_string(),
            name: name.to_string(),
            count: 0,
            color: None,
            created_at: Utc::now(),
        }
    }

    fn bookmark(id: &str, tags: &[&str]) -> Bookmark {
        let mut b = Bookmark::with_id(id, id, "https://example.com").unwrap();
        b.tags = tags.iter().map(|t| t.to_string()).collect();
        b
    }

    async fn seed(f: &Fixture) {
        f.tags.insert(&tag("1", "react")).await.unwrap();
        f.tags.insert(&tag("2", "ts")).await.unwrap();
        f.bookmarks
            .save(&bookmark("b1", &["react", "ts"]))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_appends_unused_tag() {
        let f = setup();
        let created = f.tags.create(Tag::new("rust").unwrap()).await.unwrap();

        let tags = f.tags.list().await.unwrap();
        assert_eq!(tags, vec![created]);
        assert_eq!(tags[0].count, 0);
    }

    #[tokio::test]
    async fn test_create_allows_duplicate_names() {
        let f = setup();
        f.tags.create(Tag::new("rust").unwrap()).await.unwrap();
        f.tags.create(Tag::new("rust").unwrap()).await.unwrap();

        let tags = f.tags.list().await.unwrap();
        assert_eq!(tags.len(), 2);
        assert_ne!(tags[0].id, tags[1].id);
    }

    #[tokio::test]
    async fn test_increment_usage() {
        let f = setup();
        seed(&f).await;

        f.tags.increment_usage(&["react", "unknown"]).await.unwrap();
        f.tags.increment_usage(&["react"]).await.unwrap();

        let tags = f.tags.list().await.unwrap();
        assert_eq!(tags[0].count, 2);
        assert_eq!(tags[1].count, 0);
    }

    #[tokio::test]
    async fn test_increment_usage_empty_set() {
        let f = setup();
        seed(&f).await;
        f.tags.increment_usage(&["ts"]).await.unwrap();
        let before = f.tags.list().await.unwrap();

        let empty: [&str; 0] = [];
        f.tags.increment_usage(&empty).await.unwrap();

        assert_eq!(f.tags.list().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_rename_cascades_to_bookmarks() {
        let f = setup();
        seed(&f).await;

        assert!(f.tags.rename("1", "reactjs").await.unwrap());

        let tags = f.tags.list().await.unwrap();
        assert_eq!(tags[0].id, "1");
        assert_eq!(tags[0].name, "reactjs");

        let b1 = f.bookmarks.get("b1").await.unwrap().unwrap();
        assert_eq!(b1.tags, vec!["reactjs", "ts"]);
    }

    #[tokio::test]
    async fn test_rename_leaves_no_old_references() {
        let f = setup();
        seed(&f).await;
        f.bookmarks.save(&bookmark("b2", &["react"])).await.unwrap();
        f.bookmarks.save(&bookmark("b3", &["ts"])).await.unwrap();

        f.tags.rename("1", "reactjs").await.unwrap();

        let bookmarks = f.bookmarks.list().await.unwrap();
        assert!(bookmarks.iter().all(|b| !b.has_tag("react")));
        assert_eq!(bookmarks[2].tags, vec!["ts"]);
    }

    #[tokio::test]
    async fn test_rename_is_single_write() {
        let f = setup();
        seed(&f).await;
        let writes = f.substrate.write_count();

        f.tags.rename("1", "reactjs").await.unwrap();

        assert_eq!(f.substrate.write_count(), writes + 1);
    }

    #[tokio::test]
    async fn test_rename_missing_is_noop() {
        let f = setup();
        seed(&f).await;
        let writes = f.substrate.write_count();

        assert!(!f.tags.rename("ghost", "anything").await.unwrap());

        assert_eq!(f.substrate.write_count(), writes);
        let b1 = f.bookmarks.get("b1").await.unwrap().unwrap();
        assert_eq!(b1.tags, vec!["react", "ts"]);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_bookmarks() {
        let f = setup();
        seed(&f).await;
        f.tags.increment_usage(&["ts"]).await.unwrap();

        assert!(f.tags.delete("1").await.unwrap());

        let tags = f.tags.list().await.unwrap();
        assert!(tags.iter().all(|t| t.id != "1"));
        assert_eq!(tags[0].count, 1);

        let b1 = f.bookmarks.get("b1").await.unwrap().unwrap();
        assert_eq!(b1.tags, vec!["ts"]);
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let f = setup();
        seed(&f).await;
        let writes = f.substrate.write_count();

        assert!(!f.tags.delete("ghost").await.unwrap());
        assert_eq!(f.substrate.write_count(), writes);
        assert_eq!(f.tags.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_cascade_write_failure_leaves_state_untouched() {
        let f = setup();
        seed(&f).await;
        f.substrate.set_fail_writes(true);

        let err = f.tags.rename("1", "reactjs").await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::WriteFailure {
                op: Operation::RenameTag,
                ..
            }
        ));
        assert_eq!(err.to_string(), "failed to rename tag");

        f.substrate.set_fail_writes(false);
        assert_eq!(f.tags.list().await.unwrap()[0].name, "react");
    }

    #[tokio::test]
    async fn test_read_failure_on_delete() {
        let f = setup();
        f.substrate.set_fail_reads(true);

        let err = f.tags.delete("1").await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::ReadFailure {
                op: Operation::DeleteTag,
                ..
            }
        ));
    }
}
