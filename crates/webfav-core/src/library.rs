//! Unified entry point
//!
//! A `Library` owns one substrate handle and the three stores built on it.
//! It also carries the flows that span stores: first-run initialization and
//! saving a bookmark from a form.
//!
//! ## Usage
//!
//! ```ignore
//! let library = Library::open(&Config::load()?)?;
//! library.initialize().await?;
//!
//! let mut draft = BookmarkDraft::from_page(page);
//! draft.tags = vec!["Rust".into(), "async".into()];
//! let saved = library.save_bookmark(draft).await?;
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::access::{self, Write};
use crate::bookmarks::BookmarkStore;
use crate::config::Config;
use crate::error::{Operation, ValidationError};
use crate::models::{Bookmark, BookmarkDraft, Settings, Tag};
use crate::search;
use crate::settings::SettingsStore;
use crate::storage::{keys, KeyValueStore, SqliteStore};
use crate::tag_store::TagStore;
use crate::tags::normalize_tag;
use crate::theme::{
    follow_theme, resolve_effective_theme, Appearance, AppearanceSignal, ThemeSubscription,
};

/// Collection sizes for status reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LibraryStats {
    pub bookmarks: usize,
    pub tags: usize,
}

/// Bookmark, tag and settings stores over a shared substrate
pub struct Library {
    substrate: Arc<dyn KeyValueStore>,
    bookmarks: BookmarkStore,
    tags: TagStore,
    settings: SettingsStore,
}

impl Library {
    /// Build a library over any substrate
    pub fn new(substrate: Arc<dyn KeyValueStore>) -> Self {
        Self {
            bookmarks: BookmarkStore::new(substrate.clone()),
            tags: TagStore::new(substrate.clone()),
            settings: SettingsStore::new(substrate.clone()),
            substrate,
        }
    }

    /// Open the SQLite database under the configured data directory
    pub fn open(config: &Config) -> Result<Self> {
        let path = config.database_path();
        let substrate = SqliteStore::open(&path)
            .with_context(|| format!("Failed to open database: {:?}", path))?;
        Ok(Self::new(Arc::new(substrate)))
    }

    pub fn bookmarks(&self) -> &BookmarkStore {
        &self.bookmarks
    }

    pub fn tags(&self) -> &TagStore {
        &self.tags
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Seed an empty bookmark collection and default settings
    ///
    /// Entries that already exist are left untouched. Returns whether
    /// anything was written.
    pub async fn initialize(&self) -> Result<bool> {
        let op = Operation::Initialize;
        let record = access::read(
            self.substrate.as_ref(),
            &[keys::BOOKMARKS, keys::SETTINGS],
            op,
        )
        .await?;

        let mut write = Write::new(op);
        let mut seeded = Vec::new();
        if !record.contains_key(keys::BOOKMARKS) {
            write = write.entry(keys::BOOKMARKS, &Vec::<Bookmark>::new())?;
            seeded.push(keys::BOOKMARKS);
        }
        if !record.contains_key(keys::SETTINGS) {
            write = write.entry(keys::SETTINGS, &Settings::default())?;
            seeded.push(keys::SETTINGS);
        }

        if seeded.is_empty() {
            return Ok(false);
        }
        write
            .commit(self.substrate.as_ref())
            .await
            .context("Failed to initialize library")?;
        info!("Initialized {}", seeded.join(", "));
        Ok(true)
    }

    /// Save a bookmark from form data
    ///
    /// Tags are normalized, tags not yet known by name are created, the
    /// bookmark is appended, and usage counts are bumped for its tags.
    pub async fn save_bookmark(&self, draft: BookmarkDraft) -> Result<Bookmark> {
        let bookmark = draft.into_bookmark().context("Invalid bookmark")?;

        self.ensure_tags(&bookmark.tags).await?;
        self.bookmarks.save(&bookmark).await?;
        self.tags.increment_usage(&bookmark.tags).await?;

        info!("Saved bookmark {} ({})", bookmark.title, bookmark.id);
        Ok(bookmark)
    }

    /// Create an unused tag for every name not already known
    ///
    /// Returns the tags that were created.
    pub async fn ensure_tags(&self, names: &[String]) -> Result<Vec<Tag>> {
        let known = self.tags.list().await?;
        let mut created: Vec<Tag> = Vec::new();
        for name in names {
            let exists = known.iter().chain(created.iter()).any(|t| &t.name == name);
            if exists {
                continue;
            }
            let tag = Tag::new(name).context("Invalid tag")?;
            created.push(self.tags.create(tag).await?);
        }
        Ok(created)
    }

    /// Create a standalone tag by name, optionally with a display colour
    pub async fn create_tag(&self, name: &str, color: Option<&str>) -> Result<Tag> {
        let mut tag = Tag::new(name).context("Invalid tag")?;
        if let Some(color) = color {
            tag = tag.with_color(color);
        }
        Ok(self.tags.create(tag).await?)
    }

    /// Rename a tag and every bookmark reference to it
    ///
    /// The new name is canonicalized like bookmark tags. Returns `false` when
    /// no tag has that id.
    pub async fn rename_tag(&self, id: &str, new_name: &str) -> Result<bool> {
        let name = normalize_tag(new_name);
        if name.is_empty() {
            return Err(anyhow::Error::new(ValidationError::Blank { field: "tag name" })
                .context("Invalid tag"));
        }
        Ok(self.tags.rename(id, &name).await?)
    }

    /// Bookmarks matching a free-text query
    pub async fn search(&self, query: &str) -> Result<Vec<Bookmark>> {
        let bookmarks = self.bookmarks.list().await?;
        Ok(search::filter_bookmarks(&bookmarks, query)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Bookmarks carrying every one of the selected tags
    pub async fn with_tags(&self, selected: &[String]) -> Result<Vec<Bookmark>> {
        let bookmarks = self.bookmarks.list().await?;
        Ok(search::filter_by_tags(&bookmarks, selected)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Number of stored bookmarks and tags
    pub async fn stats(&self) -> Result<LibraryStats> {
        let bookmarks = self.bookmarks.list().await?.len();
        let tags = self.tags.list().await?.len();
        Ok(LibraryStats { bookmarks, tags })
    }

    /// The theme to display given the host's current appearance
    pub async fn effective_theme(&self, host: Appearance) -> Result<Appearance> {
        let settings = self.settings.get().await?;
        Ok(resolve_effective_theme(settings.theme, host))
    }

    /// Follow the host appearance with the stored theme preference
    ///
    /// Theme changes made through this library's settings store are picked
    /// up too. Changes written by another process are not seen.
    pub async fn watch_effective_theme<F>(
        &self,
        signal: &AppearanceSignal,
        on_change: F,
    ) -> Result<ThemeSubscription>
    where
        F: FnMut(Appearance) + Send + 'static,
    {
        self.settings.get().await?;
        Ok(follow_theme(
            self.settings.subscribe_theme(),
            signal.subscribe(),
            on_change,
        ))
    }
}
