//! webfav Core Library
//!
//! This crate provides the store layer for webfav, a bookmark manager that
//! keeps bookmarks, tags, and settings in a key-value substrate.
//!
//! # Architecture
//!
//! - **Substrate**: an async key-value store holding three JSON entries
//!   (`bookmarks`, `tags`, `settings`). SQLite on disk, or in memory for tests.
//! - **Stores**: every mutation reads a whole collection, changes it in
//!   memory, and writes the whole collection back.
//!
//! Bookmarks refer to tags by name, so renaming or deleting a tag rewrites
//! every bookmark that carries it.
//!
//! # Quick Start
//!
//! ```text
//! let library = Library::open(&Config::load()?)?;
//! library.initialize().await?;
//!
//! let saved = library.save_bookmark(draft).await?;
//! let hits = library.search("rust").await?;
//! ```
//!
//! # Modules
//!
//! - `library`: Unified entry point
//! - `bookmarks`, `tag_store`, `settings`: Stores over the substrate
//! - `models`: Bookmarks, tags, and settings
//! - `tags`, `search`: Normalization, filtering, and tag presentation
//! - `theme`: Effective theme resolution
//! - `storage`: Substrate trait and implementations
//! - `config`: Application configuration

mod access;
pub mod bookmarks;
pub mod config;
pub mod error;
pub mod id;
pub mod library;
pub mod models;
pub mod search;
pub mod settings;
pub mod storage;
pub mod tag_store;
pub mod tags;
pub mod theme;

pub use bookmarks::BookmarkStore;
pub use config::Config;
pub use error::{Operation, StoreError, StoreResult, ValidationError};
pub use id::generate_id;
pub use library::{Library, LibraryStats};
pub use models::{
    Bookmark, BookmarkDraft, DefaultView, PageInfo, Settings, SettingsPatch, Tag, TagsDisplay,
    Theme,
};
pub use settings::SettingsStore;
pub use storage::{KeyValueStore, MemoryStore, Record, SqliteStore, SubstrateError};
pub use tag_store::TagStore;
pub use tags::{normalize_tag, normalize_tags, TagSort};
pub use theme::{
    follow_theme, resolve_effective_theme, watch_theme, Appearance, AppearanceSignal,
    ThemeSubscription,
};
