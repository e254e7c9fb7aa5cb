//! Data models for webfav
//!
//! Defines the persisted records: Bookmark, Tag, and Settings.
//! Field names serialize in camelCase and timestamps as epoch milliseconds,
//! which is the layout stored under the `bookmarks`, `tags`, and `settings`
//! entries of the substrate.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::generate_id;
use crate::tags::{normalize_tag, normalize_tags};

/// Current time at the precision the substrate keeps
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Blank { field })
    } else {
        Ok(trimmed.to_string())
    }
}

/// A saved web page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    /// Opaque identifier, assigned once at creation
    pub id: String,
    /// Page title
    pub title: String,
    /// Page URL
    pub url: String,
    /// Tag names (not tag ids), without duplicates
    #[serde(default)]
    pub tags: Vec<String>,
    /// Free-form description, empty when not given
    #[serde(default)]
    pub description: String,
    /// When this bookmark was created
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// When this bookmark was last edited
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl Bookmark {
    /// Create a bookmark with a fresh id
    ///
    /// Title and URL are trimmed and must not be blank.
    pub fn new(title: &str, url: &str) -> Result<Self, ValidationError> {
        Self::with_id(generate_id(), title, url)
    }

    /// Create a bookmark with a specific id
    pub fn with_id(
        id: impl Into<String>,
        title: &str,
        url: &str,
    ) -> Result<Self, ValidationError> {
        let title = required("title", title)?;
        let url = required("url", url)?;
        let now = now();
        Ok(Self {
            id: id.into(),
            title,
            url,
            tags: Vec::new(),
            description: String::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Update the title
    pub fn set_title(&mut self, title: &str) -> Result<(), ValidationError> {
        self.title = required("title", title)?;
        self.updated_at = now();
        Ok(())
    }

    /// Update the URL
    pub fn set_url(&mut self, url: &str) -> Result<(), ValidationError> {
        self.url = required("url", url)?;
        self.updated_at = now();
        Ok(())
    }

    /// Update the description
    pub fn set_description(&mut self, description: &str) {
        self.description = description.trim().to_string();
        self.updated_at = now();
    }

    /// Replace all tags with the normalized form of `tags`
    pub fn set_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = normalize_tags(tags);
        self.updated_at = now();
    }

    /// Add a tag
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
            self.updated_at = now();
        }
    }

    /// Remove a tag
    pub fn remove_tag(&mut self, tag: &str) {
        if let Some(pos) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(pos);
            self.updated_at = now();
        }
    }

    /// Check whether the bookmark carries a tag name
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Rewrite `old` to `new` in place, as part of a tag rename.
    ///
    /// If the bookmark already carries `new`, `old` is dropped instead so the
    /// tag list stays duplicate-free. `updated_at` is left alone.
    pub(crate) fn replace_tag_name(&mut self, old: &str, new: &str) -> bool {
        let Some(pos) = self.tags.iter().position(|t| t == old) else {
            return false;
        };
        if old != new && self.has_tag(new) {
            self.tags.remove(pos);
        } else {
            self.tags[pos] = new.to_string();
        }
        true
    }

    /// Drop every occurrence of `name`, as part of a tag delete.
    /// `updated_at` is left alone.
    pub(crate) fn strip_tag_name(&mut self, name: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != name);
        self.tags.len() != before
    }
}

/// The page the user is currently viewing
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageInfo {
    pub title: String,
    pub url: String,
}

/// Form data for a new bookmark
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookmarkDraft {
    pub title: String,
    pub url: String,
    pub description: String,
    pub tags: Vec<String>,
}

impl BookmarkDraft {
    /// Pre-fill a draft from the active page
    pub fn from_page(page: PageInfo) -> Self {
        Self {
            title: page.title,
            url: page.url,
            ..Self::default()
        }
    }

    /// Turn the draft into a bookmark with a fresh id and normalized tags
    pub fn into_bookmark(self) -> Result<Bookmark, ValidationError> {
        let mut bookmark = Bookmark::new(&self.title, &self.url)?;
        bookmark.description = self.description.trim().to_string();
        bookmark.tags = normalize_tags(&self.tags);
        Ok(bookmark)
    }
}

/// A named label with a usage counter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Opaque identifier, assigned once at creation
    pub id: String,
    /// Display name; bookmarks refer to tags by this value
    pub name: String,
    /// Number of bookmark saves that applied this tag
    #[serde(default)]
    pub count: u32,
    /// Optional display colour
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// When this tag was created
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Tag {
    /// Create an unused tag with a fresh id
    ///
    /// The name is canonicalized the same way bookmark tags are, so it
    /// matches the spelling bookmarks will carry.
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            id: generate_id(),
            name: normalize_tag(&required("tag name", name)?),
            count: 0,
            color: None,
            created_at: now(),
        })
    }

    /// Set the display colour
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Colour theme preference
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }
}

impl FromStr for Theme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            _ => Err(ValidationError::UnknownVariant {
                kind: "theme",
                value: s.to_string(),
                expected: "light, dark, system",
            }),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the bookmark list is laid out
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DefaultView {
    #[default]
    List,
    Grid,
}

impl DefaultView {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefaultView::List => "list",
            DefaultView::Grid => "grid",
        }
    }
}

impl FromStr for DefaultView {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "list" => Ok(DefaultView::List),
            "grid" => Ok(DefaultView::Grid),
            _ => Err(ValidationError::UnknownVariant {
                kind: "view",
                value: s.to_string(),
                expected: "list, grid",
            }),
        }
    }
}

impl fmt::Display for DefaultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How tags are shown
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TagsDisplay {
    #[default]
    Cloud,
    List,
}

impl TagsDisplay {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagsDisplay::Cloud => "cloud",
            TagsDisplay::List => "list",
        }
    }
}

impl FromStr for TagsDisplay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cloud" => Ok(TagsDisplay::Cloud),
            "list" => Ok(TagsDisplay::List),
            _ => Err(ValidationError::UnknownVariant {
                kind: "tags display",
                value: s.to_string(),
                expected: "cloud, list",
            }),
        }
    }
}

impl fmt::Display for TagsDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User settings, stored as a single record
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub default_view: DefaultView,
    #[serde(default)]
    pub tags_display: TagsDisplay,
}

impl Settings {
    /// Apply every field present in `patch`
    pub fn merge(mut self, patch: SettingsPatch) -> Self {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(view) = patch.default_view {
            self.default_view = view;
        }
        if let Some(display) = patch.tags_display {
            self.tags_display = display;
        }
        self
    }
}

/// A partial settings update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub theme: Option<Theme>,
    pub default_view: Option<DefaultView>,
    pub tags_display: Option<TagsDisplay>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.theme.is_none() && self.default_view.is_none() && self.tags_display.is_none()
    }
}

impl From<Settings> for SettingsPatch {
    fn from(settings: Settings) -> Self {
        Self {
            theme: Some(settings.theme),
            default_view: Some(settings.default_view),
            tags_display: Some(settings.tags_display),
        }
    }
}
