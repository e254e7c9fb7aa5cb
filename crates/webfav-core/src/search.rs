//! Bookmark search
//!
//! Plain case-insensitive substring matching over an already-loaded list.
//! Results keep the stored order; there is no ranking.

use crate::models::Bookmark;

/// Keep bookmarks whose title, any tag, or description contains `query`
///
/// Matching ignores case. An empty query matches everything.
pub fn filter_bookmarks<'a>(bookmarks: &'a [Bookmark], query: &str) -> Vec<&'a Bookmark> {
    let needle = query.to_lowercase();
    bookmarks
        .iter()
        .filter(|b| matches_query(b, &needle))
        .collect()
}

fn matches_query(bookmark: &Bookmark, needle: &str) -> bool {
    bookmark.title.to_lowercase().contains(needle)
        || bookmark
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
        || bookmark.description.to_lowercase().contains(needle)
}

/// Keep bookmarks that carry every tag name in `selected`
pub fn filter_by_tags<'a>(bookmarks: &'a [Bookmark], selected: &[String]) -> Vec<&'a Bookmark> {
    bookmarks
        .iter()
        .filter(|b| selected.iter().all(|tag| b.has_tag(tag)))
        .collect()
}
