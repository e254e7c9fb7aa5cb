//! Tag normalization and presentation
//!
//! `normalize_tags` canonicalizes free-text tag input. The remaining helpers
//! order, filter, and weight an already-loaded tag list for display; none of
//! them touch storage.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::models::Tag;

/// Maximum number of suggestions returned by [`suggest_tags`]
pub const MAX_SUGGESTIONS: usize = 5;

/// Smallest tag cloud font scale, in rem
pub const CLOUD_MIN_SCALE: f32 = 0.75;

/// Largest tag cloud font scale, in rem
pub const CLOUD_MAX_SCALE: f32 = 1.5;

/// Number of colour steps in the tag cloud
pub const CLOUD_LEVELS: usize = 5;

/// Canonical form of a single tag name: trimmed and lowercased
pub fn normalize_tag(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Trim, lowercase, drop blanks, and dedupe, keeping first-seen order
pub fn normalize_tags<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    raw.into_iter()
        .map(|tag| normalize_tag(tag.as_ref()))
        .filter(|tag| !tag.is_empty())
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

/// Tag list ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagSort {
    /// Name ascending, case-insensitive
    #[default]
    Name,
    /// Usage count descending
    Count,
    /// Creation time, newest first
    Date,
}

impl FromStr for TagSort {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(TagSort::Name),
            "count" => Ok(TagSort::Count),
            "date" => Ok(TagSort::Date),
            _ => Err(ValidationError::UnknownVariant {
                kind: "tag sort",
                value: s.to_string(),
                expected: "name, count, date",
            }),
        }
    }
}

impl fmt::Display for TagSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TagSort::Name => "name",
            TagSort::Count => "count",
            TagSort::Date => "date",
        })
    }
}

/// Sort tags in place. The sort is stable.
pub fn sort_tags(tags: &mut [Tag], sort: TagSort) {
    match sort {
        TagSort::Name => tags.sort_by(|a, b| compare_names(&a.name, &b.name)),
        TagSort::Count => tags.sort_by(|a, b| b.count.cmp(&a.count)),
        TagSort::Date => tags.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Keep tags whose name contains `text`, ignoring case
pub fn filter_tags<'a>(tags: &'a [Tag], text: &str) -> Vec<&'a Tag> {
    let needle = text.to_lowercase();
    tags.iter()
        .filter(|tag| tag.name.to_lowercase().contains(&needle))
        .collect()
}

/// Autocomplete suggestions for tag input
///
/// Matches names containing `input` (ignoring case) that are not already in
/// `selected`, most-used first, at most [`MAX_SUGGESTIONS`]. Blank input
/// yields nothing.
pub fn suggest_tags<'a>(tags: &'a [Tag], input: &str, selected: &[String]) -> Vec<&'a Tag> {
    if input.trim().is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<&Tag> = filter_tags(tags, input)
        .into_iter()
        .filter(|tag| !selected.contains(&tag.name))
        .collect();
    matches.sort_by(|a, b| b.count.cmp(&a.count));
    matches.truncate(MAX_SUGGESTIONS);
    matches
}

/// Display weight of one tag in the tag cloud
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CloudWeight {
    pub tag_id: String,
    /// Font scale in rem, between [`CLOUD_MIN_SCALE`] and [`CLOUD_MAX_SCALE`]
    pub scale: f32,
    /// Colour step, `0..CLOUD_LEVELS`
    pub level: usize,
}

/// Weight every tag linearly between the smallest and largest usage count.
///
/// When all counts are equal every tag gets the largest weight.
pub fn cloud_weights(tags: &[Tag]) -> Vec<CloudWeight> {
    let min = tags.iter().map(|t| t.count).min().unwrap_or(0);
    let max = tags.iter().map(|t| t.count).max().unwrap_or(0);
    let range = max - min;

    tags.iter()
        .map(|tag| {
            let normalized = if range == 0 {
                1.0
            } else {
                (tag.count - min) as f32 / range as f32
            };
            CloudWeight {
                tag_id: tag.id.clone(),
                scale: CLOUD_MIN_SCALE + normalized * (CLOUD_MAX_SCALE - CLOUD_MIN_SCALE),
                level: (normalized * (CLOUD_LEVELS - 1) as f32).floor() as usize,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn tag(id: &str, name: &str, count: u32, age_days: i64) -> Tag {
        Tag {
            id: id.to_string(),
            name: name.to_string(),
            count,
            color: None,
            created_at: Utc::now() - Duration::days(age_days),
        }
    }

    fn names(tags: &[Tag]) -> Vec<&str> {
        tags.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_normalize_tags() {
        assert_eq!(normalize_tags(["  A ", "a", "B", ""]), vec!["a", "b"]);
    }

    #[test]
    fn test_normalize_keeps_first_seen_order() {
        assert_eq!(
            normalize_tags(vec!["Zed", "alpha", "ZED", "Beta", "alpha "]),
            vec!["zed", "alpha", "beta"]
        );
    }

    #[test]
    fn test_normalize_empty_input() {
        let empty: Vec<String> = Vec::new();
        assert!(normalize_tags(empty).is_empty());
        assert!(normalize_tags(["", "   ", "\t"]).is_empty());
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let mut tags = vec![
            tag("1", "rust", 0, 0),
            tag("2", "Go", 0, 0),
            tag("3", "python", 0, 0),
        ];
        sort_tags(&mut tags, TagSort::Name);
        assert_eq!(names(&tags), vec!["Go", "python", "rust"]);
    }

    #[test]
    fn test_sort_by_count_descending() {
        let mut tags = vec![
            tag("1", "a", 1, 0),
            tag("2", "b", 5, 0),
            tag("3", "c", 3, 0),
        ];
        sort_tags(&mut tags, TagSort::Count);
        assert_eq!(names(&tags), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_sort_by_date_newest_first() {
        let mut tags = vec![
            tag("1", "old", 0, 10),
            tag("2", "new", 0, 0),
            tag("3", "mid", 0, 5),
        ];
        sort_tags(&mut tags, TagSort::Date);
        assert_eq!(names(&tags), vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_tag_sort_parse() {
        assert_eq!("count".parse::<TagSort>().unwrap(), TagSort::Count);
        assert_eq!(TagSort::default(), TagSort::Name);
        assert!("size".parse::<TagSort>().is_err());
    }

    #[test]
    fn test_filter_tags() {
        let tags = vec![tag("1", "React", 0, 0), tag("2", "rust", 0, 0)];
        let found = filter_tags(&tags, "rea");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "1");
        assert_eq!(filter_tags(&tags, "").len(), 2);
    }

    #[test]
    fn test_suggest_tags() {
        let tags: Vec<Tag> = (0..8)
            .map(|i| tag(&i.to_string(), &format!("web{}", i), i, 0))
            .collect();
        let selected = vec!["web7".to_string()];

        let suggestions = suggest_tags(&tags, "WEB", &selected);
        let suggested: Vec<&str> = suggestions.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(suggested, vec!["web6", "web5", "web4", "web3", "web2"]);
    }

    #[test]
    fn test_suggest_blank_input() {
        let tags = vec![tag("1", "rust", 1, 0)];
        assert!(suggest_tags(&tags, "  ", &[]).is_empty());
    }

    #[test]
    fn test_cloud_weights_range() {
        let tags = vec![
            tag("1", "a", 0, 0),
            tag("2", "b", 5, 0),
            tag("3", "c", 10, 0),
        ];
        let weights = cloud_weights(&tags);

        assert_eq!(weights[0].scale, CLOUD_MIN_SCALE);
        assert_eq!(weights[0].level, 0);
        assert_eq!(weights[1].scale, 1.125);
        assert_eq!(weights[1].level, 2);
        assert_eq!(weights[2].scale, CLOUD_MAX_SCALE);
        assert_eq!(weights[2].level, CLOUD_LEVELS - 1);
    }

    #[test]
    fn test_cloud_weights_equal_counts() {
        let tags = vec![tag("1", "a", 2, 0), tag("2", "b", 2, 0)];
        let weights = cloud_weights(&tags);
        assert!(weights.iter().all(|w| w.scale == CLOUD_MAX_SCALE));
        assert!(weights.iter().all(|w| w.level == CLOUD_LEVELS - 1));
        assert!(cloud_weights(&[]).is_empty());
    }
}
