//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use webfav_core::tags::CloudWeight;
use webfav_core::{Bookmark, Settings, Tag};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is JSON
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print any serializable value as pretty JSON
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("Failed to serialize output: {}", e),
        }
    }

    /// Print a single bookmark
    pub fn print_bookmark(&self, bookmark: &Bookmark) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:          {}", bookmark.id);
                println!("Title:       {}", bookmark.title);
                println!("URL:         {}", bookmark.url);
                if !bookmark.description.is_empty() {
                    println!("Description: {}", bookmark.description);
                }
                if !bookmark.tags.is_empty() {
                    println!("Tags:        {}", bookmark.tags.join(", "));
                }
                println!("Created:     {}", bookmark.created_at.format("%Y-%m-%d %H:%M"));
                println!("Updated:     {}", bookmark.updated_at.format("%Y-%m-%d %H:%M"));
            }
            OutputFormat::Json => self.json(bookmark),
            OutputFormat::Quiet => println!("{}", bookmark.id),
        }
    }

    /// Print a list of bookmarks
    pub fn print_bookmarks(&self, bookmarks: &[Bookmark]) {
        match self.format {
            OutputFormat::Human => {
                if bookmarks.is_empty() {
                    println!("No bookmarks found.");
                    return;
                }
                for bookmark in bookmarks {
                    let tags = if bookmark.tags.is_empty() {
                        String::new()
                    } else {
                        format!(" [{}]", bookmark.tags.join(", "))
                    };
                    println!(
                        "{} | {}{} | {}",
                        short_id(&bookmark.id),
                        truncate(&bookmark.title, 35),
                        tags,
                        truncate(&bookmark.url, 45)
                    );
                }
                println!("\n{} bookmark(s)", bookmarks.len());
            }
            OutputFormat::Json => self.json(bookmarks),
            OutputFormat::Quiet => {
                for bookmark in bookmarks {
                    println!("{}", bookmark.id);
                }
            }
        }
    }

    /// Print a list of tags
    pub fn print_tags(&self, tags: &[Tag]) {
        match self.format {
            OutputFormat::Human => {
                if tags.is_empty() {
                    println!("No tags found.");
                    return;
                }
                for tag in tags {
                    println!("{} | {} ({})", short_id(&tag.id), tag.name, tag.count);
                }
                println!("\n{} tag(s)", tags.len());
            }
            OutputFormat::Json => self.json(tags),
            OutputFormat::Quiet => {
                for tag in tags {
                    println!("{}", tag.name);
                }
            }
        }
    }

    /// Print tags with their cloud weights
    pub fn print_cloud(&self, tags: &[Tag], weights: &[CloudWeight]) {
        match self.format {
            OutputFormat::Human => {
                if tags.is_empty() {
                    println!("No tags found.");
                    return;
                }
                let words: Vec<String> = tags
                    .iter()
                    .zip(weights)
                    .map(|(tag, weight)| cloud_word(&tag.name, weight.level))
                    .collect();
                println!("{}", words.join("  "));
            }
            OutputFormat::Json => {
                let entries: Vec<_> = tags
                    .iter()
                    .zip(weights)
                    .map(|(tag, weight)| {
                        serde_json::json!({
                            "id": tag.id,
                            "name": tag.name,
                            "count": tag.count,
                            "scale": weight.scale,
                            "level": weight.level
                        })
                    })
                    .collect();
                self.json(&entries);
            }
            OutputFormat::Quiet => {
                for tag in tags {
                    println!("{}", tag.name);
                }
            }
        }
    }

    /// Print the settings record
    pub fn print_settings(&self, settings: &Settings) {
        match self.format {
            OutputFormat::Human => {
                println!("Settings:");
                println!("  theme:        {}", settings.theme);
                println!("  default_view: {}", settings.default_view);
                println!("  tags_display: {}", settings.tags_display);
            }
            OutputFormat::Json => self.json(settings),
            OutputFormat::Quiet => println!("{}", settings.theme),
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// First eight characters of an id
fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Render a cloud entry; heavier tags get more emphasis
fn cloud_word(name: &str, level: usize) -> String {
    match level {
        0 | 1 => name.to_string(),
        2 | 3 => format!("*{}*", name),
        _ => format!("**{}**", name.to_uppercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
        assert_eq!(truncate("ééééééééééé", 5), "éé...");
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id("0123456789abcdef"), "01234567");
    }

    #[test]
    fn test_cloud_word() {
        assert_eq!(cloud_word("rust", 0), "rust");
        assert_eq!(cloud_word("rust", 2), "*rust*");
        assert_eq!(cloud_word("rust", 4), "**RUST**");
    }
}
