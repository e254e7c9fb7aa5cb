//! Command handlers

pub mod bookmark;
pub mod config;
pub mod settings;
pub mod status;
pub mod tag;

use anyhow::{bail, Result};

use webfav_core::{Bookmark, Tag};

/// Something a user can name by id or id prefix
pub trait Identified {
    fn id(&self) -> &str;
    fn label(&self) -> &str;
}

impl Identified for Bookmark {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.title
    }
}

impl Identified for Tag {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

/// Find the item an id refers to (full id or unique prefix)
pub fn resolve_id<'a, T: Identified>(items: &'a [T], id: &str, kind: &str) -> Result<&'a T> {
    // Exact match first
    if let Some(item) = items.iter().find(|item| item.id() == id) {
        return Ok(item);
    }

    let matches: Vec<&T> = items
        .iter()
        .filter(|item| item.id().starts_with(id))
        .collect();

    match matches.as_slice() {
        [] => bail!("No {} found matching: {}", kind, id),
        [only] => Ok(*only),
        _ => {
            eprintln!("Multiple {}s match '{}':", kind, id);
            for item in &matches {
                eprintln!("  {} - {}", item.id(), item.label());
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}
