//! Tag command handlers

use anyhow::{Context, Result};

use webfav_core::tags::{cloud_weights, filter_tags, sort_tags, suggest_tags};
use webfav_core::{normalize_tag, normalize_tags, Library, Tag, TagSort};

use super::resolve_id;
use crate::output::Output;

/// List tags with usage counts
pub async fn list(
    library: &Library,
    sort: TagSort,
    filter: Option<String>,
    cloud: bool,
    output: &Output,
) -> Result<()> {
    let mut tags = library.tags().list().await?;
    sort_tags(&mut tags, sort);

    let tags: Vec<Tag> = match filter {
        Some(ref text) => filter_tags(&tags, text).into_iter().cloned().collect(),
        None => tags,
    };

    if cloud {
        let weights = cloud_weights(&tags);
        output.print_cloud(&tags, &weights);
    } else {
        output.print_tags(&tags);
    }
    Ok(())
}

/// Create a tag
pub async fn create(
    library: &Library,
    name: String,
    color: Option<String>,
    output: &Output,
) -> Result<()> {
    let tag = library.create_tag(&name, color.as_deref()).await?;
    output.success(&format!("Created tag: {} ({})", tag.name, tag.id));
    Ok(())
}

/// Rename a tag everywhere it is used
pub async fn rename(library: &Library, id: String, name: String, output: &Output) -> Result<()> {
    let tags = library.tags().list().await?;
    let tag = resolve_id(&tags, &id, "tag")?;

    library
        .rename_tag(&tag.id, &name)
        .await
        .context("Failed to rename tag")?;

    output.success(&format!(
        "Renamed tag {} to {}",
        tag.name,
        normalize_tag(&name)
    ));
    Ok(())
}

/// Delete a tag and remove it from every bookmark
pub async fn delete(library: &Library, id: String, output: &Output) -> Result<()> {
    let tags = library.tags().list().await?;
    let tag = resolve_id(&tags, &id, "tag")?;

    library
        .tags()
        .delete(&tag.id)
        .await
        .context("Failed to delete tag")?;

    output.success(&format!("Deleted tag: {}", tag.name));
    Ok(())
}

/// Suggest existing tags for partial input
pub async fn suggest(
    library: &Library,
    input: String,
    selected: Vec<String>,
    output: &Output,
) -> Result<()> {
    let tags = library.tags().list().await?;
    let selected = normalize_tags(&selected);

    let suggestions: Vec<Tag> = suggest_tags(&tags, &input, &selected)
        .into_iter()
        .cloned()
        .collect();

    output.print_tags(&suggestions);
    Ok(())
}
