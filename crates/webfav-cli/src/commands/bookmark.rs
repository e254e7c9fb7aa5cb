//! Bookmark command handlers

use anyhow::{Context, Result};

use webfav_core::{normalize_tags, BookmarkDraft, Library, PageInfo};

use super::resolve_id;
use crate::output::Output;
use crate::prompt::confirm;

/// Fields to change on an existing bookmark
#[derive(Debug, Default)]
pub struct Changes {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    /// Replaces all tags when non-empty
    pub tags: Vec<String>,
}

impl Changes {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.url.is_none()
            && self.description.is_none()
            && self.tags.is_empty()
    }
}

/// Save a bookmark for a page
pub async fn add(
    library: &Library,
    url: String,
    title: String,
    tags: Vec<String>,
    description: String,
    output: &Output,
) -> Result<()> {
    let mut draft = BookmarkDraft::from_page(PageInfo { title, url });
    draft.tags = tags;
    draft.description = description;

    let bookmark = library.save_bookmark(draft).await?;

    output.success(&format!("Saved bookmark: {}", bookmark.id));
    output.print_bookmark(&bookmark);
    Ok(())
}

/// List bookmarks, optionally only those carrying all given tags
pub async fn list(library: &Library, tags: Vec<String>, output: &Output) -> Result<()> {
    let bookmarks = if tags.is_empty() {
        library.bookmarks().list().await?
    } else {
        library.with_tags(&normalize_tags(&tags)).await?
    };

    output.print_bookmarks(&bookmarks);
    Ok(())
}

/// Search bookmarks
pub async fn search(library: &Library, query: String, output: &Output) -> Result<()> {
    let bookmarks = library.search(&query).await?;
    output.print_bookmarks(&bookmarks);
    Ok(())
}

/// Show a single bookmark
pub async fn show(library: &Library, id: String, output: &Output) -> Result<()> {
    let bookmarks = library.bookmarks().list().await?;
    let bookmark = resolve_id(&bookmarks, &id, "bookmark")?;

    output.print_bookmark(bookmark);
    Ok(())
}

/// Edit a bookmark
pub async fn edit(library: &Library, id: String, changes: Changes, output: &Output) -> Result<()> {
    if changes.is_empty() {
        output.message("Nothing to change.");
        return Ok(());
    }

    let bookmarks = library.bookmarks().list().await?;
    let mut bookmark = resolve_id(&bookmarks, &id, "bookmark")?.clone();

    if let Some(title) = changes.title {
        bookmark.set_title(&title).context("Invalid title")?;
    }
    if let Some(url) = changes.url {
        bookmark.set_url(&url).context("Invalid URL")?;
    }
    if let Some(description) = changes.description {
        bookmark.set_description(&description);
    }
    if !changes.tags.is_empty() {
        bookmark.set_tags(&changes.tags);
        library.ensure_tags(&bookmark.tags).await?;
    }

    library
        .bookmarks()
        .update(&bookmark)
        .await
        .context("Failed to update bookmark")?;

    output.success("Bookmark updated");
    output.print_bookmark(&bookmark);
    Ok(())
}

/// Delete a bookmark
pub async fn delete(library: &Library, id: String, force: bool, output: &Output) -> Result<()> {
    let bookmarks = library.bookmarks().list().await?;
    let bookmark = resolve_id(&bookmarks, &id, "bookmark")?;

    if !force && output.should_prompt() {
        println!("Delete: {} - {}", bookmark.title, bookmark.url);
        if !confirm("Are you sure?")? {
            output.message("Cancelled.");
            return Ok(());
        }
    }

    library
        .bookmarks()
        .delete(&bookmark.id)
        .await
        .context("Failed to delete bookmark")?;

    output.success(&format!("Deleted bookmark: {}", bookmark.id));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use webfav_core::MemoryStore;

    use crate::output::OutputFormat;

    fn quiet() -> Output {
        Output::new(OutputFormat::Quiet)
    }

    async fn library_with_bookmark() -> (Library, String) {
        let library = Library::new(Arc::new(MemoryStore::new()));
        add(
            &library,
            "https://example.com".to_string(),
            "Example".to_string(),
            vec!["Web".to_string()],
            String::new(),
            &quiet(),
        )
        .await
        .unwrap();
        let id = library.bookmarks().list().await.unwrap()[0].id.clone();
        (library, id)
    }

    #[tokio::test]
    async fn test_edit_by_prefix_creates_new_tags() {
        let (library, id) = library_with_bookmark().await;
        let changes = Changes {
            title: Some("Renamed".to_string()),
            tags: vec!["Web".to_string(), "docs".to_string()],
            ..Changes::default()
        };

        edit(&library, id[..4].to_string(), changes, &quiet())
            .await
            .unwrap();

        let bookmark = library.bookmarks().get(&id).await.unwrap().unwrap();
        assert_eq!(bookmark.title, "Renamed");
        assert_eq!(bookmark.tags, vec!["web", "docs"]);

        let names: Vec<String> = library
            .tags()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["web", "docs"]);
    }

    #[tokio::test]
    async fn test_edit_rejects_blank_title() {
        let (library, id) = library_with_bookmark().await;
        let changes = Changes {
            title: Some("  ".to_string()),
            ..Changes::default()
        };

        assert!(edit(&library, id.clone(), changes, &quiet()).await.is_err());
        let bookmark = library.bookmarks().get(&id).await.unwrap().unwrap();
        assert_eq!(bookmark.title, "Example");
    }

    #[tokio::test]
    async fn test_delete_without_prompt_in_quiet_mode() {
        let (library, id) = library_with_bookmark().await;

        delete(&library, id, false, &quiet()).await.unwrap();

        assert!(library.bookmarks().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_filters_by_normalized_tags() {
        let (library, _) = library_with_bookmark().await;
        let bookmarks = library.with_tags(&normalize_tags(["  WEB "])).await.unwrap();
        assert_eq!(bookmarks.len(), 1);

        list(&library, vec!["missing".to_string()], &quiet())
            .await
            .unwrap();
    }
}
