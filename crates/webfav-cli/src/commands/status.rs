//! Init and status command handlers

use anyhow::Result;

use webfav_core::{Config, Library};

use crate::output::{Output, OutputFormat};

/// Seed an empty library
pub async fn init(library: &Library, config: &Config, output: &Output) -> Result<()> {
    let seeded = library.initialize().await?;

    if output.is_json() {
        println!(
            "{}",
            serde_json::json!({
                "database": config.database_path(),
                "initialized": seeded
            })
        );
    } else if seeded {
        output.success(&format!(
            "Initialized library at {}",
            config.database_path().display()
        ));
    } else {
        output.message("Already initialized.");
    }
    Ok(())
}

/// Human-readable byte size
fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

/// Show status information
pub async fn show(library: &Library, config: &Config, output: &Output) -> Result<()> {
    let stats = library.stats().await?;
    let settings = library.settings().get().await?;
    let database_path = config.database_path();
    let database_size = std::fs::metadata(&database_path)
        .map(|m| m.len())
        .unwrap_or(0);

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "storage": {
                        "database": database_path,
                        "database_size": database_size
                    },
                    "counts": stats,
                    "settings": settings,
                    "noop_writes": library.bookmarks().noop_writes()
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", stats.bookmarks);
        }
        OutputFormat::Human => {
            println!("webfav Status");
            println!("=============");
            println!();
            println!("Storage:");
            println!("  Location: {}", database_path.display());
            println!("  Size:     {}", human_size(database_size));
            println!();
            println!("Contents:");
            println!("  Bookmarks: {}", stats.bookmarks);
            println!("  Tags:      {}", stats.tags);
            println!();
            println!("Settings:");
            println!("  Theme: {}", settings.theme);
            println!("  View:  {}", settings.default_view);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KB");
        assert_eq!(human_size(5 * 1024 * 1024), "5.0 MB");
    }
}
