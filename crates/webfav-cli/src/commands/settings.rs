//! Settings and theme command handlers

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use webfav_core::{
    Appearance, AppearanceSignal, Config, DefaultView, Library, SettingsPatch, TagsDisplay, Theme,
};

use crate::output::{Output, OutputFormat};

/// Show current settings
pub async fn show(library: &Library, output: &Output) -> Result<()> {
    let settings = library.settings().get().await?;
    output.print_settings(&settings);
    Ok(())
}

/// Change one or more settings
pub async fn set(
    library: &Library,
    theme: Option<String>,
    default_view: Option<String>,
    tags_display: Option<String>,
    output: &Output,
) -> Result<()> {
    let patch = SettingsPatch {
        theme: theme.as_deref().map(str::parse::<Theme>).transpose()?,
        default_view: default_view
            .as_deref()
            .map(str::parse::<DefaultView>)
            .transpose()?,
        tags_display: tags_display
            .as_deref()
            .map(str::parse::<TagsDisplay>)
            .transpose()?,
    };
    if patch.is_empty() {
        output.message("Nothing to change. Use --theme, --default-view or --tags-display.");
        return Ok(());
    }

    let settings = library
        .settings()
        .set(patch)
        .await
        .context("Failed to save settings")?;

    output.success("Settings updated");
    output.print_settings(&settings);
    Ok(())
}

fn print_theme(output: &Output, appearance: Appearance) {
    match output.format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "theme": appearance })),
        _ => println!("{}", appearance),
    }
}

/// Print the effective theme
///
/// With `watch`, each line read from stdin (`light` or `dark`) is published
/// as the new host appearance and the effective theme is printed whenever it
/// changes.
pub async fn theme(library: &Library, config: &Config, watch: bool, output: &Output) -> Result<()> {
    let host = config.appearance.unwrap_or_default();
    print_theme(output, library.effective_theme(host).await?);

    if !watch {
        return Ok(());
    }

    let signal = AppearanceSignal::new(host);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let _subscription = library
        .watch_effective_theme(&signal, move |appearance| {
            let _ = tx.send(appearance);
        })
        .await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Appearance>() {
                    Ok(appearance) => signal.set(appearance),
                    Err(e) => eprintln!("{}", e),
                }
            }
            Some(appearance) = rx.recv() => print_theme(output, appearance),
        }
    }

    Ok(())
}
