//! webfav CLI
//!
//! Command-line interface for webfav - bookmarks and tags management.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use webfav_core::{Config, Library, StoreError, SubstrateError};

mod commands;
mod logging;
mod output;
mod prompt;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "webfav")]
#[command(about = "webfav - Save, tag, and search web favorites")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use a specific config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed an empty library (first-time setup)
    Init,
    /// Save a bookmark
    #[command(alias = "save")]
    Add {
        /// URL of the page
        #[arg(short, long)]
        url: String,
        /// Page title
        #[arg(short = 'T', long)]
        title: String,
        /// Tags to apply
        #[arg(short, long)]
        tag: Vec<String>,
        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// List bookmarks
    #[command(alias = "ls")]
    List {
        /// Only bookmarks carrying every given tag
        #[arg(short, long)]
        tag: Vec<String>,
    },
    /// Search bookmarks by title, tag, or description
    Search {
        /// Search query
        query: String,
    },
    /// Show bookmark details
    Show {
        /// Bookmark ID (full or prefix)
        id: String,
    },
    /// Edit a bookmark
    Edit {
        /// Bookmark ID (full or prefix)
        id: String,
        /// New title
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// New URL
        #[arg(short, long)]
        url: Option<String>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
        /// Replace the tags
        #[arg(short, long)]
        tag: Vec<String>,
    },
    /// Delete a bookmark
    #[command(alias = "rm")]
    Delete {
        /// Bookmark ID (full or prefix)
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
    /// Manage tags
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },
    /// Show or change settings
    Settings {
        #[command(subcommand)]
        command: Option<SettingsCommands>,
    },
    /// Print the effective theme
    Theme {
        /// Keep running and print the theme whenever it changes
        #[arg(long)]
        watch: bool,
    },
    /// Show library status
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum TagCommands {
    /// List tags
    #[command(alias = "ls")]
    List {
        /// Sort order (name, count, date)
        #[arg(short, long)]
        sort: Option<String>,
        /// Only tags whose name contains this text
        #[arg(short, long)]
        filter: Option<String>,
        /// Show as a weighted tag cloud
        #[arg(long)]
        cloud: bool,
    },
    /// Create a tag
    #[command(alias = "add")]
    Create {
        /// Tag name
        name: String,
        /// Display colour, e.g. "#dea584"
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Rename a tag on every bookmark
    Rename {
        /// Tag ID (full or prefix)
        id: String,
        /// New name
        name: String,
    },
    /// Delete a tag from every bookmark
    #[command(alias = "rm")]
    Delete {
        /// Tag ID (full or prefix)
        id: String,
    },
    /// Suggest tags for partial input
    Suggest {
        /// Partial tag name
        input: String,
        /// Tags already chosen
        #[arg(short, long)]
        selected: Vec<String>,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Show current settings
    Show,
    /// Change one or more settings
    Set {
        /// light, dark, or system
        #[arg(long)]
        theme: Option<String>,
        /// list or grid
        #[arg(long)]
        default_view: Option<String>,
        /// cloud or list
        #[arg(long)]
        tags_display: Option<String>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, log_file, appearance, tag_sort)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            if let Some(hint) = recovery_hint(&e) {
                eprintln!("Hint: {}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

/// Recovery suggestion for the first storage failure in the error chain
fn recovery_hint(error: &anyhow::Error) -> Option<&'static str> {
    error.chain().find_map(|cause| {
        if let Some(store) = cause.downcast_ref::<StoreError>() {
            return store.substrate_error().recovery_suggestion();
        }
        cause
            .downcast_ref::<SubstrateError>()
            .and_then(SubstrateError::recovery_suggestion)
    })
}

async fn run(cli: Cli) -> Result<()> {
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_deref();

    // Config commands don't need the library
    if let Commands::Config { command } = &cli.command {
        return match command {
            Some(ConfigCommands::Show) | None => commands::config::show(config_path, &output),
            Some(ConfigCommands::Set { key, value }) => {
                commands::config::set(key, value, config_path, &output)
            }
        };
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    logging::init(&config);

    let library = Library::open(&config)?;

    match cli.command {
        Commands::Init => commands::status::init(&library, &config, &output).await,
        Commands::Add {
            url,
            title,
            tag,
            description,
        } => commands::bookmark::add(&library, url, title, tag, description, &output).await,
        Commands::List { tag } => commands::bookmark::list(&library, tag, &output).await,
        Commands::Search { query } => commands::bookmark::search(&library, query, &output).await,
        Commands::Show { id } => commands::bookmark::show(&library, id, &output).await,
        Commands::Edit {
            id,
            title,
            url,
            description,
            tag,
        } => {
            let changes = commands::bookmark::Changes {
                title,
                url,
                description,
                tags: tag,
            };
            commands::bookmark::edit(&library, id, changes, &output).await
        }
        Commands::Delete { id, force } => {
            commands::bookmark::delete(&library, id, force, &output).await
        }
        Commands::Tag { command } => handle_tag_command(command, &library, &config, &output).await,
        Commands::Settings { command } => match command {
            Some(SettingsCommands::Show) | None => {
                commands::settings::show(&library, &output).await
            }
            Some(SettingsCommands::Set {
                theme,
                default_view,
                tags_display,
            }) => {
                commands::settings::set(&library, theme, default_view, tags_display, &output)
                    .await
            }
        },
        Commands::Theme { watch } => {
            commands::settings::theme(&library, &config, watch, &output).await
        }
        Commands::Status => commands::status::show(&library, &config, &output).await,
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

async fn handle_tag_command(
    command: TagCommands,
    library: &Library,
    config: &Config,
    output: &Output,
) -> Result<()> {
    match command {
        TagCommands::List {
            sort,
            filter,
            cloud,
        } => {
            let sort = match sort {
                Some(s) => s.parse()?,
                None => config.tag_sort,
            };
            commands::tag::list(library, sort, filter, cloud, output).await
        }
        TagCommands::Create { name, color } => {
            commands::tag::create(library, name, color, output).await
        }
        TagCommands::Rename { id, name } => commands::tag::rename(library, id, name, output).await,
        TagCommands::Delete { id } => commands::tag::delete(library, id, output).await,
        TagCommands::Suggest { input, selected } => {
            commands::tag::suggest(library, input, selected, output).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    use webfav_core::Operation;

    #[test]
    fn test_recovery_hint_from_store_error() {
        let err = anyhow::Error::new(StoreError::WriteFailure {
            op: Operation::SaveBookmark,
            source: SubstrateError::from_io(
                io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
                PathBuf::from("/data/webfav.db"),
            ),
        })
        .context("Failed to save bookmark");

        assert!(recovery_hint(&err).unwrap().contains("permissions"));
    }

    #[test]
    fn test_recovery_hint_from_substrate_error() {
        let err = anyhow::Error::new(SubstrateError::Unavailable("offline".to_string()))
            .context("Failed to open database");
        assert_eq!(recovery_hint(&err), Some("Try the operation again."));
    }

    #[test]
    fn test_no_hint_for_other_errors() {
        let err = anyhow::anyhow!("No bookmark found matching: abc");
        assert_eq!(recovery_hint(&err), None);
    }
}
