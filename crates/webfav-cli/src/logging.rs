//! Logging setup
//!
//! Only initializes if the WEBFAV_LOG environment variable is set; its value
//! is the level (e.g. `debug`). Logs go to `config.log_file` when set,
//! otherwise to stderr.

use std::fs::OpenOptions;

use tracing::info;
use tracing_subscriber::EnvFilter;

use webfav_core::Config;

/// Environment variable holding the log level
const LOG_ENV: &str = "WEBFAV_LOG";

fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::new(format!("webfav_core={},webfav={}", level, level))
}

pub fn init(config: &Config) {
    let Ok(log_level) = std::env::var(LOG_ENV) else {
        return;
    };

    let Some(log_path) = config.log_file.as_ref() else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter_for(&log_level))
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
        return;
    };

    let log_file = match OpenOptions::new().create(true).append(true).open(log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
            return;
        }
    };

    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_for(&log_level))
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("Logging initialized to {:?}", log_path);
}
