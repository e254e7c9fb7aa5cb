//! Effective theme resolution
//!
//! The `system` theme follows the host's light/dark preference. The host
//! publishes its preference through an [`AppearanceSignal`]; subscribers are
//! pushed every change and never poll.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::ValidationError;
use crate::models::Theme;

/// A concrete light or dark appearance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    #[default]
    Light,
    Dark,
}

impl Appearance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Appearance::Light => "light",
            Appearance::Dark => "dark",
        }
    }
}

impl FromStr for Appearance {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Appearance::Light),
            "dark" => Ok(Appearance::Dark),
            _ => Err(ValidationError::UnknownVariant {
                kind: "appearance",
                value: s.to_string(),
                expected: "light, dark",
            }),
        }
    }
}

impl fmt::Display for Appearance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve a theme preference against the host's current appearance
pub fn resolve_effective_theme(theme: Theme, host: Appearance) -> Appearance {
    match theme {
        Theme::Light => Appearance::Light,
        Theme::Dark => Appearance::Dark,
        Theme::System => host,
    }
}

/// The host's light/dark preference, pushed to subscribers on change
#[derive(Debug)]
pub struct AppearanceSignal {
    tx: watch::Sender<Appearance>,
}

impl AppearanceSignal {
    pub fn new(initial: Appearance) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    /// The preference right now
    pub fn current(&self) -> Appearance {
        *self.tx.borrow()
    }

    /// Publish a new preference. Subscribers are only notified when it differs.
    pub fn set(&self, appearance: Appearance) {
        self.tx.send_if_modified(|current| {
            if *current == appearance {
                false
            } else {
                *current = appearance;
                true
            }
        });
    }

    /// Receive every subsequent change
    pub fn subscribe(&self) -> watch::Receiver<Appearance> {
        self.tx.subscribe()
    }
}

impl Default for AppearanceSignal {
    fn default() -> Self {
        Self::new(Appearance::default())
    }
}

/// Handle to a running theme watcher. Dropping it unsubscribes.
#[derive(Debug)]
pub struct ThemeSubscription {
    handle: JoinHandle<()>,
}

impl ThemeSubscription {
    /// Stop receiving updates
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// Whether the watcher is still listening
    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for ThemeSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Re-resolve `theme` whenever the host appearance changes
///
/// Only a `system` theme follows the host; for an explicit light or dark
/// theme the watcher finishes immediately. `on_change` receives the newly
/// resolved appearance. Must be called from within a tokio runtime.
pub fn watch_theme<F>(
    theme: Theme,
    mut host: watch::Receiver<Appearance>,
    mut on_change: F,
) -> ThemeSubscription
where
    F: FnMut(Appearance) + Send + 'static,
{
    let handle = tokio::spawn(async move {
        if theme != Theme::System {
            return;
        }
        while host.changed().await.is_ok() {
            let appearance = *host.borrow_and_update();
            debug!("Host appearance changed to {}", appearance);
            on_change(resolve_effective_theme(theme, appearance));
        }
    });
    ThemeSubscription { handle }
}

/// Re-resolve the effective theme when either the preference or the host changes
///
/// Unlike [`watch_theme`], the preference itself is followed, so switching
/// to `system` later starts tracking the host. `on_change` only fires when the
/// resolved appearance differs from the last one. Stops when either sender
/// is dropped.
pub fn follow_theme<F>(
    mut theme: watch::Receiver<Theme>,
    mut host: watch::Receiver<Appearance>,
    mut on_change: F,
) -> ThemeSubscription
where
    F: FnMut(Appearance) + Send + 'static,
{
    let mut current =
        resolve_effective_theme(*theme.borrow_and_update(), *host.borrow_and_update());
    let handle = tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = theme.changed() => if changed.is_err() { break },
                changed = host.changed() => if changed.is_err() { break },
            }
            let next =
                resolve_effective_theme(*theme.borrow_and_update(), *host.borrow_and_update());
            if next != current {
                debug!("Effective theme changed to {}", next);
                current = next;
                on_change(next);
            }
        }
    });
    ThemeSubscription { handle }
}
