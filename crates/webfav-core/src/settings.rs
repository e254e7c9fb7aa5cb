//! Settings store
//!
//! A single settings record under the `settings` entry. Reading it when it
//! has never been written stores the defaults first.
//!
//! Every theme this store reads or writes is also published on a watch
//! channel, so theme watchers in the same process see preference changes.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use crate::access::{self, Write};
use crate::error::{Operation, StoreResult};
use crate::models::{Settings, SettingsPatch, Theme};
use crate::storage::{keys, KeyValueStore};

/// Store for the settings record
pub struct SettingsStore {
    substrate: Arc<dyn KeyValueStore>,
    theme: watch::Sender<Theme>,
}

impl SettingsStore {
    /// Create a store over a substrate
    pub fn new(substrate: Arc<dyn KeyValueStore>) -> Self {
        let (theme, _) = watch::channel(Theme::default());
        Self { substrate, theme }
    }

    async fn load(&self, op: Operation) -> StoreResult<Option<Settings>> {
        let record = access::read(self.substrate.as_ref(), &[keys::SETTINGS], op).await?;
        let settings: Option<Settings> = access::single(&record, keys::SETTINGS, op)?;
        if let Some(settings) = &settings {
            self.publish(settings.theme);
        }
        Ok(settings)
    }

    async fn store(&self, settings: &Settings, op: Operation) -> StoreResult<()> {
        Write::new(op)
            .entry(keys::SETTINGS, settings)?
            .commit(self.substrate.as_ref())
            .await?;
        self.publish(settings.theme);
        Ok(())
    }

    fn publish(&self, theme: Theme) {
        self.theme.send_if_modified(|current| {
            if *current == theme {
                false
            } else {
                *current = theme;
                true
            }
        });
    }

    /// Receive the theme preference whenever this store sees it change
    pub fn subscribe_theme(&self) -> watch::Receiver<Theme> {
        self.theme.subscribe()
    }

    /// Current settings, seeding the defaults if none are stored
    pub async fn get(&self) -> StoreResult<Settings> {
        let op = Operation::GetSettings;
        match self.load(op).await? {
            Some(settings) => Ok(settings),
            None => {
                let defaults = Settings::default();
                self.store(&defaults, op).await?;
                info!("Seeded default settings");
                Ok(defaults)
            }
        }
    }

    /// Merge `patch` over the current settings and store the result
    pub async fn set(&self, patch: impl Into<SettingsPatch>) -> StoreResult<Settings> {
        let op = Operation::SetSettings;
        let current = self.load(op).await?.unwrap_or_default();
        let merged = current.merge(patch.into());
        self.store(&merged, op).await?;
        Ok(merged)
    }
}
