//! Key-value substrate
//!
//! Every store reads and writes whole collections through the
//! [`KeyValueStore`] trait. Values are JSON records, one entry per key:
//!
//! - `bookmarks` - array of bookmarks
//! - `tags` - array of tags
//! - `settings` - the settings object
//!
//! A `set` call replaces the named entries and leaves all others alone.
//! Nothing here makes a read followed by a write atomic.

pub mod error;
pub mod memory;
pub mod schema;
pub mod sqlite;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub use error::{SubstrateError, SubstrateResult};
pub use memory::MemoryStore;
pub use schema::{init_schema, needs_init, SCHEMA_VERSION};
pub use sqlite::SqliteStore;

/// A set of named entries read from or written to the substrate
pub type Record = serde_json::Map<String, Value>;

/// Entry names used in the substrate
pub mod keys {
    pub const BOOKMARKS: &str = "bookmarks";
    pub const TAGS: &str = "tags";
    pub const SETTINGS: &str = "settings";
}

/// Asynchronous key-value persistence
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the named entries. Keys with no stored value are absent from
    /// the returned record.
    async fn get(&self, keys: &[&str]) -> SubstrateResult<Record>;

    /// Write every entry in `items`, replacing previous values
    async fn set(&self, items: Record) -> SubstrateResult<()>;
}

/// Decode one entry from a record, treating a missing or null entry as absent
pub fn decode_entry<T: DeserializeOwned>(record: &Record, key: &str) -> SubstrateResult<Option<T>> {
    match record.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|source| SubstrateError::Decode {
                key: key.to_string(),
                source,
            }),
    }
}

/// Encode a value for storage
pub fn encode_entry<T: Serialize>(value: &T) -> SubstrateResult<Value> {
    serde_json::to_value(value).map_err(SubstrateError::Encode)
}
