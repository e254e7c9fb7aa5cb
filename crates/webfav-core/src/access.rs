//! Read/write helpers shared by the stores
//!
//! Each helper maps a substrate failure to the matching [`StoreError`] for
//! the calling operation and logs it before handing it back.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

use crate::error::{Operation, StoreError, StoreResult};
use crate::storage::{decode_entry, encode_entry, KeyValueStore, Record, SubstrateError};

fn read_failure(op: Operation, source: SubstrateError) -> StoreError {
    error!(recoverable = source.is_recoverable(), "{}: read failed: {}", op, source);
    StoreError::ReadFailure { op, source }
}

fn write_failure(op: Operation, source: SubstrateError) -> StoreError {
    error!(recoverable = source.is_recoverable(), "{}: write failed: {}", op, source);
    StoreError::WriteFailure { op, source }
}

/// Read the named entries
pub(crate) async fn read(
    substrate: &dyn KeyValueStore,
    keys: &[&str],
    op: Operation,
) -> StoreResult<Record> {
    debug!("Reading {:?}", keys);
    substrate
        .get(keys)
        .await
        .map_err(|source| read_failure(op, source))
}

/// Decode an entry that holds a collection; a missing entry is empty
pub(crate) fn collection<T: DeserializeOwned>(
    record: &Record,
    key: &str,
    op: Operation,
) -> StoreResult<Vec<T>> {
    decode_entry(record, key)
        .map(Option::unwrap_or_default)
        .map_err(|source| read_failure(op, source))
}

/// Decode an entry that holds a single value
pub(crate) fn single<T: DeserializeOwned>(
    record: &Record,
    key: &str,
    op: Operation,
) -> StoreResult<Option<T>> {
    decode_entry(record, key).map_err(|source| read_failure(op, source))
}

/// Builder for one whole-entry write
pub(crate) struct Write {
    op: Operation,
    record: Record,
}

impl Write {
    pub(crate) fn new(op: Operation) -> Self {
        Self {
            op,
            record: Record::new(),
        }
    }

    /// Add an entry to the write
    pub(crate) fn entry<T: Serialize>(mut self, key: &str, value: &T) -> StoreResult<Self> {
        let value = encode_entry(value).map_err(|source| write_failure(self.op, source))?;
        self.record.insert(key.to_string(), value);
        Ok(self)
    }

    /// Persist every entry in a single substrate call
    pub(crate) async fn commit(self, substrate: &dyn KeyValueStore) -> StoreResult<()> {
        let keys: Vec<&String> = self.record.keys().collect();
        debug!("Writing {:?}", keys);
        let op = self.op;
        substrate
            .set(self.record)
            .await
            .map_err(|source| write_failure(op, source))
    }
}
