//! SQLite-backed substrate
//!
//! Stores each entry as a JSON text row in the `kv` table. A `set` call
//! writes all of its entries inside one transaction, so a tag cascade that
//! touches both `tags` and `bookmarks` lands together or not at all.
//!
//! Storage location: `{data_dir}/webfav.db` (configurable via `Config`)

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::schema::{init_schema, needs_init};
use super::{KeyValueStore, Record, SubstrateError, SubstrateResult};

/// Substrate persisted in a SQLite database
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database at `path`
    pub fn open(path: &Path) -> SubstrateResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| {
                    match SubstrateError::from_io(source, parent.to_path_buf()) {
                        SubstrateError::Io(source) => SubstrateError::CreateDirectory {
                            path: parent.to_path_buf(),
                            source,
                        },
                        classified => classified,
                    }
                })?;
            }
        }

        let conn = Connection::open(path)?;
        Self::prepare(conn, Some(path))
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> SubstrateResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::prepare(conn, None)
    }

    fn prepare(conn: Connection, path: Option<&Path>) -> SubstrateResult<Self> {
        if needs_init(&conn) {
            debug!("Initializing substrate schema at {:?}", path);
            init_schema(&conn)?;
        }
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a closure against the connection on the blocking pool
    async fn with_conn<T, F>(&self, f: F) -> SubstrateResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> SubstrateResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| {
                SubstrateError::Unavailable("sqlite connection lock poisoned".to_string())
            })?;
            f(&mut *guard)
        })
        .await?
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, keys: &[&str]) -> SubstrateResult<Record> {
        let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        self.with_conn(move |conn| read_entries(conn, &keys)).await
    }

    async fn set(&self, items: Record) -> SubstrateResult<()> {
        self.with_conn(move |conn| write_entries(conn, items)).await
    }
}

fn read_entries(conn: &Connection, keys: &[String]) -> SubstrateResult<Record> {
    let mut stmt = conn.prepare_cached("SELECT value FROM kv WHERE key = ?1")?;
    let mut record = Record::new();

    for key in keys {
        let text: Option<String> = stmt.query_row([key], |row| row.get(0)).optional()?;
        if let Some(text) = text {
            let value = serde_json::from_str(&text).map_err(|source| SubstrateError::Decode {
                key: key.clone(),
                source,
            })?;
            record.insert(key.clone(), value);
        }
    }

    Ok(record)
}

fn write_entries(conn: &mut Connection, items: Record) -> SubstrateResult<()> {
    let now = Utc::now().timestamp_millis();
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare_cached(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )?;
        for (key, value) in &items {
            let text = serde_json::to_string(value).map_err(SubstrateError::Encode)?;
            stmt.execute(params![key, text, now])?;
        }
    }
    tx.commit()?;

    debug!("Wrote {} entr(ies) to substrate", items.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn record(pairs: &[(&str, serde_json::Value)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .set(record(&[("tags", json!([{"id": "1", "name": "rust"}]))]))
            .await
            .unwrap();

        let result = store.get(&["tags", "bookmarks"]).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result["tags"][0]["name"], "rust");
    }

    #[tokio::test]
    async fn test_set_replaces_value() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set(record(&[("tags", json!([1]))])).await.unwrap();
        store.set(record(&[("tags", json!([2, 3]))])).await.unwrap();

        let result = store.get(&["tags"]).await.unwrap();
        assert_eq!(result["tags"], json!([2, 3]));
    }

    #[tokio::test]
    async fn test_multi_entry_write() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .set(record(&[("tags", json!([])), ("bookmarks", json!([]))]))
            .await
            .unwrap();

        let result = store.get(&["tags", "bookmarks"]).await.unwrap();
        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_data_persists_across_reopens() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("webfav.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store
                .set(record(&[("settings", json!({"theme": "dark"}))]))
                .await
                .unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
        let result = store.get(&["settings"]).await.unwrap();
        assert_eq!(result["settings"]["theme"], "dark");
    }

    #[cfg(unix)]
    #[test]
    fn test_unwritable_parent_is_permission_denied() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let locked = temp_dir.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o500)).unwrap();

        let result = SqliteStore::open(&locked.join("data").join("webfav.db"));
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o700)).unwrap();

        // Root ignores directory permissions
        if let Err(err) = result {
            assert!(matches!(err, SubstrateError::PermissionDenied { .. }));
            assert!(err.recovery_suggestion().is_some());
        }
    }

    #[tokio::test]
    async fn test_corrupt_row_is_decode_error() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .with_conn(|conn| {
                conn.execute(
                    "INSERT INTO kv (key, value, updated_at) VALUES ('tags', 'not json', 0)",
                    [],
                )?;
                Ok(())
            })
            .await
            .unwrap();

        let err = store.get(&["tags"]).await.unwrap_err();
        assert!(matches!(err, SubstrateError::Decode { ref key, .. } if key == "tags"));
    }
}
