//! Key-value record cache backed by SQLite.
//!
//! One row per logical record, keyed by the deterministic cache key. Values
//! are JSON snapshots. Read-side corruption is downgraded to "absent";
//! write-side failures (e.g. disk full) are logged and reported as a bool
//! so the caller can warn the user without aborting the save flow.

use crate::error::StorageResult;
use rusqlite::{params, Connection};
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::warn;
use waterboard_types::{Dataset, RecordKey};

/// Local record cache.
#[derive(Clone)]
pub struct LocalStore {
    conn: Arc<Mutex<Connection>>,
    appns: String,
}

impl LocalStore {
    /// Opens or creates the cache at the given path.
    pub fn open(path: &Path, appns: impl Into<String>) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            appns: appns.into(),
        })
    }

    /// Opens an in-memory cache (for testing).
    pub fn open_in_memory(appns: impl Into<String>) -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            appns: appns.into(),
        })
    }

    /// Application namespace used as the cache key prefix.
    pub fn appns(&self) -> &str {
        &self.appns
    }

    /// Stores a record snapshot, overwriting any prior value at the key.
    ///
    /// Never fails the caller: a write failure is logged and reported as
    /// `false` so the UI can raise a non-fatal warning.
    pub fn put(&self, key: &RecordKey, payload: &Value) -> bool {
        match self.try_put(key, payload) {
            Ok(()) => true,
            Err(e) => {
                warn!("failed to save {key} locally: {e}");
                false
            }
        }
    }

    fn try_put(&self, key: &RecordKey, payload: &Value) -> StorageResult<()> {
        let value = serde_json::to_string(payload)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO records (key, value) VALUES (?1, ?2)",
            params![key.cache_key(&self.appns), value],
        )?;
        Ok(())
    }

    /// Reads a record snapshot. Missing keys and corrupt entries both read
    /// as `None`.
    pub fn get(&self, key: &RecordKey) -> Option<Value> {
        self.raw_get(&key.cache_key(&self.appns))
    }

    /// Enumerates every record of a dataset (prefix scan). Unparseable
    /// entries are skipped silently.
    pub fn list_all(&self, dataset: Dataset) -> Vec<Value> {
        let prefix = dataset.cache_prefix(&self.appns);
        let conn = self.conn.lock().unwrap();
        let mut stmt = match conn
            .prepare("SELECT key, value FROM records WHERE key LIKE ?1 || '%' ORDER BY key")
        {
            Ok(stmt) => stmt,
            Err(e) => {
                warn!("local scan for {prefix} failed: {e}");
                return Vec::new();
            }
        };

        let rows = stmt.query_map(params![prefix], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        });
        let rows = match rows {
            Ok(rows) => rows,
            Err(e) => {
                warn!("local scan for {prefix} failed: {e}");
                return Vec::new();
            }
        };

        let mut out = Vec::new();
        for row in rows.flatten() {
            match serde_json::from_str::<Value>(&row.1) {
                Ok(value) => out.push(value),
                Err(_) => continue,
            }
        }
        out
    }

    /// Reads a non-record entry (admin config and the like) by exact key.
    pub fn raw_get(&self, key: &str) -> Option<Value> {
        let conn = self.conn.lock().unwrap();
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM records WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .ok();
        let raw = raw?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("corrupt local entry at {key}, treating as absent: {e}");
                None
            }
        }
    }

    /// Writes a non-record entry by exact key. Same never-fail contract as
    /// [`LocalStore::put`].
    pub fn raw_put(&self, key: &str, payload: &Value) -> bool {
        let result: StorageResult<()> = (|| {
            let value = serde_json::to_string(payload)?;
            let conn = self.conn.lock().unwrap();
            conn.execute(
                "INSERT OR REPLACE INTO records (key, value) VALUES (?1, ?2)",
                params![key, value],
            )?;
            Ok(())
        })();
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!("failed to save {key} locally: {e}");
                false
            }
        }
    }

    /// Writes a raw string at a key, bypassing JSON serialization.
    /// Exists so tests can plant corrupt entries.
    #[doc(hidden)]
    pub fn put_raw_string(&self, key: &str, value: &str) -> StorageResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO records (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

fn initialize_schema(conn: &Connection) -> StorageResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS records (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}
