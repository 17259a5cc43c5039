// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Result as StoreResult, StorageError};
use crate::store::{Entry, Expect, KvStore, check_expect};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Pocketledger", "pocketledger"));

pub fn default_db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    Ok(proj.data_dir().join("pocketledger.sqlite"))
}

/// Opens the database at `path`, creating parent dirs and the schema as needed.
pub fn open_or_init(path: &Path) -> Result<SqliteStore> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).context("Failed to create data dir")?;
        }
    }
    let conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(SqliteStore::new(conn))
}

pub fn open_in_memory() -> Result<SqliteStore> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(SqliteStore::new(conn))
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS kv(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        version INTEGER NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )?;
    Ok(())
}

/// [`KvStore`] backed by a single SQLite table.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        SqliteStore {
            conn: Mutex::new(conn),
        }
    }
}

impl KvStore for SqliteStore {
    fn get(&self, key: &str) -> StoreResult<Option<Entry>> {
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        let row = conn
            .query_row(
                "SELECT value, version FROM kv WHERE key=?1",
                params![key],
                |r| {
                    Ok(Entry {
                        value: r.get(0)?,
                        version: r.get::<_, i64>(1)? as u64,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    fn put(&self, key: &str, value: &str, expect: Expect) -> StoreResult<u64> {
        let mut conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        let tx = conn.transaction()?;
        let found: Option<i64> = tx
            .query_row("SELECT version FROM kv WHERE key=?1", params![key], |r| {
                r.get(0)
            })
            .optional()?;
        let found = found.map(|v| v as u64);
        check_expect(key, expect, found)?;
        let version = found.unwrap_or(0) + 1;
        tx.execute(
            "INSERT INTO kv(key, value, version) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value, version=excluded.version,
             updated_at=datetime('now')",
            params![key, value, version as i64],
        )?;
        tx.commit()?;
        Ok(version)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        conn.execute("DELETE FROM kv WHERE key=?1", params![key])?;
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        let mut stmt = conn.prepare("SELECT key FROM kv ORDER BY key")?;
        let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}
