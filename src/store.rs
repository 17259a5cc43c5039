// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Key-value store holding one JSON document per collection.
//!
//! Every value carries a version that is bumped on each write. Writers that
//! read a collection, modify it and write it back go through [`update`], which
//! performs a compare-and-swap on that version so overlapping writers retry
//! instead of overwriting each other.

use crate::error::{Result, StorageError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Fixed keys of the persisted collections.
pub mod keys {
    pub const TRANSACTIONS: &str = "financial_transactions";
    pub const BUDGET_CATEGORIES: &str = "budget_categories";
    pub const FINANCIAL_SUMMARY: &str = "financial_summary";
    pub const EDUCATIONAL_CONTENT: &str = "educational_content";
    pub const USER_PROGRESS: &str = "user_progress";
    pub const COMPLETED_QUIZZES: &str = "completed_quizzes";
    pub const AUTH_TOKEN: &str = "authToken";
}

pub const MAX_CAS_ATTEMPTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub value: String,
    pub version: u64,
}

/// Precondition for a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    Any,
    Absent,
    Version(u64),
}

pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Entry>>;

    /// Writes `value` under `key` if `expect` holds and returns the new version.
    fn put(&self, key: &str, value: &str, expect: Expect) -> Result<u64>;

    fn remove(&self, key: &str) -> Result<()>;

    fn keys(&self) -> Result<Vec<String>>;
}

pub type SharedStore = Arc<dyn KvStore>;

/// Loads and decodes a collection. `None` when the key has never been written.
pub fn load<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Result<Option<T>> {
    match store.get(key)? {
        Some(entry) => serde_json::from_str(&entry.value)
            .map(Some)
            .map_err(|e| StorageError::json(key, e)),
        None => Ok(None),
    }
}

pub fn save<T: Serialize + ?Sized>(store: &dyn KvStore, key: &str, value: &T) -> Result<u64> {
    let json = serde_json::to_string(value).map_err(|e| StorageError::json(key, e))?;
    store.put(key, &json, Expect::Any)
}

/// Read-modify-write of one collection.
///
/// `f` may run more than once when another writer bumps the version in between.
/// Nothing is written when `f` leaves the collection unchanged.
pub fn update<T, R, F>(store: &dyn KvStore, key: &str, mut f: F) -> Result<R>
where
    T: Serialize + DeserializeOwned + Default,
    F: FnMut(&mut T) -> R,
{
    let mut last_conflict = None;
    for attempt in 1..=MAX_CAS_ATTEMPTS {
        let (mut value, before, expect) = match store.get(key)? {
            Some(entry) => {
                let v: T = serde_json::from_str(&entry.value)
                    .map_err(|e| StorageError::json(key, e))?;
                (v, entry.value, Expect::Version(entry.version))
            }
            None => {
                let v = T::default();
                let json = serde_json::to_string(&v).map_err(|e| StorageError::json(key, e))?;
                (v, json, Expect::Absent)
            }
        };
        let out = f(&mut value);
        let after = serde_json::to_string(&value).map_err(|e| StorageError::json(key, e))?;
        if after == before {
            return Ok(out);
        }
        match store.put(key, &after, expect) {
            Ok(_) => return Ok(out),
            Err(e) if e.is_conflict() => {
                debug!("write conflict on '{}' (attempt {})", key, attempt);
                last_conflict = Some(e);
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_conflict.unwrap_or(StorageError::Conflict {
        key: key.to_string(),
        expected: None,
        found: None,
    }))
}

pub(crate) fn check_expect(key: &str, expect: Expect, found: Option<u64>) -> Result<()> {
    let ok = match expect {
        Expect::Any => true,
        Expect::Absent => found.is_none(),
        Expect::Version(v) => found == Some(v),
    };
    if ok {
        Ok(())
    } else {
        Err(StorageError::Conflict {
            key: key.to_string(),
            expected: match expect {
                Expect::Version(v) => Some(v),
                _ => None,
            },
            found,
        })
    }
}

/// In-process store, used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedStore {
        Arc::new(Self::new())
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Entry>> {
        let map = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str, expect: Expect) -> Result<u64> {
        let mut map = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        let found = map.get(key).map(|e| e.version);
        check_expect(key, expect, found)?;
        let version = found.unwrap_or(0) + 1;
        map.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                version,
            },
        );
        Ok(version)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut map = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        map.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let map = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        let mut keys: Vec<String> = map.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
