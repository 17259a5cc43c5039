// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use chrono::{NaiveDate, TimeZone, Utc};
use pocketledger::error::{Result, StorageError};
use pocketledger::models::{NewTransaction, TransactionKind};
use pocketledger::store::{Entry, Expect, KvStore, MemoryStore, SharedStore};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn seeded() -> SharedStore {
    let store = MemoryStore::shared();
    let now = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
    pocketledger::seed::initialize(store.as_ref(), date("2025-03-10"), now).unwrap();
    store
}

pub fn new_tx(kind: TransactionKind, amount: i64, category: &str, on: Option<NaiveDate>) -> NewTransaction {
    NewTransaction {
        kind,
        amount: Decimal::from(amount),
        category: category.into(),
        description: format!("{} {}", kind, amount),
        date: on,
        user_id: None,
    }
}

/// Store whose reads and writes can be switched to fail.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn shared() -> Arc<FlakyStore> {
        Arc::new(FlakyStore::default())
    }

    fn broken() -> StorageError {
        StorageError::Io(std::io::Error::other("disk unavailable"))
    }
}

impl KvStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<Entry>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::broken());
        }
        self.inner.get(key)
    }

    fn put(&self, key: &str, value: &str, expect: Expect) -> Result<u64> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::broken());
        }
        self.inner.put(key, value, expect)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        self.inner.keys()
    }
}
