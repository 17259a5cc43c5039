// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::seeded;
use pocketledger::db;
use pocketledger::error::{Result, StorageError};
use pocketledger::finance::FinancialService;
use pocketledger::models::{BudgetCategory, EducationalContent, Transaction, TransactionKind, UserProgress};
use pocketledger::store::{self, Entry, Expect, KvStore, MemoryStore, SharedStore, keys};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn sqlite_put_get_and_versions() {
    let store = db::open_in_memory().unwrap();
    assert_eq!(store.get("k").unwrap(), None);
    assert_eq!(store.put("k", "1", Expect::Absent).unwrap(), 1);
    assert_eq!(store.put("k", "2", Expect::Version(1)).unwrap(), 2);
    assert_eq!(
        store.get("k").unwrap(),
        Some(Entry {
            value: "2".into(),
            version: 2
        })
    );

    let err = store.put("k", "3", Expect::Version(1)).unwrap_err();
    assert!(matches!(
        err,
        StorageError::Conflict {
            expected: Some(1),
            found: Some(2),
            ..
        }
    ));
    assert!(store.put("k", "3", Expect::Absent).unwrap_err().is_conflict());

    store.put("a", "x", Expect::Any).unwrap();
    assert_eq!(store.keys().unwrap(), vec!["a".to_string(), "k".to_string()]);
    store.remove("k").unwrap();
    assert_eq!(store.get("k").unwrap(), None);
}

#[test]
fn collections_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("ledger.sqlite");

    let (txs, cats, content) = {
        let store: SharedStore = Arc::new(db::open_or_init(&path).unwrap());
        let mem = seeded();
        for key in [keys::TRANSACTIONS, keys::BUDGET_CATEGORIES, keys::EDUCATIONAL_CONTENT] {
            let entry = mem.get(key).unwrap().unwrap();
            store.put(key, &entry.value, Expect::Absent).unwrap();
        }
        let progress = vec![UserProgress {
            content_id: "2".into(),
            completed: true,
            completed_at: None,
            quiz_score: Some(50.0),
            time_spent: 12,
        }];
        store::save(store.as_ref(), keys::USER_PROGRESS, &progress).unwrap();
        (
            store::load::<Vec<Transaction>>(mem.as_ref(), keys::TRANSACTIONS).unwrap().unwrap(),
            store::load::<Vec<BudgetCategory>>(mem.as_ref(), keys::BUDGET_CATEGORIES).unwrap().unwrap(),
            store::load::<Vec<EducationalContent>>(mem.as_ref(), keys::EDUCATIONAL_CONTENT).unwrap().unwrap(),
        )
    };

    let reopened = db::open_or_init(&path).unwrap();
    let txs2: Vec<Transaction> = store::load(&reopened, keys::TRANSACTIONS).unwrap().unwrap();
    let cats2: Vec<BudgetCategory> = store::load(&reopened, keys::BUDGET_CATEGORIES).unwrap().unwrap();
    let content2: Vec<EducationalContent> =
        store::load(&reopened, keys::EDUCATIONAL_CONTENT).unwrap().unwrap();
    let progress2: Vec<UserProgress> = store::load(&reopened, keys::USER_PROGRESS).unwrap().unwrap();
    assert_eq!(txs, txs2);
    assert_eq!(cats, cats2);
    assert_eq!(content, content2);
    assert_eq!(progress2.len(), 1);
    assert_eq!(progress2[0].quiz_score, Some(50.0));
}

#[test]
fn stored_json_uses_camel_case_and_type_field() {
    let store = seeded();
    let raw = store.get(keys::TRANSACTIONS).unwrap().unwrap().value;
    let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(v[0]["type"], "expense");
    assert_eq!(v[0]["amount"], 25.5);
    assert_eq!(v[1]["type"], "income");

    let raw = store.get(keys::EDUCATIONAL_CONTENT).unwrap().unwrap().value;
    let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(v[0].get("estimatedReadTime").is_some());
    assert!(v[0].get("createdAt").is_some());
}

#[test]
fn corrupt_collection_is_a_json_error() {
    let store = MemoryStore::new();
    store.put(keys::TRANSACTIONS, "{not json", Expect::Any).unwrap();
    let err = store::load::<Vec<Transaction>>(&store, keys::TRANSACTIONS).unwrap_err();
    assert!(matches!(err, StorageError::Json { ref key, .. } if key == keys::TRANSACTIONS));
}

/// Lets another writer slip in before the first `racing` versioned writes.
struct RacingStore {
    inner: MemoryStore,
    racing: AtomicUsize,
    intruder: String,
}

impl KvStore for RacingStore {
    fn get(&self, key: &str) -> Result<Option<Entry>> {
        self.inner.get(key)
    }

    fn put(&self, key: &str, value: &str, expect: Expect) -> Result<u64> {
        if matches!(expect, Expect::Version(_)) && self.racing.load(Ordering::SeqCst) > 0 {
            self.racing.fetch_sub(1, Ordering::SeqCst);
            self.inner.put(key, &self.intruder, Expect::Any)?;
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

fn racing_store(racing: usize) -> Arc<RacingStore> {
    let intruder = serde_json::json!([{
        "id": "77",
        "type": "income",
        "amount": 5.0,
        "category": "Gift",
        "description": "written concurrently",
        "date": "2025-03-01"
    }]);
    let store = RacingStore {
        inner: MemoryStore::new(),
        racing: AtomicUsize::new(racing),
        intruder: intruder.to_string(),
    };
    store.inner.put(keys::TRANSACTIONS, "[]", Expect::Any).unwrap();
    Arc::new(store)
}

#[test]
fn concurrent_write_is_retried_not_lost() {
    let store = racing_store(1);
    let svc = FinancialService::new(store.clone());
    let tx = svc
        .add_transaction_on(
            common::new_tx(TransactionKind::Expense, 9, "Food", None),
            common::date("2025-03-02"),
        )
        .unwrap();

    let all = svc.list_transactions().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, tx.id);
    assert_eq!(all[1].id, "77");
}

#[test]
fn update_gives_up_after_repeated_conflicts() {
    let store = racing_store(store::MAX_CAS_ATTEMPTS);
    let err = store::update(store.as_ref(), keys::TRANSACTIONS, |txs: &mut Vec<Transaction>| {
        txs.clear();
        txs.push(serde_json::from_value(serde_json::json!({
            "id": "1", "type": "expense", "amount": 1.0,
            "category": "x", "description": "", "date": "2025-01-01"
        }))
        .unwrap());
    })
    .unwrap_err();
    assert!(err.is_conflict());
}
