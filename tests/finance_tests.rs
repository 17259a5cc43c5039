// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{date, new_tx};
use pocketledger::finance::FinancialService;
use pocketledger::models::TransactionKind::{Expense, Income};
use pocketledger::store::{KvStore, MemoryStore, keys};
use rust_decimal::Decimal;

#[test]
fn adds_are_listed_newest_first_and_counted() {
    let svc = FinancialService::new(MemoryStore::shared());
    let today = date("2025-06-15");
    let mut ids = Vec::new();
    for i in 1..=4 {
        ids.push(svc.add_transaction_on(new_tx(Income, i, "Pay", None), today).unwrap().id);
    }
    svc.delete_transaction_on(&ids[1], today).unwrap();

    let listed: Vec<String> = svc.list_transactions().unwrap().into_iter().map(|t| t.id).collect();
    assert_eq!(listed, vec![ids[3].clone(), ids[2].clone(), ids[0].clone()]);
    assert_eq!(svc.summary_for(today).unwrap().total_transactions, 3);

    // ids are numeric and strictly increasing
    let nums: Vec<i64> = ids.iter().map(|id| id.parse().unwrap()).collect();
    assert!(nums.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn two_adds_on_empty_store_give_expected_summary() {
    let store = MemoryStore::shared();
    let svc = FinancialService::new(store.clone());
    let today = date("2025-06-15");
    svc.add_transaction_on(new_tx(Income, 1000, "Salary", Some(today)), today).unwrap();
    svc.add_transaction_on(new_tx(Expense, 200, "Food", Some(today)), today).unwrap();

    let s = svc.summary_for(today).unwrap();
    assert_eq!(s.balance, Decimal::from(800));
    assert_eq!(s.monthly_income, Decimal::from(1000));
    assert_eq!(s.monthly_expenses, Decimal::from(200));
    assert_eq!(s.savings, Decimal::from(800));
    assert_eq!(s.total_transactions, 2);

    // the last mutation caches the summary
    assert_eq!(svc.cached_summary().unwrap(), Some(s));
    assert!(store.get(keys::FINANCIAL_SUMMARY).unwrap().is_some());
}

#[test]
fn balance_covers_history_while_monthly_figures_do_not() {
    let svc = FinancialService::new(MemoryStore::shared());
    let today = date("2025-06-15");
    svc.add_transaction_on(new_tx(Income, 5000, "Salary", Some(date("2024-12-01"))), today).unwrap();
    svc.add_transaction_on(new_tx(Expense, 700, "Rent", Some(date("2025-05-31"))), today).unwrap();
    svc.add_transaction_on(new_tx(Income, 300, "Gift", Some(date("2025-06-01"))), today).unwrap();
    svc.add_transaction_on(new_tx(Expense, 450, "Food", Some(date("2025-06-30"))), today).unwrap();
    // same month number, previous year
    svc.add_transaction_on(new_tx(Expense, 99, "Food", Some(date("2024-06-15"))), today).unwrap();

    let s = svc.summary_for(today).unwrap();
    assert_eq!(s.balance, Decimal::from(5000 - 700 + 300 - 450 - 99));
    assert_eq!(s.monthly_income, Decimal::from(300));
    assert_eq!(s.monthly_expenses, Decimal::from(450));
    // never negative
    assert_eq!(s.savings, Decimal::ZERO);
}

#[test]
fn missing_date_defaults_to_today() {
    let svc = FinancialService::new(MemoryStore::shared());
    let today = date("2025-02-28");
    let tx = svc.add_transaction_on(new_tx(Expense, 3, "Coffee", None), today).unwrap();
    assert_eq!(tx.date, today);
}

#[test]
fn deleting_unknown_id_changes_nothing() {
    let store = common::seeded();
    let svc = FinancialService::new(store.clone());
    let before = store.get(keys::TRANSACTIONS).unwrap().unwrap();
    svc.delete_transaction_on("does-not-exist", date("2025-03-10")).unwrap();
    assert_eq!(store.get(keys::TRANSACTIONS).unwrap().unwrap(), before);
    assert_eq!(svc.list_transactions().unwrap().len(), 3);
}

#[test]
fn category_expenses_for_current_month() {
    let svc = FinancialService::new(MemoryStore::shared());
    let today = date("2025-06-15");
    svc.add_transaction_on(new_tx(Expense, 100, "Food", Some(today)), today).unwrap();
    svc.add_transaction_on(new_tx(Expense, 300, "Rent", Some(today)), today).unwrap();
    svc.add_transaction_on(new_tx(Expense, 100, "Food", Some(today)), today).unwrap();
    svc.add_transaction_on(new_tx(Income, 900, "Salary", Some(today)), today).unwrap();
    svc.add_transaction_on(new_tx(Expense, 50, "Food", Some(date("2025-05-01"))), today).unwrap();

    let out = svc.category_expenses_for(today).unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].category, "Rent");
    assert_eq!(out[0].amount, Decimal::from(300));
    assert!((out[0].percentage - 60.0).abs() < 1e-9);
    assert_eq!(out[1].category, "Food");
    assert!((out[1].percentage - 40.0).abs() < 1e-9);
}

#[test]
fn monthly_stats_group_by_month() {
    let svc = FinancialService::new(MemoryStore::shared());
    let today = date("2025-06-15");
    svc.add_transaction_on(new_tx(Income, 10, "Pay", Some(date("2025-05-02"))), today).unwrap();
    svc.add_transaction_on(new_tx(Expense, 4, "Food", Some(date("2025-05-20"))), today).unwrap();
    svc.add_transaction_on(new_tx(Expense, 6, "Food", Some(date("2025-06-01"))), today).unwrap();

    let stats = svc.monthly_stats().unwrap();
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].month, "2025-05");
    assert_eq!(stats[0].income, Decimal::from(10));
    assert_eq!(stats[0].expenses, Decimal::from(4));
    assert_eq!(stats[1].month, "2025-06");
    assert_eq!(stats[1].income, Decimal::ZERO);
}

#[test]
fn huge_amounts_keep_the_summary_readable() {
    let svc = FinancialService::new(MemoryStore::shared());
    let today = date("2025-06-15");
    let huge = "50000000000000000000000000000".parse::<Decimal>().unwrap();
    for _ in 0..2 {
        let mut input = new_tx(Income, 1, "Windfall", Some(today));
        input.amount = huge;
        svc.add_transaction_on(input, today).unwrap();
    }

    let s = svc.summary_for(today).unwrap();
    assert_eq!(s.total_transactions, 2);
    assert_eq!(s.balance, Decimal::MAX);
    assert_eq!(s.monthly_income, Decimal::MAX);
    assert_eq!(svc.monthly_stats().unwrap()[0].income, Decimal::MAX);
    assert!(svc.category_expenses_for(today).unwrap().is_empty());
}
