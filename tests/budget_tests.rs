// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{date, new_tx, seeded};
use pocketledger::budget::{self, BudgetService};
use pocketledger::finance::FinancialService;
use pocketledger::models::{BudgetCategory, TransactionKind};
use pocketledger::store::{KvStore, keys};
use rust_decimal::Decimal;

#[test]
fn update_unknown_category_returns_input_and_persists_nothing() {
    let store = seeded();
    let svc = BudgetService::new(store.clone());
    let before = store.get(keys::BUDGET_CATEGORIES).unwrap().unwrap();

    let ghost = BudgetCategory {
        id: "999".into(),
        name: "Travel".into(),
        budget: Decimal::from(1000),
        spent: Decimal::ZERO,
        color: "#123456".into(),
        icon: "✈️".into(),
        user_id: None,
    };
    let out = svc.update_category(ghost.clone()).unwrap();
    assert_eq!(out, ghost);
    assert_eq!(svc.list_categories().unwrap().len(), 6);
    assert_eq!(store.get(keys::BUDGET_CATEGORIES).unwrap().unwrap(), before);
}

#[test]
fn update_replaces_category_in_place() {
    let store = seeded();
    let svc = BudgetService::new(store);
    let mut food = svc.list_categories().unwrap()[0].clone();
    food.budget = Decimal::from(650);
    food.spent = Decimal::new(3315, 1);
    svc.update_category(food.clone()).unwrap();

    let cats = svc.list_categories().unwrap();
    assert_eq!(cats.len(), 6);
    assert_eq!(cats[0], food);
    assert_eq!(cats[1].name, "Transport");
}

#[test]
fn seeded_categories_totals() {
    let cats = BudgetService::new(seeded()).list_categories().unwrap();
    assert_eq!(budget::total_budget(&cats), Decimal::from(1750));
    assert_eq!(budget::total_spent(&cats), Decimal::from(1375));
    assert_eq!(budget::remaining(&cats), Decimal::from(375));
    let over: Vec<&str> = budget::over_budget(&cats).iter().map(|c| c.name.as_str()).collect();
    // spending exactly the budget is not over
    assert_eq!(over, vec!["Shopping"]);
}

#[test]
fn drift_compares_spent_with_month_ledger() {
    let store = seeded();
    let today = date("2025-03-10");
    let fin = FinancialService::new(store.clone());
    fin.add_transaction_on(new_tx(TransactionKind::Expense, 40, "Health", Some(today)), today)
        .unwrap();
    fin.add_transaction_on(
        new_tx(TransactionKind::Expense, 60, "Health", Some(date("2025-02-10"))),
        today,
    )
    .unwrap();

    let svc = BudgetService::new(store);
    let cats = svc.list_categories().unwrap();
    let report = budget::ledger_drift(&cats, &fin.list_transactions().unwrap(), today);
    assert_eq!(report.len(), 6);

    let food = report.iter().find(|d| d.category == "Food").unwrap();
    assert_eq!(food.recorded, Decimal::from(320));
    assert_eq!(food.ledger, Decimal::new(2550, 2));
    assert_eq!(food.difference, Decimal::new(29450, 2));

    let health = report.iter().find(|d| d.category == "Health").unwrap();
    assert_eq!(health.ledger, Decimal::from(40));
    assert_eq!(health.difference, Decimal::from(35));

    // drift is a report only
    assert_eq!(svc.list_categories().unwrap(), cats);
}

#[test]
fn status_and_drift_serialize_amounts_as_numbers() {
    let store = seeded();
    let cats = BudgetService::new(store.clone()).list_categories().unwrap();

    let status = serde_json::to_value(budget::status(&cats)).unwrap();
    assert_eq!(status["totalBudget"], 1750.0);
    assert_eq!(status["totalSpent"], 1375.0);
    assert_eq!(status["remaining"], 375.0);
    assert_eq!(status["overBudget"], serde_json::json!(["Shopping"]));

    let txs = FinancialService::new(store).list_transactions().unwrap();
    let drift = serde_json::to_value(budget::ledger_drift(&cats, &txs, date("2025-03-10"))).unwrap();
    assert_eq!(drift[0]["category"], "Food");
    assert_eq!(drift[0]["recorded"], 320.0);
    assert_eq!(drift[0]["ledger"], 25.5);
    assert_eq!(drift[0]["difference"], 294.5);
}
