// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::Result;
use crate::finance::{percent_of, same_month, saturating_sum};
use crate::models::{BudgetCategory, Transaction, TransactionKind};
use crate::store::{self, SharedStore, keys};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

#[derive(Clone)]
pub struct BudgetService {
    store: SharedStore,
}

impl BudgetService {
    pub fn new(store: SharedStore) -> Self {
        BudgetService { store }
    }

    pub fn list_categories(&self) -> Result<Vec<BudgetCategory>> {
        Ok(store::load(self.store.as_ref(), keys::BUDGET_CATEGORIES)?.unwrap_or_default())
    }

    /// Replaces the category with the same id. An unknown id persists nothing
    /// and hands the input back unchanged.
    pub fn update_category(&self, category: BudgetCategory) -> Result<BudgetCategory> {
        let found = store::update(
            self.store.as_ref(),
            keys::BUDGET_CATEGORIES,
            |cats: &mut Vec<BudgetCategory>| match cats.iter_mut().find(|c| c.id == category.id) {
                Some(slot) => {
                    *slot = category.clone();
                    true
                }
                None => false,
            },
        )?;
        if !found {
            debug!("update of unknown budget category '{}' ignored", category.id);
        }
        Ok(category)
    }
}

pub fn total_budget(cats: &[BudgetCategory]) -> Decimal {
    saturating_sum(cats.iter().map(|c| c.budget))
}

pub fn total_spent(cats: &[BudgetCategory]) -> Decimal {
    saturating_sum(cats.iter().map(|c| c.spent))
}

pub fn remaining(cats: &[BudgetCategory]) -> Decimal {
    total_budget(cats).saturating_sub(total_spent(cats))
}

/// Spent as a percentage of budget across all categories; 0 with no budget.
pub fn utilization(cats: &[BudgetCategory]) -> f64 {
    percent_of(total_spent(cats), total_budget(cats))
}

pub fn over_budget(cats: &[BudgetCategory]) -> Vec<&BudgetCategory> {
    cats.iter().filter(|c| c.is_over_budget()).collect()
}

/// Totals printed by `budget status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_budget: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_spent: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining: Decimal,
    pub utilization: f64,
    pub over_budget: Vec<String>,
}

pub fn status(cats: &[BudgetCategory]) -> BudgetStatus {
    BudgetStatus {
        total_budget: total_budget(cats),
        total_spent: total_spent(cats),
        remaining: remaining(cats),
        utilization: utilization(cats),
        over_budget: over_budget(cats).iter().map(|c| c.name.clone()).collect(),
    }
}

/// Recorded `spent` next to what the ledger says for the same month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerDrift {
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub recorded: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub ledger: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub difference: Decimal,
}

/// Compares each category's `spent` with the expense transactions of the
/// month containing `today` whose category label equals the category name.
/// Read-only: `spent` stays whatever the user entered.
pub fn ledger_drift(
    cats: &[BudgetCategory],
    txs: &[Transaction],
    today: NaiveDate,
) -> Vec<LedgerDrift> {
    cats.iter()
        .map(|c| {
            let ledger = saturating_sum(
                txs.iter()
                    .filter(|t| {
                        t.kind == TransactionKind::Expense
                            && t.category == c.name
                            && same_month(t.date, today)
                    })
                    .map(|t| t.amount),
            );
            LedgerDrift {
                category: c.name.clone(),
                recorded: c.spent,
                ledger,
                difference: c.spent.saturating_sub(ledger),
            }
        })
        .collect()
}
