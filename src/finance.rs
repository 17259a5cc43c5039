// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Transactions and the figures derived from them.

use crate::error::Result;
use crate::models::{
    CategoryExpense, FinancialSummary, MonthlyStat, NewTransaction, Transaction, TransactionKind,
};
use crate::store::{self, SharedStore, keys};
use chrono::{Datelike, Local, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::BTreeMap;
use tracing::debug;

/// Monthly stats keep at most this many trailing months.
pub const MONTHLY_STATS_WINDOW: usize = 12;

#[derive(Clone)]
pub struct FinancialService {
    store: SharedStore,
}

impl FinancialService {
    pub fn new(store: SharedStore) -> Self {
        FinancialService { store }
    }

    /// All transactions, newest first.
    pub fn list_transactions(&self) -> Result<Vec<Transaction>> {
        Ok(store::load(self.store.as_ref(), keys::TRANSACTIONS)?.unwrap_or_default())
    }

    pub fn add_transaction(&self, input: NewTransaction) -> Result<Transaction> {
        self.add_transaction_on(input, Local::now().date_naive())
    }

    /// Like [`add_transaction`](Self::add_transaction), with `today` used as the default date.
    pub fn add_transaction_on(&self, input: NewTransaction, today: NaiveDate) -> Result<Transaction> {
        let now_ms = Utc::now().timestamp_millis();
        let created = store::update(
            self.store.as_ref(),
            keys::TRANSACTIONS,
            |txs: &mut Vec<Transaction>| {
                let tx = Transaction {
                    id: next_id(txs, now_ms),
                    kind: input.kind,
                    amount: input.amount,
                    category: input.category.clone(),
                    description: input.description.clone(),
                    date: input.date.unwrap_or(today),
                    user_id: input.user_id.clone(),
                };
                txs.insert(0, tx.clone());
                tx
            },
        )?;
        debug!("added transaction {} ({} {})", created.id, created.kind, created.amount);
        self.refresh_summary(today)?;
        Ok(created)
    }

    /// Removes the transaction with `id`; an unknown id is not an error.
    pub fn delete_transaction(&self, id: &str) -> Result<()> {
        self.delete_transaction_on(id, Local::now().date_naive())
    }

    pub fn delete_transaction_on(&self, id: &str, today: NaiveDate) -> Result<()> {
        let removed = store::update(
            self.store.as_ref(),
            keys::TRANSACTIONS,
            |txs: &mut Vec<Transaction>| {
                let before = txs.len();
                txs.retain(|t| t.id != id);
                before - txs.len()
            },
        )?;
        if removed == 0 {
            debug!("delete of unknown transaction '{}' ignored", id);
        }
        self.refresh_summary(today)?;
        Ok(())
    }

    pub fn financial_summary(&self) -> Result<FinancialSummary> {
        self.summary_for(Local::now().date_naive())
    }

    pub fn summary_for(&self, today: NaiveDate) -> Result<FinancialSummary> {
        Ok(summarize(&self.list_transactions()?, today))
    }

    /// Last computed summary, as cached after the most recent mutation.
    pub fn cached_summary(&self) -> Result<Option<FinancialSummary>> {
        store::load(self.store.as_ref(), keys::FINANCIAL_SUMMARY)
    }

    fn refresh_summary(&self, today: NaiveDate) -> Result<FinancialSummary> {
        let summary = self.summary_for(today)?;
        store::save(self.store.as_ref(), keys::FINANCIAL_SUMMARY, &summary)?;
        Ok(summary)
    }

    pub fn monthly_stats(&self) -> Result<Vec<MonthlyStat>> {
        Ok(monthly_stats(&self.list_transactions()?))
    }

    pub fn category_expenses(&self) -> Result<Vec<CategoryExpense>> {
        self.category_expenses_for(Local::now().date_naive())
    }

    pub fn category_expenses_for(&self, today: NaiveDate) -> Result<Vec<CategoryExpense>> {
        Ok(category_expenses(&self.list_transactions()?, today))
    }
}

/// Time-based id, bumped past the largest numeric id already present so
/// two adds in the same millisecond still get distinct, increasing ids.
fn next_id(existing: &[Transaction], now_ms: i64) -> String {
    let max_seen = existing
        .iter()
        .filter_map(|t| t.id.parse::<i64>().ok())
        .max()
        .unwrap_or(0);
    now_ms.max(max_seen + 1).to_string()
}

pub fn same_month(date: NaiveDate, today: NaiveDate) -> bool {
    date.year() == today.year() && date.month() == today.month()
}

/// Adds amounts, saturating at the bounds of `Decimal` instead of panicking.
pub fn saturating_sum<I: IntoIterator<Item = Decimal>>(amounts: I) -> Decimal {
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |acc, a| acc.saturating_add(a))
}

fn sum_of(txs: &[&Transaction], kind: TransactionKind) -> Decimal {
    saturating_sum(txs.iter().filter(|t| t.kind == kind).map(|t| t.amount))
}

pub fn summarize(txs: &[Transaction], today: NaiveDate) -> FinancialSummary {
    let all: Vec<&Transaction> = txs.iter().collect();
    let monthly: Vec<&Transaction> = txs.iter().filter(|t| same_month(t.date, today)).collect();

    let monthly_income = sum_of(&monthly, TransactionKind::Income);
    let monthly_expenses = sum_of(&monthly, TransactionKind::Expense);
    let total_income = sum_of(&all, TransactionKind::Income);
    let total_expenses = sum_of(&all, TransactionKind::Expense);

    FinancialSummary {
        balance: total_income.saturating_sub(total_expenses),
        monthly_income,
        monthly_expenses,
        savings: monthly_income
            .saturating_sub(monthly_expenses)
            .max(Decimal::ZERO),
        total_transactions: txs.len(),
    }
}

pub fn monthly_stats(txs: &[Transaction]) -> Vec<MonthlyStat> {
    let mut map: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for t in txs {
        let entry = map
            .entry(t.date.format("%Y-%m").to_string())
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        match t.kind {
            TransactionKind::Income => entry.0 = entry.0.saturating_add(t.amount),
            TransactionKind::Expense => entry.1 = entry.1.saturating_add(t.amount),
        }
    }
    let skip = map.len().saturating_sub(MONTHLY_STATS_WINDOW);
    map.into_iter()
        .skip(skip)
        .map(|(month, (income, expenses))| MonthlyStat {
            month,
            income,
            expenses,
        })
        .collect()
}

pub fn category_expenses(txs: &[Transaction], today: NaiveDate) -> Vec<CategoryExpense> {
    // first-seen order, so equal amounts keep a stable order after sorting
    let mut totals: Vec<(String, Decimal)> = Vec::new();
    let mut total = Decimal::ZERO;
    for t in txs
        .iter()
        .filter(|t| t.kind == TransactionKind::Expense && same_month(t.date, today))
    {
        match totals.iter_mut().find(|(c, _)| *c == t.category) {
            Some((_, amt)) => *amt = amt.saturating_add(t.amount),
            None => totals.push((t.category.clone(), t.amount)),
        }
        total = total.saturating_add(t.amount);
    }
    let mut out: Vec<CategoryExpense> = totals
        .into_iter()
        .map(|(category, amount)| CategoryExpense {
            percentage: percent_of(amount, total),
            category,
            amount,
        })
        .collect();
    out.sort_by(|a, b| b.amount.cmp(&a.amount));
    out
}

/// `part / whole * 100`, or 0 when `whole` is zero or the result does not fit.
pub fn percent_of(part: Decimal, whole: Decimal) -> f64 {
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|pct| pct.to_f64())
        .unwrap_or(0.0)
}

pub fn by_category<'a>(txs: &'a [Transaction], category: &str) -> Vec<&'a Transaction> {
    txs.iter().filter(|t| t.category == category).collect()
}

pub fn by_kind(txs: &[Transaction], kind: TransactionKind) -> Vec<&Transaction> {
    txs.iter().filter(|t| t.kind == kind).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: &str, kind: TransactionKind, amount: i64, category: &str, date: &str) -> Transaction {
        Transaction {
            id: id.into(),
            kind,
            amount: Decimal::from(amount),
            category: category.into(),
            description: String::new(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            user_id: None,
        }
    }

    #[test]
    fn next_id_is_strictly_increasing() {
        let existing = vec![tx("5000", TransactionKind::Income, 1, "a", "2025-01-01")];
        assert_eq!(next_id(&existing, 4000), "5001");
        assert_eq!(next_id(&existing, 9000), "9000");
        assert_eq!(next_id(&[], 42), "42");
    }

    #[test]
    fn monthly_stats_keeps_last_twelve_months_ascending() {
        let mut txs = Vec::new();
        for m in 1..=12 {
            txs.push(tx(&m.to_string(), TransactionKind::Income, 10, "Pay", &format!("2024-{:02}-15", m)));
        }
        txs.push(tx("13", TransactionKind::Expense, 4, "Food", "2025-01-02"));
        txs.push(tx("14", TransactionKind::Income, 7, "Pay", "2025-01-03"));

        let stats = monthly_stats(&txs);
        assert_eq!(stats.len(), 12);
        assert_eq!(stats[0].month, "2024-02");
        assert_eq!(stats[11].month, "2025-01");
        assert_eq!(stats[11].income, Decimal::from(7));
        assert_eq!(stats[11].expenses, Decimal::from(4));
    }

    #[test]
    fn category_expenses_ignores_other_months_and_income() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();
        let txs = vec![
            tx("1", TransactionKind::Expense, 30, "Food", "2025-06-01"),
            tx("2", TransactionKind::Expense, 10, "Fun", "2025-06-02"),
            tx("3", TransactionKind::Expense, 60, "Rent", "2025-05-30"),
            tx("4", TransactionKind::Income, 500, "Pay", "2025-06-03"),
            tx("5", TransactionKind::Expense, 10, "Food", "2025-06-04"),
        ];
        let out = category_expenses(&txs, today);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].category, "Food");
        assert_eq!(out[0].amount, Decimal::from(40));
        assert!((out[0].percentage - 80.0).abs() < 1e-9);
        assert!((out[1].percentage - 20.0).abs() < 1e-9);
    }

    #[test]
    fn percent_of_zero_total_is_zero() {
        assert_eq!(percent_of(Decimal::from(5), Decimal::ZERO), 0.0);
    }

    #[test]
    fn percent_of_large_values_does_not_overflow() {
        let big = Decimal::from_i128_with_scale(10_i128.pow(27), 0);
        assert!((percent_of(big, big) - 100.0).abs() < 1e-9);
        assert_eq!(percent_of(Decimal::MAX, Decimal::ONE), 0.0);
    }

    #[test]
    fn summary_saturates_instead_of_overflowing() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();
        let mut txs = vec![
            tx("1", TransactionKind::Income, 1, "Pay", "2025-06-01"),
            tx("2", TransactionKind::Income, 1, "Pay", "2025-06-02"),
        ];
        for t in txs.iter_mut() {
            t.amount = Decimal::MAX;
        }
        let s = summarize(&txs, today);
        assert_eq!(s.balance, Decimal::MAX);
        assert_eq!(s.monthly_income, Decimal::MAX);
        assert_eq!(s.savings, Decimal::MAX);
        assert_eq!(monthly_stats(&txs)[0].income, Decimal::MAX);
    }
}
