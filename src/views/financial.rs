// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::ViewState;
use crate::budget::{self, BudgetService};
use crate::error::Result;
use crate::finance::{self, FinancialService};
use crate::models::{
    BudgetCategory, FinancialSummary, NewTransaction, Transaction, TransactionKind,
};
use crate::store::SharedStore;
use rust_decimal::Decimal;
use serde::Serialize;

pub const RECENT_TRANSACTIONS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinancialData {
    pub transactions: Vec<Transaction>,
    pub summary: Option<FinancialSummary>,
    pub categories: Vec<BudgetCategory>,
}

/// Dashboard data: transactions, summary and budget categories together.
pub struct FinancialDataView {
    finance: FinancialService,
    budget: BudgetService,
    pub state: ViewState<FinancialData>,
}

impl FinancialDataView {
    pub fn new(store: SharedStore) -> Self {
        let mut view = FinancialDataView {
            finance: FinancialService::new(store.clone()),
            budget: BudgetService::new(store),
            state: ViewState::default(),
        };
        view.load();
        view
    }

    pub fn load(&mut self) {
        self.state.begin();
        let result = (|| -> Result<FinancialData> {
            Ok(FinancialData {
                transactions: self.finance.list_transactions()?,
                summary: Some(self.finance.financial_summary()?),
                categories: self.budget.list_categories()?,
            })
        })();
        self.state.finish(result, "Error loading financial data");
    }

    pub fn refresh(&mut self) {
        self.load();
    }

    pub fn add_transaction(&mut self, input: NewTransaction) -> Result<Transaction> {
        let created = self
            .finance
            .add_transaction(input)
            .map_err(|e| self.state.fail("Error adding transaction", e))?;
        self.state.data.transactions.insert(0, created.clone());
        let summary = self
            .finance
            .financial_summary()
            .map_err(|e| self.state.fail("Error adding transaction", e))?;
        self.state.data.summary = Some(summary);
        Ok(created)
    }

    pub fn delete_transaction(&mut self, id: &str) -> Result<()> {
        self.finance
            .delete_transaction(id)
            .map_err(|e| self.state.fail("Error deleting transaction", e))?;
        self.state.data.transactions.retain(|t| t.id != id);
        let summary = self
            .finance
            .financial_summary()
            .map_err(|e| self.state.fail("Error deleting transaction", e))?;
        self.state.data.summary = Some(summary);
        Ok(())
    }

    pub fn update_budget_category(&mut self, category: BudgetCategory) -> Result<BudgetCategory> {
        let updated = self
            .budget
            .update_category(category)
            .map_err(|e| self.state.fail("Error updating budget category", e))?;
        replace_category(&mut self.state.data.categories, &updated);
        Ok(updated)
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.state.data.transactions
    }

    pub fn summary(&self) -> Option<&FinancialSummary> {
        self.state.data.summary.as_ref()
    }

    pub fn categories(&self) -> &[BudgetCategory] {
        &self.state.data.categories
    }
}

fn replace_category(cats: &mut [BudgetCategory], updated: &BudgetCategory) {
    for c in cats.iter_mut().filter(|c| c.id == updated.id) {
        *c = updated.clone();
    }
}

/// Transaction list with filters.
pub struct TransactionsView {
    finance: FinancialService,
    pub state: ViewState<Vec<Transaction>>,
}

impl TransactionsView {
    pub fn new(store: SharedStore) -> Self {
        let mut view = TransactionsView {
            finance: FinancialService::new(store),
            state: ViewState::default(),
        };
        view.load();
        view
    }

    pub fn load(&mut self) {
        self.state.begin();
        let result = self.finance.list_transactions();
        self.state.finish(result, "Error loading transactions");
    }

    pub fn refresh(&mut self) {
        self.load();
    }

    pub fn add_transaction(&mut self, input: NewTransaction) -> Result<Transaction> {
        let created = self
            .finance
            .add_transaction(input)
            .map_err(|e| self.state.fail("Error adding transaction", e))?;
        self.state.data.insert(0, created.clone());
        Ok(created)
    }

    pub fn delete_transaction(&mut self, id: &str) -> Result<()> {
        self.finance
            .delete_transaction(id)
            .map_err(|e| self.state.fail("Error deleting transaction", e))?;
        self.state.data.retain(|t| t.id != id);
        Ok(())
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.state.data
    }

    pub fn recent(&self, limit: usize) -> &[Transaction] {
        &self.state.data[..limit.min(self.state.data.len())]
    }

    pub fn by_category(&self, category: &str) -> Vec<&Transaction> {
        finance::by_category(&self.state.data, category)
    }

    pub fn by_kind(&self, kind: TransactionKind) -> Vec<&Transaction> {
        finance::by_kind(&self.state.data, kind)
    }
}

/// Budget categories with totals.
pub struct BudgetView {
    budget: BudgetService,
    pub state: ViewState<Vec<BudgetCategory>>,
}

impl BudgetView {
    pub fn new(store: SharedStore) -> Self {
        let mut view = BudgetView {
            budget: BudgetService::new(store),
            state: ViewState::default(),
        };
        view.load();
        view
    }

    pub fn load(&mut self) {
        self.state.begin();
        let result = self.budget.list_categories();
        self.state.finish(result, "Error loading budget categories");
    }

    pub fn refresh(&mut self) {
        self.load();
    }

    pub fn update_category(&mut self, category: BudgetCategory) -> Result<BudgetCategory> {
        let updated = self
            .budget
            .update_category(category)
            .map_err(|e| self.state.fail("Error updating category", e))?;
        replace_category(&mut self.state.data, &updated);
        Ok(updated)
    }

    pub fn categories(&self) -> &[BudgetCategory] {
        &self.state.data
    }

    pub fn total_budget(&self) -> Decimal {
        budget::total_budget(&self.state.data)
    }

    pub fn total_spent(&self) -> Decimal {
        budget::total_spent(&self.state.data)
    }

    pub fn remaining(&self) -> Decimal {
        budget::remaining(&self.state.data)
    }

    pub fn over_budget(&self) -> Vec<&BudgetCategory> {
        budget::over_budget(&self.state.data)
    }

    pub fn utilization(&self) -> f64 {
        budget::utilization(&self.state.data)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Positive,
    Negative,
    Neutral,
}

/// Summary figures with ratios against monthly income.
pub struct SummaryView {
    finance: FinancialService,
    pub state: ViewState<Option<FinancialSummary>>,
}

impl SummaryView {
    pub fn new(store: SharedStore) -> Self {
        let mut view = SummaryView {
            finance: FinancialService::new(store),
            state: ViewState::default(),
        };
        view.load();
        view
    }

    pub fn load(&mut self) {
        self.state.begin();
        let result = self.finance.financial_summary().map(Some);
        self.state.finish(result, "Error loading financial summary");
    }

    pub fn refresh(&mut self) {
        self.load();
    }

    pub fn summary(&self) -> Option<&FinancialSummary> {
        self.state.data.as_ref()
    }

    /// Savings as a percentage of monthly income; 0 without income.
    pub fn savings_rate(&self) -> f64 {
        match &self.state.data {
            Some(s) => finance::percent_of(s.savings, s.monthly_income),
            None => 0.0,
        }
    }

    pub fn expense_ratio(&self) -> f64 {
        match &self.state.data {
            Some(s) => finance::percent_of(s.monthly_expenses, s.monthly_income),
            None => 0.0,
        }
    }

    pub fn net_worth_trend(&self) -> Trend {
        let Some(s) = &self.state.data else {
            return Trend::Neutral;
        };
        let monthly = s.monthly_income - s.monthly_expenses;
        if monthly > Decimal::ZERO {
            Trend::Positive
        } else if monthly < Decimal::ZERO {
            Trend::Negative
        } else {
            Trend::Neutral
        }
    }
}
