// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::ensure_loaded;
use crate::config::Config;
use crate::finance::FinancialService;
use crate::store::SharedStore;
use crate::utils::{fmt_money, fmt_pct, maybe_print_json, pretty_table};
use crate::views::SummaryView;
use anyhow::{Context, Result};
use serde_json::json;

pub fn summary(store: &SharedStore, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let view = SummaryView::new(store.clone());
    ensure_loaded(&view.state)?;
    let s = view.summary().context("Financial summary unavailable")?;

    let out = json!({
        "summary": s,
        "savingsRate": view.savings_rate(),
        "expenseRatio": view.expense_ratio(),
        "trend": view.net_worth_trend(),
    });
    if !maybe_print_json(json_flag, jsonl_flag, &out)? {
        let ccy = &cfg.currency;
        let rows = vec![
            vec!["Balance".into(), fmt_money(&s.balance, ccy)],
            vec!["Monthly income".into(), fmt_money(&s.monthly_income, ccy)],
            vec!["Monthly expenses".into(), fmt_money(&s.monthly_expenses, ccy)],
            vec!["Savings".into(), fmt_money(&s.savings, ccy)],
            vec!["Savings rate".into(), fmt_pct(view.savings_rate())],
            vec!["Expense ratio".into(), fmt_pct(view.expense_ratio())],
            vec!["Trend".into(), format!("{:?}", view.net_worth_trend()).to_lowercase()],
            vec!["Transactions".into(), s.total_transactions.to_string()],
        ];
        println!("{}", pretty_table(&["Metric", "Value"], rows));
    }
    Ok(())
}

pub fn handle_stats(store: &SharedStore, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("monthly", sub)) => monthly(store, cfg, sub)?,
        Some(("categories", sub)) => categories(store, cfg, sub)?,
        _ => {}
    }
    Ok(())
}

fn monthly(store: &SharedStore, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let stats = FinancialService::new(store.clone()).monthly_stats()?;
    if !maybe_print_json(json_flag, jsonl_flag, &stats)? {
        let rows = stats
            .iter()
            .map(|s| {
                vec![
                    s.month.clone(),
                    fmt_money(&s.income, &cfg.currency),
                    fmt_money(&s.expenses, &cfg.currency),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Month", "Income", "Expenses"], rows));
    }
    Ok(())
}

fn categories(store: &SharedStore, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let breakdown = FinancialService::new(store.clone()).category_expenses()?;
    if !maybe_print_json(json_flag, jsonl_flag, &breakdown)? {
        let rows = breakdown
            .iter()
            .map(|c| {
                vec![
                    c.category.clone(),
                    fmt_money(&c.amount, &cfg.currency),
                    fmt_pct(c.percentage),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Spent", "Share"], rows));
    }
    Ok(())
}
