// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::ensure_loaded;
use crate::budget::{self, ledger_drift};
use crate::config::Config;
use crate::finance::FinancialService;
use crate::store::SharedStore;
use crate::utils::{fmt_money, fmt_pct, maybe_print_json, parse_amount, pretty_table};
use crate::views::BudgetView;
use anyhow::{Context, Result};
use chrono::Local;

pub fn handle(store: &SharedStore, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(store, cfg, sub)?,
        Some(("set", sub)) => set(store, sub)?,
        Some(("status", sub)) => status(store, cfg, sub)?,
        Some(("drift", sub)) => drift(store, cfg, sub)?,
        _ => {}
    }
    Ok(())
}

fn list(store: &SharedStore, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let view = BudgetView::new(store.clone());
    ensure_loaded(&view.state)?;
    if !maybe_print_json(json_flag, jsonl_flag, &view.categories())? {
        let rows = view
            .categories()
            .iter()
            .map(|c| {
                vec![
                    c.id.clone(),
                    format!("{} {}", c.icon, c.name),
                    fmt_money(&c.budget, &cfg.currency),
                    fmt_money(&c.spent, &cfg.currency),
                    if c.is_over_budget() { "over".into() } else { String::new() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Category", "Budget", "Spent", ""], rows)
        );
    }
    Ok(())
}

fn set(store: &SharedStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").context("missing id")?.trim();
    let mut view = BudgetView::new(store.clone());
    ensure_loaded(&view.state)?;
    let Some(mut cat) = view.categories().iter().find(|c| c.id == id).cloned() else {
        println!("No budget category with id {}", id);
        return Ok(());
    };
    if let Some(name) = sub.get_one::<String>("name") {
        cat.name = name.trim().to_string();
    }
    if let Some(b) = sub.get_one::<String>("budget") {
        cat.budget = parse_amount("budget", b)?;
    }
    if let Some(s) = sub.get_one::<String>("spent") {
        cat.spent = parse_amount("spent", s)?;
    }
    if let Some(color) = sub.get_one::<String>("color") {
        cat.color = color.trim().to_string();
    }
    if let Some(icon) = sub.get_one::<String>("icon") {
        cat.icon = icon.trim().to_string();
    }
    let updated = view.update_category(cat)?;
    println!(
        "Updated '{}': budget {} / spent {}",
        updated.name, updated.budget, updated.spent
    );
    Ok(())
}

fn status(store: &SharedStore, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let view = BudgetView::new(store.clone());
    ensure_loaded(&view.state)?;
    let out = budget::status(view.categories());
    if !maybe_print_json(json_flag, jsonl_flag, &out)? {
        let ccy = &cfg.currency;
        let rows = vec![
            vec!["Total budget".into(), fmt_money(&out.total_budget, ccy)],
            vec!["Total spent".into(), fmt_money(&out.total_spent, ccy)],
            vec!["Remaining".into(), fmt_money(&out.remaining, ccy)],
            vec!["Utilization".into(), fmt_pct(out.utilization)],
            vec!["Over budget".into(), out.over_budget.join(", ")],
        ];
        println!("{}", pretty_table(&["Metric", "Value"], rows));
    }
    Ok(())
}

fn drift(store: &SharedStore, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let view = BudgetView::new(store.clone());
    ensure_loaded(&view.state)?;
    let txs = FinancialService::new(store.clone()).list_transactions()?;
    let report = ledger_drift(view.categories(), &txs, Local::now().date_naive());
    if !maybe_print_json(json_flag, jsonl_flag, &report)? {
        let rows = report
            .iter()
            .map(|d| {
                vec![
                    d.category.clone(),
                    fmt_money(&d.recorded, &cfg.currency),
                    fmt_money(&d.ledger, &cfg.currency),
                    fmt_money(&d.difference, &cfg.currency),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Recorded", "Ledger", "Difference"], rows)
        );
    }
    Ok(())
}
