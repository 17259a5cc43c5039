// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::ensure_loaded;
use crate::config::Config;
use crate::models::{NewTransaction, Transaction, TransactionKind};
use crate::store::SharedStore;
use crate::utils::{
    fmt_money, maybe_print_json, parse_amount, parse_date, parse_month, parse_search, pretty_table,
};
use crate::views::TransactionsView;
use anyhow::{Context, Result, bail};

pub fn handle(store: &SharedStore, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, cfg, sub)?,
        Some(("list", sub)) => list(store, cfg, sub)?,
        Some(("rm", sub)) => remove(store, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn parse_new_transaction(sub: &clap::ArgMatches) -> Result<NewTransaction> {
    let kind_s = sub.get_one::<String>("type").context("missing --type")?;
    let kind = TransactionKind::parse(kind_s)
        .with_context(|| format!("Invalid type '{}', expected income|expense", kind_s))?;
    let amount = parse_amount("amount", sub.get_one::<String>("amount").context("missing --amount")?)?;
    let category = sub
        .get_one::<String>("category")
        .context("missing --category")?
        .trim()
        .to_string();
    if category.is_empty() {
        bail!("Category must not be empty");
    }
    let description = sub
        .get_one::<String>("description")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    let date = match sub.get_one::<String>("date") {
        Some(d) => Some(parse_date(d)?),
        None => None,
    };
    Ok(NewTransaction {
        kind,
        amount,
        category,
        description,
        date,
        user_id: sub.get_one::<String>("user").map(|s| s.trim().to_string()),
    })
}

fn add(store: &SharedStore, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let input = parse_new_transaction(sub)?;
    let mut view = TransactionsView::new(store.clone());
    ensure_loaded(&view.state)?;
    let tx = view.add_transaction(input)?;
    println!(
        "Recorded {} {} on {} in '{}' (id {})",
        tx.kind,
        fmt_money(&tx.amount, &cfg.currency),
        tx.date,
        tx.category,
        tx.id
    );
    Ok(())
}

fn remove(store: &SharedStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").context("missing id")?.trim();
    let mut view = TransactionsView::new(store.clone());
    ensure_loaded(&view.state)?;
    let known = view.transactions().iter().any(|t| t.id == id);
    view.delete_transaction(id)?;
    if known {
        println!("Removed transaction {}", id);
    } else {
        println!("No transaction with id {}", id);
    }
    Ok(())
}

/// Transactions matching the `tx list` filters, newest first.
pub fn query_rows(store: &SharedStore, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let view = TransactionsView::new(store.clone());
    ensure_loaded(&view.state)?;

    let mut rows: Vec<&Transaction> = match sub.get_one::<String>("category") {
        Some(cat) => view.by_category(cat.trim()),
        None => view.transactions().iter().collect(),
    };
    if let Some(kind) = sub.get_one::<String>("type").and_then(|s| TransactionKind::parse(s)) {
        rows.retain(|t| t.kind == kind);
    }
    if let Some(month) = sub.get_one::<String>("month") {
        let month = parse_month(month)?;
        rows.retain(|t| t.date.format("%Y-%m").to_string() == month);
    }
    if let Some(pat) = sub.get_one::<String>("search") {
        let re = parse_search(pat)?;
        rows.retain(|t| re.is_match(&t.description));
    }
    if let Some(limit) = sub.get_one::<usize>("limit") {
        rows.truncate(*limit);
    }
    Ok(rows.into_iter().cloned().collect())
}

fn list(store: &SharedStore, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(store, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.id.clone(),
                    t.date.to_string(),
                    t.kind.to_string(),
                    fmt_money(&t.amount, &cfg.currency),
                    t.category.clone(),
                    t.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Type", "Amount", "Category", "Description"],
                rows,
            )
        );
    }
    Ok(())
}
