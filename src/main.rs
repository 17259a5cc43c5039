// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::{Local, Utc};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pocketledger::config::Config;
use pocketledger::store::SharedStore;
use pocketledger::{cli, commands, db, seed};

fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    let level = matches
        .get_one::<String>("log-level")
        .map(String::as_str)
        .unwrap_or("warn");
    init_logger(level);

    let cfg = Config::load(&matches)?;
    let store: SharedStore = Arc::new(db::open_or_init(&cfg.db_path)?);
    let report = seed::initialize(store.as_ref(), Local::now().date_naive(), Utc::now())?;
    if !report.seeded.is_empty() {
        info!("seeded {}", report.seeded.join(", "));
    }

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", cfg.db_path.display());
            if !report.seeded.is_empty() {
                println!("Seeded default data: {}", report.seeded.join(", "));
            }
        }
        Some(("tx", sub)) => commands::transactions::handle(&store, &cfg, sub)?,
        Some(("summary", sub)) => commands::reports::summary(&store, &cfg, sub)?,
        Some(("stats", sub)) => commands::reports::handle_stats(&store, &cfg, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&store, &cfg, sub)?,
        Some(("learn", sub)) => commands::learn::handle(&store, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&store, sub)?,
        Some(("api", sub)) => commands::remote::handle(&store, &cfg, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}

fn init_logger(level: &str) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
