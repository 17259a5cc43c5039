// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Runtime settings: defaults, then environment variables, then CLI flags.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB: &str = "POCKETLEDGER_DB";
pub const ENV_API_URL: &str = "POCKETLEDGER_API_URL";
pub const ENV_API_LATENCY_MS: &str = "POCKETLEDGER_API_LATENCY_MS";
pub const ENV_CURRENCY: &str = "POCKETLEDGER_CURRENCY";

pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_API_LATENCY_MS: u64 = 500;
pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub api_base_url: String,
    pub api_latency: Duration,
    pub currency: String,
}

impl Config {
    pub fn load(matches: &clap::ArgMatches) -> Result<Self> {
        Self::resolve(matches, |k| std::env::var(k).ok())
    }

    /// Same as [`Config::load`] with an explicit environment lookup.
    pub fn resolve(
        matches: &clap::ArgMatches,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let db_path = match matches.get_one::<String>("db").cloned().or_else(|| env(ENV_DB)) {
            Some(p) => PathBuf::from(p),
            None => crate::db::default_db_path()?,
        };
        let api_base_url = env(ENV_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let latency_ms = match env(ENV_API_LATENCY_MS) {
            Some(s) => s
                .trim()
                .parse::<u64>()
                .with_context(|| format!("Invalid {} '{}'", ENV_API_LATENCY_MS, s))?,
            None => DEFAULT_API_LATENCY_MS,
        };
        let currency = matches
            .get_one::<String>("currency")
            .cloned()
            .or_else(|| env(ENV_CURRENCY))
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())
            .trim()
            .to_uppercase();
        Ok(Config {
            db_path,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            api_latency: Duration::from_millis(latency_ms),
            currency,
        })
    }
}
