// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::{ApiClient, set_auth_token};
use crate::config::Config;
use crate::store::SharedStore;
use anyhow::{Context, Result};

pub fn handle(store: &SharedStore, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", sub)) => {
            let endpoint = sub.get_one::<String>("endpoint").context("missing endpoint")?;
            let client = ApiClient::new(cfg, store.clone())?;
            let body: serde_json::Value = client
                .get(endpoint)
                .with_context(|| format!("GET {}", client.url(endpoint)))?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Some(("token", sub)) => {
            let token = sub.get_one::<String>("token").context("missing token")?.trim();
            set_auth_token(store, token)?;
            if token.is_empty() {
                println!("Cleared API token");
            } else {
                println!("Stored API token");
            }
        }
        _ => {}
    }
    Ok(())
}
