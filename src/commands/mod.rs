// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod budgets;
pub mod exporter;
pub mod learn;
pub mod remote;
pub mod reports;
pub mod transactions;

use crate::views::ViewState;
use anyhow::{Result, anyhow};

/// Turns an error recorded by a view's load into a command failure.
pub(crate) fn ensure_loaded<T>(state: &ViewState<T>) -> Result<()> {
    match &state.error {
        Some(msg) => Err(anyhow!("{}", msg)),
        None => Ok(()),
    }
}
