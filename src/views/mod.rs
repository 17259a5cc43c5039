// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Per-screen state containers.
//!
//! A view loads what its screen needs on construction, keeps it in memory and
//! exposes derived getters. Mutations go through the services and then patch
//! the cached data in place instead of reloading the whole collection.
//! A failed read leaves the previous data in place and records a message in
//! `error`; a failed mutation records the message and returns the error.

pub mod education;
pub mod financial;

pub use education::{ContentView, EducationView, ProgressView};
pub use financial::{BudgetView, FinancialDataView, SummaryView, TransactionsView, Trend};

use std::fmt::Display;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T: Default> Default for ViewState<T> {
    fn default() -> Self {
        ViewState {
            data: T::default(),
            loading: true,
            error: None,
        }
    }
}

impl<T> ViewState<T> {
    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn finish<E: Display>(&mut self, result: Result<T, E>, what: &str) {
        match result {
            Ok(data) => self.data = data,
            Err(e) => {
                warn!("{}: {}", what, e);
                self.error = Some(format!("{}: {}", what, e));
            }
        }
        self.loading = false;
    }

    /// Records a failed mutation and hands the error back to the caller.
    fn fail<E: Display>(&mut self, what: &str, err: E) -> E {
        self.error = Some(format!("{}: {}", what, err));
        err
    }
}
