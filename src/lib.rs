// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod api;
pub mod budget;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod education;
pub mod error;
pub mod finance;
pub mod models;
pub mod seed;
pub mod store;
pub mod utils;
pub mod views;

pub use error::{ApiError, StorageError};
pub use store::{KvStore, MemoryStore, SharedStore};
