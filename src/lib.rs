#![doc(test(attr(deny(warnings))))]

//! Fintrack Core owns a personal income/expense ledger and computes the
//! windowed summaries built on top of it: totals, balance, and category
//! breakdowns.

pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

pub use crate::core::{Clock, LedgerStore, Mutation, SystemClock};
pub use crate::errors::{LedgerError, PersistenceWarning, Result, ValidationError};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!(version = env!("CARGO_PKG_VERSION"), "fintrack core initialized");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
