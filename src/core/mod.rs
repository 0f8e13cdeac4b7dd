//! Ledger ownership, aggregation services, and the clock abstraction.

pub mod ledger_store;
pub mod services;
pub mod time;
pub mod utils;

pub use ledger_store::{LedgerStore, Mutation, CURRENT_SCHEMA_VERSION, STORAGE_KEY};
pub use time::{Clock, FixedClock, SystemClock};
