//! Pure domain models (transactions, categories, reporting windows).
//! No I/O and no persistence; only data types and their invariants.

pub mod category;
pub mod common;
pub mod summary;
pub mod transaction;
pub mod window;

pub use category::{Category, CategoryId, CategoryRegistry, FALLBACK_CATEGORY_ID, NEUTRAL_COLOR};
pub use common::Amounted;
pub use summary::{CategoryTotal, DayGroup, MonthlyTotal, PeriodSummary};
pub use transaction::{NewTransaction, Transaction, TransactionKind, TransactionPatch};
pub use window::{resolve, DateRange, DateRangeError, TimeRange};
