pub mod summary_service;
pub mod transaction_service;

pub use summary_service::{SummaryService, DEFAULT_RECENT_LIMIT};
pub use transaction_service::{TransactionForm, TransactionService};

use crate::errors::{LedgerError, ValidationError};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("Invalid transaction: {0}")]
    Validation(#[from] ValidationError),
}
