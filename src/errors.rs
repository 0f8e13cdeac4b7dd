use std::result::Result as StdResult;

use thiserror::Error;

use crate::domain::DateRangeError;

/// Unified error type for the domain, storage, and configuration layers.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Unsupported ledger schema version {found} (supported up to {supported})")]
    UnsupportedSchema { found: u8, supported: u8 },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = StdResult<T, LedgerError>;

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}

impl From<DateRangeError> for LedgerError {
    fn from(err: DateRangeError) -> Self {
        LedgerError::InvalidInput(err.to_string())
    }
}

/// Rejections raised at the input boundary before a payload reaches the store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("description is required")]
    MissingDescription,
    #[error("amount is required")]
    MissingAmount,
    #[error("amount `{0}` is not a number")]
    InvalidAmount(String),
    #[error("amount must be a finite number")]
    NonFiniteAmount,
    #[error("amount must be greater than zero")]
    NonPositiveAmount,
    #[error("expenses require a category")]
    MissingCategory,
    #[error("unknown transaction type `{0}`")]
    UnknownKind(String),
}

impl From<ValidationError> for LedgerError {
    fn from(err: ValidationError) -> Self {
        LedgerError::InvalidInput(err.to_string())
    }
}

/// Non-fatal report that a write-through did not reach storage.
///
/// The in-memory mutation that triggered the write has already been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceWarning {
    pub key: String,
    pub message: String,
}

impl std::fmt::Display for PersistenceWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to persist `{}`: {}", self.key, self.message)
    }
}
