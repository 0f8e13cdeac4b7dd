//! Input-boundary helpers for transactions.
//!
//! The store trusts its payloads; this service is where raw user input is
//! parsed and rejected before it gets there.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::ledger_store::{LedgerStore, Mutation};
use crate::domain::transaction::{NewTransaction, Transaction, TransactionKind, TransactionPatch};
use crate::errors::ValidationError;

use super::ServiceResult;

/// Raw values as typed into an entry form.
#[derive(Debug, Clone, Default)]
pub struct TransactionForm {
    /// `income` or `expense`.
    pub kind: String,
    pub amount: String,
    pub description: String,
    pub category: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

/// Provides validated entry points over the ledger store.
pub struct TransactionService;

impl TransactionService {
    /// Checks the invariants the store relies on.
    pub fn validate(data: &NewTransaction) -> Result<(), ValidationError> {
        validate_description(&data.description)?;
        validate_amount(data.amount)?;
        validate_kind(&data.kind)
    }

    /// Checks only the fields a patch actually sets.
    pub fn validate_patch(patch: &TransactionPatch) -> Result<(), ValidationError> {
        if let Some(description) = patch.description.as_deref() {
            validate_description(description)?;
        }
        if let Some(amount) = patch.amount {
            validate_amount(amount)?;
        }
        if let Some(kind) = patch.kind.as_ref() {
            validate_kind(kind)?;
        }
        if let Some(category) = patch.category.as_deref() {
            if category.trim().is_empty() {
                return Err(ValidationError::MissingCategory);
            }
        }
        Ok(())
    }

    /// Parses a form into a payload. A missing date defaults to `today`.
    pub fn parse_form(
        form: &TransactionForm,
        today: DateTime<Utc>,
    ) -> Result<NewTransaction, ValidationError> {
        let raw_amount = form.amount.trim();
        if raw_amount.is_empty() {
            return Err(ValidationError::MissingAmount);
        }
        let amount: f64 = raw_amount
            .parse()
            .map_err(|_| ValidationError::InvalidAmount(raw_amount.to_string()))?;

        let kind = match form.kind.trim().to_ascii_lowercase().as_str() {
            "income" => TransactionKind::Income,
            "expense" => {
                let category = form
                    .category
                    .as_deref()
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
                    .ok_or(ValidationError::MissingCategory)?;
                TransactionKind::expense(category)
            }
            other => return Err(ValidationError::UnknownKind(other.to_string())),
        };

        let data = NewTransaction {
            kind,
            amount,
            description: form.description.trim().to_string(),
            date: form.date.unwrap_or(today),
        };
        Self::validate(&data)?;
        Ok(data)
    }

    /// Validates and records a transaction.
    pub fn record(
        store: &mut LedgerStore,
        data: NewTransaction,
    ) -> ServiceResult<Mutation<Transaction>> {
        Self::validate(&data)?;
        Ok(store.add(data))
    }

    /// Parses a form and records the result.
    pub fn record_form(
        store: &mut LedgerStore,
        form: &TransactionForm,
    ) -> ServiceResult<Mutation<Transaction>> {
        let data = Self::parse_form(form, store.now())?;
        Ok(store.add(data))
    }

    /// Validates and applies a partial update. Unknown ids stay a no-op.
    pub fn edit(
        store: &mut LedgerStore,
        id: Uuid,
        patch: TransactionPatch,
    ) -> ServiceResult<Mutation<Option<Transaction>>> {
        Self::validate_patch(&patch)?;
        Ok(store.update(id, patch))
    }
}

fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.trim().is_empty() {
        Err(ValidationError::MissingDescription)
    } else {
        Ok(())
    }
}

fn validate_amount(amount: f64) -> Result<(), ValidationError> {
    if !amount.is_finite() {
        Err(ValidationError::NonFiniteAmount)
    } else if amount <= 0.0 {
        Err(ValidationError::NonPositiveAmount)
    } else {
        Ok(())
    }
}

fn validate_kind(kind: &TransactionKind) -> Result<(), ValidationError> {
    match kind {
        TransactionKind::Expense { category } if category.trim().is_empty() => {
            Err(ValidationError::MissingCategory)
        }
        _ => Ok(()),
    }
}
