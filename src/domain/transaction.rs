//! Domain models for ledger transactions and their partial updates.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::category::{CategoryId, FALLBACK_CATEGORY_ID};
use crate::domain::common::Amounted;

/// Distinguishes income from expense. Expenses always carry a category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense {
        /// Records saved without a category load as the fallback.
        #[serde(default = "fallback_category")]
        category: CategoryId,
    },
}

fn fallback_category() -> CategoryId {
    FALLBACK_CATEGORY_ID.to_string()
}

impl TransactionKind {
    pub fn expense(category: impl Into<CategoryId>) -> Self {
        TransactionKind::Expense {
            category: category.into(),
        }
    }

    pub fn is_income(&self) -> bool {
        matches!(self, TransactionKind::Income)
    }

    pub fn is_expense(&self) -> bool {
        matches!(self, TransactionKind::Expense { .. })
    }

    /// Category attached to an expense; incomes have none.
    pub fn category(&self) -> Option<&CategoryId> {
        match self {
            TransactionKind::Income => None,
            TransactionKind::Expense { category } => Some(category),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense { .. } => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single ledger record.
///
/// `date` is the economic event date chosen by the user; `created_at` and
/// `updated_at` are record timestamps maintained by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    #[serde(flatten)]
    pub kind: TransactionKind,
    pub amount: f64,
    pub description: String,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Materializes a payload into a record stamped at `now`.
    pub fn from_new(data: NewTransaction, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: data.kind,
            amount: data.amount,
            description: data.description,
            date: data.date,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind.is_income()
    }

    pub fn is_expense(&self) -> bool {
        self.kind.is_expense()
    }

    pub fn category(&self) -> Option<&CategoryId> {
        self.kind.category()
    }

    /// Merges the populated fields of `patch` into this record.
    ///
    /// Record timestamps are left untouched; the store refreshes them.
    pub fn apply(&mut self, patch: TransactionPatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(category) = patch.category {
            if let TransactionKind::Expense { category: current } = &mut self.kind {
                *current = category;
            }
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
    }
}

impl Amounted for Transaction {
    fn amount(&self) -> f64 {
        self.amount
    }
}

/// Payload accepted by the store's add operation: everything but identity and
/// record timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewTransaction {
    #[serde(flatten)]
    pub kind: TransactionKind,
    pub amount: f64,
    pub description: String,
    pub date: DateTime<Utc>,
}

impl NewTransaction {
    pub fn income(amount: f64, description: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            kind: TransactionKind::Income,
            amount,
            description: description.into(),
            date,
        }
    }

    pub fn expense(
        amount: f64,
        description: impl Into<String>,
        category: impl Into<CategoryId>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            kind: TransactionKind::expense(category),
            amount,
            description: description.into(),
            date,
        }
    }
}

/// Partial-field update. Unset fields keep their current value.
///
/// `category` only applies to expenses; it is ignored for incomes. To turn an
/// income into an expense set `kind` instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub kind: Option<TransactionKind>,
    pub category: Option<CategoryId>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

impl TransactionPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, category: impl Into<CategoryId>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
