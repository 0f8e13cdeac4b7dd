//! Derived, ephemeral reporting structures. Recomputed on every query and
//! never persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{category::CategoryId, transaction::Transaction, window::DateRange};

/// Expense share of one category within a window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTotal {
    pub category: CategoryId,
    pub amount: f64,
    /// Share of total expense in the window, `0..=100`.
    pub percentage: f64,
    pub color: String,
}

/// Income and expense booked in one calendar month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyTotal {
    /// First day of the month.
    pub month: NaiveDate,
    pub income: f64,
    pub expense: f64,
}

impl MonthlyTotal {
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }

    /// Short label such as `Apr 2025`.
    pub fn label(&self) -> String {
        self.month.format("%b %Y").to_string()
    }
}

/// Transactions sharing the same calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup {
    pub date: NaiveDate,
    pub transactions: Vec<Transaction>,
}

impl DayGroup {
    /// Heading such as `Tuesday, April 22`.
    pub fn title(&self) -> String {
        self.date.format("%A, %B %-d").to_string()
    }
}

/// Everything a dashboard needs for one window, computed over one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSummary {
    pub range: DateRange,
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    pub categories: Vec<CategoryTotal>,
}
