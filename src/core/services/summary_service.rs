//! Windowed aggregation over a ledger snapshot.
//!
//! Every function here is pure: it takes an immutable slice of transactions
//! and returns freshly computed values. Nothing is cached, so results always
//! reflect the snapshot they were handed.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::domain::{
    category::CategoryRegistry,
    common::sum_amounts,
    summary::{CategoryTotal, DayGroup, MonthlyTotal, PeriodSummary},
    transaction::Transaction,
    window::DateRange,
};

/// Number of rows returned by [`SummaryService::recent_transactions`] when the
/// caller does not specify a limit.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

pub struct SummaryService;

impl SummaryService {
    /// Sum of income amounts dated inside `range` (inclusive).
    pub fn total_income(transactions: &[Transaction], range: &DateRange) -> f64 {
        sum_amounts(Self::incomes_in(transactions, range))
    }

    /// Sum of expense amounts dated inside `range` (inclusive).
    pub fn total_expense(transactions: &[Transaction], range: &DateRange) -> f64 {
        sum_amounts(Self::expenses_in(transactions, range))
    }

    pub fn balance(transactions: &[Transaction], range: &DateRange) -> f64 {
        Self::total_income(transactions, range) - Self::total_expense(transactions, range)
    }

    /// Expense totals per category, largest first; ties ordered by id.
    ///
    /// Unknown categories are folded into `other`. When the window holds no
    /// expense the result is empty.
    pub fn category_totals(
        transactions: &[Transaction],
        range: &DateRange,
        registry: &CategoryRegistry,
    ) -> Vec<CategoryTotal> {
        let total_expense = Self::total_expense(transactions, range);

        let mut grouped: BTreeMap<&str, f64> = BTreeMap::new();
        for txn in Self::expenses_in(transactions, range) {
            let key = registry.resolve_id(txn.category().map(String::as_str));
            *grouped.entry(key).or_insert(0.0) += txn.amount;
        }

        let mut totals: Vec<CategoryTotal> = grouped
            .into_iter()
            .map(|(category, amount)| CategoryTotal {
                category: category.to_string(),
                amount,
                percentage: percentage_of(amount, total_expense),
                color: registry.color_for(category).to_string(),
            })
            .collect();
        totals.sort_by(|a, b| {
            b.amount
                .total_cmp(&a.amount)
                .then_with(|| a.category.cmp(&b.category))
        });
        totals
    }

    /// Most recent transactions by economic date across the whole ledger.
    ///
    /// The selected window does not apply here.
    pub fn recent_transactions(transactions: &[Transaction], limit: usize) -> Vec<&Transaction> {
        let mut sorted = Self::by_date_desc(transactions.iter());
        sorted.truncate(limit);
        sorted
    }

    /// Transactions dated inside `range`, most recent first.
    pub fn transactions_in_range<'a>(
        transactions: &'a [Transaction],
        range: &DateRange,
    ) -> Vec<&'a Transaction> {
        Self::by_date_desc(transactions.iter().filter(|txn| range.contains(txn.date)))
    }

    /// Totals, balance, and category breakdown for `range` in one pass over the
    /// same snapshot.
    pub fn summarize(
        transactions: &[Transaction],
        range: &DateRange,
        registry: &CategoryRegistry,
    ) -> PeriodSummary {
        let total_income = Self::total_income(transactions, range);
        let total_expense = Self::total_expense(transactions, range);
        PeriodSummary {
            range: *range,
            total_income,
            total_expense,
            balance: total_income - total_expense,
            categories: Self::category_totals(transactions, range, registry),
        }
    }

    /// Income and expense per calendar month inside `range`, oldest first.
    pub fn monthly_totals(transactions: &[Transaction], range: &DateRange) -> Vec<MonthlyTotal> {
        let mut months: BTreeMap<NaiveDate, MonthlyTotal> = BTreeMap::new();
        for txn in transactions.iter().filter(|txn| range.contains(txn.date)) {
            let Some(month) = NaiveDate::from_ymd_opt(txn.date.year(), txn.date.month(), 1) else {
                continue;
            };
            let entry = months.entry(month).or_insert_with(|| MonthlyTotal {
                month,
                income: 0.0,
                expense: 0.0,
            });
            if txn.is_income() {
                entry.income += txn.amount;
            } else {
                entry.expense += txn.amount;
            }
        }
        months.into_values().collect()
    }

    /// Groups transactions by calendar day, most recent day first. Rows keep
    /// their relative input order within a day.
    pub fn group_by_day<'a, I>(transactions: I) -> Vec<DayGroup>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut days: BTreeMap<NaiveDate, Vec<Transaction>> = BTreeMap::new();
        for txn in transactions {
            days.entry(txn.date.date_naive())
                .or_default()
                .push(txn.clone());
        }
        days.into_iter()
            .rev()
            .map(|(date, transactions)| DayGroup { date, transactions })
            .collect()
    }

    fn incomes_in<'a>(
        transactions: &'a [Transaction],
        range: &'a DateRange,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        transactions
            .iter()
            .filter(move |txn| txn.is_income() && range.contains(txn.date))
    }

    fn expenses_in<'a>(
        transactions: &'a [Transaction],
        range: &'a DateRange,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        transactions
            .iter()
            .filter(move |txn| txn.is_expense() && range.contains(txn.date))
    }

    fn by_date_desc<'a, I>(transactions: I) -> Vec<&'a Transaction>
    where
        I: Iterator<Item = &'a Transaction>,
    {
        let mut sorted: Vec<&Transaction> = transactions.collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted
    }
}

/// `part / whole * 100`, defined as 0 when `whole` is not positive.
fn percentage_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        category::CategoryRegistry,
        transaction::NewTransaction,
        window::{resolve, TimeRange},
    };
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn day(m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, m, d, 0, 0, 0).unwrap()
    }

    fn record(data: NewTransaction) -> Transaction {
        Transaction::from_new(data, day(4, 25))
    }

    fn april_ledger() -> Vec<Transaction> {
        vec![
            record(NewTransaction::income(5000.0, "Salary", day(4, 15))),
            record(NewTransaction::expense(500.0, "Groceries", "food", day(4, 18))),
            record(NewTransaction::expense(1200.0, "Rent", "housing", day(4, 1))),
        ]
    }

    fn april() -> DateRange {
        resolve(TimeRange::Month, day(4, 22))
    }

    #[test]
    fn april_scenario_totals_and_breakdown() {
        let ledger = april_ledger();
        let registry = CategoryRegistry::builtin();
        let range = april();

        assert_eq!(SummaryService::total_income(&ledger, &range), 5000.0);
        assert_eq!(SummaryService::total_expense(&ledger, &range), 1700.0);
        assert_eq!(SummaryService::balance(&ledger, &range), 3300.0);

        let totals = SummaryService::category_totals(&ledger, &range, registry);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].category, "housing");
        assert_eq!(totals[0].amount, 1200.0);
        assert!((totals[0].percentage - 70.588).abs() < 0.01);
        assert_eq!(totals[0].color, "#0A84FF");
        assert_eq!(totals[1].category, "food");
        assert!((totals[1].percentage - 29.412).abs() < 0.01);
    }

    #[test]
    fn week_window_drops_old_rent() {
        let ledger = april_ledger();
        let range = resolve(TimeRange::Week, day(4, 22));
        let in_range = SummaryService::transactions_in_range(&ledger, &range);
        let descriptions: Vec<_> = in_range.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descriptions, vec!["Groceries", "Salary"]);
    }

    #[test]
    fn transaction_exactly_seven_days_old_is_in_week() {
        let now = day(4, 22);
        let ledger = vec![record(NewTransaction::expense(
            10.0,
            "Edge",
            "food",
            now - Duration::days(7),
        ))];
        let range = resolve(TimeRange::Week, now);
        assert_eq!(SummaryService::total_expense(&ledger, &range), 10.0);
    }

    #[test]
    fn unknown_category_groups_under_other() {
        let ledger = vec![
            record(NewTransaction::expense(40.0, "Mystery", "xyz", day(4, 3))),
            record(NewTransaction::expense(60.0, "Misc", "other", day(4, 4))),
        ];
        let totals =
            SummaryService::category_totals(&ledger, &april(), CategoryRegistry::builtin());
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].category, "other");
        assert_eq!(totals[0].amount, 100.0);
        assert_eq!(totals[0].percentage, 100.0);
    }

    #[test]
    fn ties_are_ordered_by_category_id() {
        let ledger = vec![
            record(NewTransaction::expense(50.0, "Bus", "transportation", day(4, 3))),
            record(NewTransaction::expense(50.0, "Book", "education", day(4, 4))),
            record(NewTransaction::expense(50.0, "Lunch", "food", day(4, 5))),
        ];
        let totals =
            SummaryService::category_totals(&ledger, &april(), CategoryRegistry::builtin());
        let ids: Vec<_> = totals.iter().map(|t| t.category.as_str()).collect();
        assert_eq!(ids, vec!["education", "food", "transportation"]);
    }

    #[test]
    fn no_expense_yields_empty_breakdown() {
        let ledger = vec![record(NewTransaction::income(100.0, "Gift", day(4, 2)))];
        let totals =
            SummaryService::category_totals(&ledger, &april(), CategoryRegistry::builtin());
        assert!(totals.is_empty());
        assert_eq!(percentage_of(10.0, 0.0), 0.0);
    }

    #[test]
    fn recent_ignores_window_and_respects_limit() {
        let mut ledger = april_ledger();
        ledger.push(record(NewTransaction::income(1.0, "Old", day(1, 1))));
        let recent = SummaryService::recent_transactions(&ledger, 2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].description, "Groceries");
        assert_eq!(recent[1].description, "Salary");

        let everything = SummaryService::recent_transactions(&ledger, DEFAULT_RECENT_LIMIT);
        assert_eq!(everything.last().map(|t| t.description.as_str()), Some("Old"));
    }

    #[test]
    fn monthly_totals_split_by_calendar_month() {
        let mut ledger = april_ledger();
        ledger.push(record(NewTransaction::expense(30.0, "Taxi", "transportation", day(3, 30))));
        let range = resolve(TimeRange::Year, day(4, 22));
        let months = SummaryService::monthly_totals(&ledger, &range);
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].label(), "Mar 2025");
        assert_eq!(months[0].expense, 30.0);
        assert_eq!(months[1].income, 5000.0);
        assert_eq!(months[1].net(), 3300.0);
    }

    #[test]
    fn day_groups_are_most_recent_first() {
        let mut ledger = april_ledger();
        ledger.push(record(NewTransaction::expense(9.0, "Coffee", "food", day(4, 18))));
        let groups = SummaryService::group_by_day(&ledger);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].transactions.len(), 2);
        assert_eq!(groups[0].title(), "Friday, April 18");
        assert_eq!(groups[2].date, day(4, 1).date_naive());
    }

    #[test]
    fn summarize_matches_individual_queries() {
        let ledger = april_ledger();
        let registry = CategoryRegistry::builtin();
        let summary = SummaryService::summarize(&ledger, &april(), registry);
        assert_eq!(summary.balance, SummaryService::balance(&ledger, &april()));
        assert_eq!(
            summary.categories,
            SummaryService::category_totals(&ledger, &april(), registry)
        );
    }
}
