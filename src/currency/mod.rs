//! Display-only currency catalog and amount formatting.
//!
//! Amounts are never converted; the currency only decides the symbol shown
//! next to a number.

use serde::Serialize;

use crate::domain::TransactionKind;

/// ISO 4217 currency with its display symbol.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Currency {
    pub code: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
}

const CURRENCIES: &[Currency] = &[
    Currency { code: "USD", symbol: "$", name: "US Dollar" },
    Currency { code: "EUR", symbol: "€", name: "Euro" },
    Currency { code: "GBP", symbol: "£", name: "British Pound" },
    Currency { code: "JPY", symbol: "¥", name: "Japanese Yen" },
    Currency { code: "CAD", symbol: "C$", name: "Canadian Dollar" },
    Currency { code: "AUD", symbol: "A$", name: "Australian Dollar" },
    Currency { code: "INR", symbol: "₹", name: "Indian Rupee" },
    Currency { code: "CNY", symbol: "¥", name: "Chinese Yuan" },
    Currency { code: "CHF", symbol: "CHF", name: "Swiss Franc" },
    Currency { code: "BRL", symbol: "R$", name: "Brazilian Real" },
];

impl Currency {
    pub fn all() -> &'static [Currency] {
        CURRENCIES
    }

    /// Case-insensitive lookup by ISO code.
    pub fn find(code: &str) -> Option<&'static Currency> {
        let code = code.trim();
        CURRENCIES
            .iter()
            .find(|currency| currency.code.eq_ignore_ascii_case(code))
    }

    pub fn default_currency() -> &'static Currency {
        &CURRENCIES[0]
    }

    /// `$1,234.50`; negative values get a leading minus.
    pub fn format(&self, amount: f64) -> String {
        let sign = if amount < 0.0 { "-" } else { "" };
        format!("{}{}{}", sign, self.symbol, group_thousands(amount.abs()))
    }

    /// Signed rendering used for ledger rows: `+$5.00` for income,
    /// `-$5.00` for expenses.
    pub fn format_signed(&self, amount: f64, kind: &TransactionKind) -> String {
        let sign = if kind.is_income() { '+' } else { '-' };
        format!("{}{}{}", sign, self.symbol, group_thousands(amount.abs()))
    }
}

/// Formats a percentage with two decimals, e.g. `70.59%`.
pub fn format_percentage(value: f64) -> String {
    format!("{:.2}%", value)
}

fn group_thousands(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{}.{}", grouped, fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(Currency::find("eur").map(|c| c.symbol), Some("€"));
        assert!(Currency::find("XYZ").is_none());
        assert_eq!(Currency::default_currency().code, "USD");
    }

    #[test]
    fn formats_with_grouping_and_two_decimals() {
        let usd = Currency::default_currency();
        assert_eq!(usd.format(0.0), "$0.00");
        assert_eq!(usd.format(999.5), "$999.50");
        assert_eq!(usd.format(1234567.891), "$1,234,567.89");
        assert_eq!(usd.format(-3300.0), "-$3,300.00");
    }

    #[test]
    fn signed_format_follows_kind() {
        let usd = Currency::default_currency();
        assert_eq!(usd.format_signed(5000.0, &TransactionKind::Income), "+$5,000.00");
        assert_eq!(
            usd.format_signed(500.0, &TransactionKind::expense("food")),
            "-$500.00"
        );
        assert_eq!(format_percentage(70.588_235), "70.59%");
    }
}
