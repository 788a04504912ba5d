//! Aggregators over a filtered transaction set
//!
//! Each aggregator is a pure function of `&[&Transaction]` (the output of
//! [`TransactionFilter::apply`](crate::filter::TransactionFilter::apply)).
//! Grouping is a single fold into ordered map accumulators followed by a
//! deterministic sort: amount descending, ties broken by name ascending.
//!
//! Money stays exact in [`Decimal`]; percentages and averages are rounded to
//! two places. Ratios that feed statistics (growth, volatility) are `f64` and
//! are always finite.

mod breakdown;
mod summary;
mod trends;

pub use breakdown::{
    account_breakdown, category_breakdown, merchant_breakdown, AccountTotal, CategoryTotal,
    MerchantAnalysis, MerchantTotal,
};
pub use summary::{savings_rate, SpendingAnalysis, SpendingSummary, TransactionList};
pub use trends::{bucket, Granularity, TrendAnalysis, TrendMetrics, TrendPoint};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::models::Transaction;

/// Round to cents
pub(crate) fn round2(value: Decimal) -> Decimal {
    value.round_dp(2)
}

/// `part / whole * 100`, rounded; 0 when `whole` is zero
pub(crate) fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    round2(part / whole * Decimal::ONE_HUNDRED)
}

/// `total / count`, rounded; 0 when `count` is zero
pub(crate) fn average(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    round2(total / Decimal::from(count))
}

/// Lossy conversion for statistics and chart values
pub(crate) fn to_f64(value: Decimal) -> f64 {
    value.to_f64().filter(|v| v.is_finite()).unwrap_or(0.0)
}

pub(crate) fn round_f64(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).round() / 100.0
}

/// Only expense rows feed the breakdowns and trends
pub(crate) fn expenses<'a, 'b>(
    transactions: &'b [&'a Transaction],
) -> impl Iterator<Item = &'a Transaction> + 'b {
    transactions.iter().copied().filter(|t| t.is_expense())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percentage_guards_zero() {
        assert_eq!(percentage(dec!(10), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(percentage(dec!(125.50), dec!(400)), dec!(31.38));
    }

    #[test]
    fn test_average_guards_zero() {
        assert_eq!(average(dec!(10), 0), Decimal::ZERO);
        assert_eq!(average(dec!(10), 3), dec!(3.33));
    }

    #[test]
    fn test_expenses_outlive_the_selection() {
        use crate::test_utils::{date, expense, income};

        let txs = vec![
            expense("1", date(2024, 1, 1), dec!(10), "Groceries"),
            income("2", date(2024, 1, 1), dec!(100), "Income"),
        ];
        let kept: Vec<&Transaction> = {
            let selected: Vec<&Transaction> = txs.iter().collect();
            expenses(&selected).collect()
        };
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "1");
    }

    #[test]
    fn test_round_f64_non_finite() {
        assert_eq!(round_f64(f64::NAN), 0.0);
        assert_eq!(round_f64(f64::INFINITY), 0.0);
        assert_eq!(round_f64(1.23456), 1.23);
    }
}
