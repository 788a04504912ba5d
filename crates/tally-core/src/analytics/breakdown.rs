//! Category, merchant and account breakdowns

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{average, expenses, percentage};
use crate::models::Transaction;

/// Expense total for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total_amount: Decimal,
    pub transaction_count: usize,
    /// Share of all expenses in the set
    pub percentage: Decimal,
}

/// Expense total for one merchant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantTotal {
    pub merchant: String,
    /// Category of the merchant's first transaction in ledger order
    pub category: String,
    pub total_spent: Decimal,
    pub transaction_count: usize,
    pub avg_amount: Decimal,
    pub first_transaction_date: NaiveDate,
    pub last_transaction_date: NaiveDate,
}

/// Expense total for one account type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountTotal {
    pub account_type: String,
    pub total_amount: Decimal,
    pub transaction_count: usize,
}

/// Merchant breakdown with totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantAnalysis {
    pub merchants: Vec<MerchantTotal>,
    pub total_merchants: usize,
    pub total_spent: Decimal,
}

impl MerchantAnalysis {
    pub fn from_transactions(transactions: &[&Transaction]) -> Self {
        let merchants = merchant_breakdown(transactions);
        let total_spent = merchants.iter().map(|m| m.total_spent).sum();
        Self {
            total_merchants: merchants.len(),
            merchants,
            total_spent,
        }
    }
}

/// Sum and count per key
#[derive(Default)]
struct Bucket {
    total: Decimal,
    count: usize,
}

fn sum_by<'a, F>(transactions: &[&'a Transaction], key: F) -> BTreeMap<&'a str, Bucket>
where
    F: Fn(&'a Transaction) -> Option<&'a str>,
{
    let mut buckets: BTreeMap<&str, Bucket> = BTreeMap::new();
    for tx in expenses(transactions) {
        if let Some(k) = key(tx) {
            let bucket = buckets.entry(k).or_default();
            bucket.total += tx.amount;
            bucket.count += 1;
        }
    }
    buckets
}

/// Expenses grouped by category, largest first
pub fn category_breakdown(transactions: &[&Transaction]) -> Vec<CategoryTotal> {
    let buckets = sum_by(transactions, |t| Some(t.category.as_str()));
    let total_expenses: Decimal = buckets.values().map(|b| b.total).sum();

    let mut rows: Vec<CategoryTotal> = buckets
        .into_iter()
        .map(|(category, b)| CategoryTotal {
            category: category.to_string(),
            total_amount: b.total,
            transaction_count: b.count,
            percentage: percentage(b.total, total_expenses),
        })
        .collect();

    rows.sort_by(|a, b| {
        b.total_amount
            .cmp(&a.total_amount)
            .then_with(|| a.category.cmp(&b.category))
    });
    rows
}

/// Expenses grouped by merchant, largest first; rows without a merchant are skipped
pub fn merchant_breakdown(transactions: &[&Transaction]) -> Vec<MerchantTotal> {
    let mut by_merchant: BTreeMap<&str, MerchantTotal> = BTreeMap::new();

    for tx in expenses(transactions) {
        let Some(merchant) = tx.merchant.as_deref() else {
            continue;
        };

        let row = by_merchant.entry(merchant).or_insert_with(|| MerchantTotal {
            merchant: merchant.to_string(),
            category: tx.category.clone(),
            total_spent: Decimal::ZERO,
            transaction_count: 0,
            avg_amount: Decimal::ZERO,
            first_transaction_date: tx.date,
            last_transaction_date: tx.date,
        });

        row.total_spent += tx.amount;
        row.transaction_count += 1;
        row.first_transaction_date = row.first_transaction_date.min(tx.date);
        row.last_transaction_date = row.last_transaction_date.max(tx.date);
    }

    let mut rows: Vec<MerchantTotal> = by_merchant
        .into_values()
        .map(|mut row| {
            row.avg_amount = average(row.total_spent, row.transaction_count);
            row
        })
        .collect();

    rows.sort_by(|a, b| {
        b.total_spent
            .cmp(&a.total_spent)
            .then_with(|| a.merchant.cmp(&b.merchant))
    });
    rows
}

/// Expenses grouped by account type, largest first; rows without one are skipped
pub fn account_breakdown(transactions: &[&Transaction]) -> Vec<AccountTotal> {
    let buckets = sum_by(transactions, |t| t.account_type.as_deref());

    let mut rows: Vec<AccountTotal> = buckets
        .into_iter()
        .map(|(account_type, b)| AccountTotal {
            account_type: account_type.to_string(),
            total_amount: b.total,
            transaction_count: b.count,
        })
        .collect();

    rows.sort_by(|a, b| {
        b.total_amount
            .cmp(&a.total_amount)
            .then_with(|| a.account_type.cmp(&b.account_type))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::TransactionFilter;
    use crate::test_utils::{date, expense, income, sample_ledger};
    use rust_decimal_macros::dec;

    #[test]
    fn test_category_breakdown_sample() {
        let ledger = sample_ledger();
        let all = TransactionFilter::new().apply(&ledger);
        let rows = category_breakdown(&all);

        let names: Vec<_> = rows.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Rent",
                "Groceries",
                "Shopping",
                "Entertainment",
                "Transportation",
                "Food & Dining"
            ]
        );

        let groceries = &rows[1];
        assert_eq!(groceries.total_amount, dec!(355.75));
        assert_eq!(groceries.transaction_count, 3);
        // Income never shows up as a category row
        assert!(rows.iter().all(|r| r.category != "Income"));
    }

    #[test]
    fn test_category_sum_equals_total_expenses() {
        let ledger = sample_ledger();
        let all = TransactionFilter::new().apply(&ledger);
        let rows = category_breakdown(&all);
        let sum: Decimal = rows.iter().map(|r| r.total_amount).sum();
        assert_eq!(sum, dec!(2010.75));
    }

    #[test]
    fn test_ties_break_by_name() {
        let txs = vec![
            expense("1", date(2024, 1, 1), dec!(10), "Zeta").with_merchant("Zed"),
            expense("2", date(2024, 1, 1), dec!(10), "Alpha").with_merchant("Acme"),
            expense("3", date(2024, 1, 1), dec!(10), "Mid").with_merchant("Mart"),
        ];
        let refs: Vec<&Transaction> = txs.iter().collect();

        let cats: Vec<_> = category_breakdown(&refs)
            .into_iter()
            .map(|r| r.category)
            .collect();
        assert_eq!(cats, vec!["Alpha", "Mid", "Zeta"]);

        let merchants: Vec<_> = merchant_breakdown(&refs)
            .into_iter()
            .map(|r| r.merchant)
            .collect();
        assert_eq!(merchants, vec!["Acme", "Mart", "Zed"]);
    }

    #[test]
    fn test_merchant_breakdown_details() {
        let ledger = sample_ledger();
        let all = TransactionFilter::new().apply(&ledger);
        let rows = merchant_breakdown(&all);

        // Employer Inc only has income; T11 has no merchant
        assert_eq!(rows.len(), 6);
        assert!(rows.iter().all(|r| r.merchant != "Employer Inc"));

        let whole_foods = rows
            .iter()
            .find(|r| r.merchant == "Whole Foods Market")
            .unwrap();
        assert_eq!(whole_foods.total_spent, dec!(355.75));
        assert_eq!(whole_foods.transaction_count, 3);
        assert_eq!(whole_foods.avg_amount, dec!(118.58));
        assert_eq!(whole_foods.category, "Groceries");
        assert_eq!(whole_foods.first_transaction_date, date(2024, 1, 1));
        assert_eq!(whole_foods.last_transaction_date, date(2024, 2, 2));
    }

    #[test]
    fn test_merchant_category_is_first_in_ledger_order() {
        let txs = vec![
            expense("1", date(2024, 1, 5), dec!(10), "Shopping").with_merchant("Target"),
            expense("2", date(2024, 1, 1), dec!(10), "Groceries").with_merchant("Target"),
        ];
        let refs: Vec<&Transaction> = txs.iter().collect();
        let rows = merchant_breakdown(&refs);
        assert_eq!(rows[0].category, "Shopping");
        assert_eq!(rows[0].first_transaction_date, date(2024, 1, 1));
    }

    #[test]
    fn test_account_breakdown() {
        let ledger = sample_ledger();
        let all = TransactionFilter::new().apply(&ledger);
        let rows = account_breakdown(&all);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].account_type, "checking");
        assert_eq!(rows[0].total_amount, dec!(1520.50));
        assert_eq!(rows[0].transaction_count, 4);
        assert_eq!(rows[1].account_type, "credit_card");
        assert_eq!(rows[1].total_amount, dec!(468.25));
    }

    #[test]
    fn test_income_only_yields_empty_breakdowns() {
        let txs = vec![income("1", date(2024, 1, 1), dec!(100), "Income").with_merchant("Boss")];
        let refs: Vec<&Transaction> = txs.iter().collect();
        assert!(category_breakdown(&refs).is_empty());
        assert!(merchant_breakdown(&refs).is_empty());
        assert!(account_breakdown(&refs).is_empty());

        let analysis = MerchantAnalysis::from_transactions(&refs);
        assert_eq!(analysis.total_merchants, 0);
        assert_eq!(analysis.total_spent, Decimal::ZERO);
    }

    #[test]
    fn test_category_percentages() {
        let txs = vec![
            expense("1", date(2024, 1, 1), dec!(75), "A"),
            expense("2", date(2024, 1, 1), dec!(25), "B"),
        ];
        let refs: Vec<&Transaction> = txs.iter().collect();
        let rows = category_breakdown(&refs);
        assert_eq!(rows[0].percentage, dec!(75));
        assert_eq!(rows[1].percentage, dec!(25));
    }
}
