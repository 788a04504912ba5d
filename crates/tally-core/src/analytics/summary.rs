//! Spending summary, combined spending analysis and transaction listing

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{percentage, AccountTotal, CategoryTotal, MerchantTotal, TrendPoint};
use crate::filter::TransactionFilter;
use crate::models::Transaction;

/// Income vs expense totals over a transaction set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendingSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_income: Decimal,
    pub income_count: usize,
    pub expense_count: usize,
    pub transaction_count: usize,
    /// Percentage of income kept (0 when there is no income)
    pub savings_rate: Decimal,
}

impl SpendingSummary {
    pub fn from_transactions(transactions: &[&Transaction]) -> Self {
        let mut summary = Self::default();

        for tx in transactions {
            if tx.is_income() {
                summary.total_income += tx.amount;
                summary.income_count += 1;
            } else {
                summary.total_expenses += tx.amount;
                summary.expense_count += 1;
            }
        }

        summary.transaction_count = transactions.len();
        summary.net_income = summary.total_income - summary.total_expenses;
        summary.savings_rate = savings_rate(summary.total_income, summary.total_expenses);
        summary
    }
}

/// `(income - expenses) / income * 100`, rounded; 0 when income is zero
pub fn savings_rate(income: Decimal, expenses: Decimal) -> Decimal {
    percentage(income - expenses, income)
}

/// Combined view: summary, categories, monthly trend, top merchants, accounts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingAnalysis {
    pub summary: SpendingSummary,
    pub category_breakdown: Vec<CategoryTotal>,
    pub monthly_trend: Vec<TrendPoint>,
    pub top_merchants: Vec<MerchantTotal>,
    pub account_breakdown: Vec<AccountTotal>,
}

/// Filtered transactions with their count and total
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionList {
    pub transactions: Vec<Transaction>,
    pub total_count: usize,
    /// Sum of all listed amounts regardless of type
    pub total_amount: Decimal,
    pub filters_applied: TransactionFilter,
}

impl TransactionList {
    pub fn new(transactions: &[&Transaction], filter: &TransactionFilter) -> Self {
        let total_amount = transactions.iter().map(|t| t.amount).sum();
        Self {
            transactions: transactions.iter().map(|t| (*t).clone()).collect(),
            total_count: transactions.len(),
            total_amount,
            filters_applied: filter.clone(),
        }
    }
}
