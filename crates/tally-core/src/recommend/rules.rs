//! Built-in recommendation rules

use rust_decimal::Decimal;

use super::engine::{Rule, RuleContext};
use super::types::{Recommendation, RecommendationDetail, RecommendationKind, Severity};
use crate::analytics::{merchant_breakdown, round2};
use crate::budget::spent_by_category;

/// Budgeted categories whose spending exceeds the limit
pub struct OverspendingRule;

impl Rule for OverspendingRule {
    fn kind(&self) -> RecommendationKind {
        RecommendationKind::OverspendingAlert
    }

    fn name(&self) -> &'static str {
        "Overspending"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Recommendation> {
        let spent = spent_by_category(&ctx.transactions);

        ctx.budgets
            .entries()
            .iter()
            .filter_map(|entry| {
                let category_spent = spent.get(entry.category.as_str()).copied()?;
                if category_spent <= entry.monthly_limit {
                    return None;
                }

                let overage = category_spent - entry.monthly_limit;
                let daily_reduction = ctx.per_day(overage);

                Some(Recommendation::new(
                    RecommendationDetail::OverspendingAlert {
                        category: entry.category.clone(),
                        budget: entry.monthly_limit,
                        spent: category_spent,
                        overage,
                        daily_reduction,
                    },
                    Severity::High,
                    format!(
                        "You've spent ${:.2} on {}, which is ${:.2} over your ${:.2} budget.",
                        category_spent, entry.category, overage, entry.monthly_limit
                    ),
                    format!(
                        "Consider reducing {} spending by ${:.2} per day to stay on track.",
                        entry.category, daily_reduction
                    ),
                ))
            })
            .collect()
    }
}

/// Merchants visited more often than the configured count
pub struct FrequentPurchasesRule;

impl Rule for FrequentPurchasesRule {
    fn kind(&self) -> RecommendationKind {
        RecommendationKind::FrequentPurchases
    }

    fn name(&self) -> &'static str {
        "Frequent purchases"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Recommendation> {
        let min_count = ctx.config.frequent_merchant_min_count;

        merchant_breakdown(&ctx.transactions)
            .into_iter()
            .filter(|m| m.transaction_count > min_count)
            .map(|m| {
                Recommendation::new(
                    RecommendationDetail::FrequentPurchases {
                        merchant: m.merchant.clone(),
                        total_spent: m.total_spent,
                        count: m.transaction_count,
                    },
                    Severity::Medium,
                    format!(
                        "You've made {} purchases at {} totaling ${:.2}.",
                        m.transaction_count, m.merchant, m.total_spent
                    ),
                    "Consider bulk purchases or subscriptions to reduce frequent small transactions.",
                )
            })
            .collect()
    }
}

/// Average daily spending above the threshold
pub struct HighDailySpendingRule;

impl Rule for HighDailySpendingRule {
    fn kind(&self) -> RecommendationKind {
        RecommendationKind::HighDailySpending
    }

    fn name(&self) -> &'static str {
        "High daily spending"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Recommendation> {
        let avg = ctx.per_day(ctx.summary.total_expenses);
        let threshold = ctx.config.daily_spending_threshold;
        if avg <= threshold {
            return vec![];
        }

        vec![Recommendation::new(
            RecommendationDetail::HighDailySpending {
                avg_daily_spending: avg,
                threshold,
            },
            Severity::Medium,
            format!("Your average daily spending is ${:.2}.", avg),
            "Consider tracking your daily expenses more closely and setting daily spending limits.",
        )]
    }
}

/// Savings rate below the target fraction of income
pub struct LowSavingsRateRule;

impl Rule for LowSavingsRateRule {
    fn kind(&self) -> RecommendationKind {
        RecommendationKind::LowSavingsRate
    }

    fn name(&self) -> &'static str {
        "Low savings rate"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Vec<Recommendation> {
        if ctx.transactions.is_empty() {
            return vec![];
        }

        let income = ctx.summary.total_income;
        let expenses = ctx.summary.total_expenses;
        let rate = if income.is_zero() {
            Decimal::ZERO
        } else {
            ((income - expenses) / income).round_dp(4)
        };

        let target = ctx.config.min_savings_rate;
        if rate >= target {
            return vec![];
        }

        vec![Recommendation::new(
            RecommendationDetail::LowSavingsRate {
                savings_rate: rate,
                target_rate: target,
                total_income: income,
                total_expenses: expenses,
            },
            Severity::High,
            format!(
                "Your savings rate is {:.1}% of your income.",
                rate * Decimal::ONE_HUNDRED
            ),
            format!(
                "Aim to save at least {}% of your income. Consider setting up automatic transfers to savings.",
                round2(target * Decimal::ONE_HUNDRED).normalize()
            ),
        )]
    }
}
