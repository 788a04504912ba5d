//! Chart data builder
//!
//! Reduces aggregator output to ordered `(labels, values)` series for an
//! external renderer. Nothing is drawn here; `output_path` only names the
//! file the renderer is expected to write (`<output_dir>/<chart_type>.png`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analytics::{to_f64, CategoryTotal, MerchantTotal, TrendPoint};
use crate::budget::BudgetAnalysis;
use crate::config::ChartConfig;

/// Supported chart kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    CategoryBreakdown,
    SpendingTrend,
    BudgetVsActual,
    MerchantAnalysis,
}

impl ChartType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::CategoryBreakdown => "category_breakdown",
            ChartType::SpendingTrend => "spending_trend",
            ChartType::BudgetVsActual => "budget_vs_actual",
            ChartType::MerchantAnalysis => "merchant_analysis",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartType::CategoryBreakdown => "Spending by Category",
            ChartType::SpendingTrend => "Daily Spending Trend",
            ChartType::BudgetVsActual => "Budget vs Actual Spending",
            ChartType::MerchantAnalysis => "Top Merchants by Spending",
        }
    }

    pub fn all() -> &'static [ChartType] {
        &[
            ChartType::CategoryBreakdown,
            ChartType::SpendingTrend,
            ChartType::BudgetVsActual,
            ChartType::MerchantAnalysis,
        ]
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "category_breakdown" => Ok(ChartType::CategoryBreakdown),
            "spending_trend" => Ok(ChartType::SpendingTrend),
            "budget_vs_actual" => Ok(ChartType::BudgetVsActual),
            "merchant_analysis" => Ok(ChartType::MerchantAnalysis),
            _ => Err(format!(
                "{} (valid: category_breakdown, spending_trend, budget_vs_actual, merchant_analysis)",
                s
            )),
        }
    }
}

/// One named series of values, aligned with the chart labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// Chart-ready data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub chart_type: ChartType,
    pub title: String,
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
    pub output_path: String,
}

/// Builds [`ChartData`] from aggregator output
#[derive(Debug, Clone, Default)]
pub struct ChartBuilder {
    config: ChartConfig,
}

impl ChartBuilder {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    /// Where the renderer should write the image for `chart_type`
    pub fn output_path(&self, chart_type: ChartType) -> String {
        let dir = self.config.output_dir.trim_end_matches('/');
        if dir.is_empty() {
            format!("{}.png", chart_type.as_str())
        } else {
            format!("{}/{}.png", dir, chart_type.as_str())
        }
    }

    fn chart(&self, chart_type: ChartType, labels: Vec<String>, series: Vec<ChartSeries>) -> ChartData {
        ChartData {
            chart_type,
            title: chart_type.title().to_string(),
            labels,
            series,
            output_path: self.output_path(chart_type),
        }
    }

    /// Category totals in breakdown order
    pub fn category_breakdown(&self, categories: &[CategoryTotal]) -> ChartData {
        let labels = categories.iter().map(|c| c.category.clone()).collect();
        let values = categories.iter().map(|c| to_f64(c.total_amount)).collect();
        self.chart(
            ChartType::CategoryBreakdown,
            labels,
            vec![ChartSeries {
                name: "Spending".into(),
                values,
            }],
        )
    }

    /// Daily totals in chronological order
    pub fn spending_trend(&self, daily: &[TrendPoint]) -> ChartData {
        let labels = daily.iter().map(|p| p.period.clone()).collect();
        let values = daily.iter().map(|p| to_f64(p.amount)).collect();
        self.chart(
            ChartType::SpendingTrend,
            labels,
            vec![ChartSeries {
                name: "Spending".into(),
                values,
            }],
        )
    }

    /// Budgeted categories with spending, in budget table order
    pub fn budget_vs_actual(&self, analysis: &BudgetAnalysis) -> ChartData {
        let with_spending: Vec<_> = analysis
            .categories
            .iter()
            .filter(|s| !s.spent.is_zero())
            .collect();

        let labels = with_spending.iter().map(|s| s.category.clone()).collect();
        let budget = with_spending.iter().map(|s| to_f64(s.budget)).collect();
        let actual = with_spending.iter().map(|s| to_f64(s.spent)).collect();

        self.chart(
            ChartType::BudgetVsActual,
            labels,
            vec![
                ChartSeries {
                    name: "Budget".into(),
                    values: budget,
                },
                ChartSeries {
                    name: "Actual".into(),
                    values: actual,
                },
            ],
        )
    }

    /// Top merchants in breakdown order
    pub fn merchant_analysis(&self, merchants: &[MerchantTotal]) -> ChartData {
        let top = &merchants[..merchants.len().min(self.config.top_merchants)];
        let labels = top.iter().map(|m| m.merchant.clone()).collect();
        let values = top.iter().map(|m| to_f64(m.total_spent)).collect();
        self.chart(
            ChartType::MerchantAnalysis,
            labels,
            vec![ChartSeries {
                name: "Spending".into(),
                values,
            }],
        )
    }
}
