//! Time-bucketed spending trends

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{average, expenses, round_f64, to_f64};
use crate::models::Transaction;

/// Bucket size for a trend series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Daily => "daily",
            Granularity::Weekly => "weekly",
            Granularity::Monthly => "monthly",
        }
    }

    /// First day of the bucket containing `date` (weeks start on Monday)
    pub fn bucket_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Daily => date,
            Granularity::Weekly => {
                date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
            }
            Granularity::Monthly => date.with_day(1).unwrap_or(date),
        }
    }

    /// Display label for the bucket starting at `start`
    pub fn label(&self, start: NaiveDate) -> String {
        match self {
            Granularity::Daily => start.format("%Y-%m-%d").to_string(),
            Granularity::Weekly => format!(
                "{}/{}",
                start.format("%Y-%m-%d"),
                (start + Duration::days(6)).format("%Y-%m-%d")
            ),
            Granularity::Monthly => start.format("%Y-%m").to_string(),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" | "day" => Ok(Granularity::Daily),
            "weekly" | "week" => Ok(Granularity::Weekly),
            "monthly" | "month" => Ok(Granularity::Monthly),
            _ => Err(format!("Unknown granularity: {}", s)),
        }
    }
}

/// One non-empty bucket of a trend series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub period: String,
    pub start: NaiveDate,
    pub amount: Decimal,
    pub transaction_count: usize,
}

/// Summary statistics over the trend series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendMetrics {
    pub avg_daily_spending: Decimal,
    pub avg_weekly_spending: Decimal,
    pub avg_monthly_spending: Decimal,
    /// Mean month-over-month change between consecutive calendar months, in percent
    pub avg_monthly_growth_pct: f64,
    /// Population standard deviation of daily totals
    pub spending_volatility: f64,
}

/// Daily, weekly and monthly series plus per-month category totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub daily_trend: Vec<TrendPoint>,
    pub weekly_trend: Vec<TrendPoint>,
    pub monthly_trend: Vec<TrendPoint>,
    /// Month label -> category -> expense total
    pub category_trends: BTreeMap<String, BTreeMap<String, Decimal>>,
    pub trend_metrics: TrendMetrics,
}

impl TrendAnalysis {
    pub fn from_transactions(transactions: &[&Transaction]) -> Self {
        let daily_trend = bucket(transactions, Granularity::Daily);
        let weekly_trend = bucket(transactions, Granularity::Weekly);
        let monthly_trend = bucket(transactions, Granularity::Monthly);

        let mut category_trends: BTreeMap<String, BTreeMap<String, Decimal>> = BTreeMap::new();
        for tx in expenses(transactions) {
            let month = Granularity::Monthly.label(Granularity::Monthly.bucket_start(tx.date));
            *category_trends
                .entry(month)
                .or_default()
                .entry(tx.category.clone())
                .or_default() += tx.amount;
        }

        let trend_metrics = TrendMetrics {
            avg_daily_spending: series_average(&daily_trend),
            avg_weekly_spending: series_average(&weekly_trend),
            avg_monthly_spending: series_average(&monthly_trend),
            avg_monthly_growth_pct: monthly_growth(&monthly_trend),
            spending_volatility: volatility(&daily_trend),
        };

        Self {
            daily_trend,
            weekly_trend,
            monthly_trend,
            category_trends,
            trend_metrics,
        }
    }

    pub fn series(&self, granularity: Granularity) -> &[TrendPoint] {
        match granularity {
            Granularity::Daily => &self.daily_trend,
            Granularity::Weekly => &self.weekly_trend,
            Granularity::Monthly => &self.monthly_trend,
        }
    }
}

/// Bucket expense amounts; only non-empty buckets, chronological
pub fn bucket(transactions: &[&Transaction], granularity: Granularity) -> Vec<TrendPoint> {
    let mut buckets: BTreeMap<NaiveDate, (Decimal, usize)> = BTreeMap::new();
    for tx in expenses(transactions) {
        let entry = buckets
            .entry(granularity.bucket_start(tx.date))
            .or_insert((Decimal::ZERO, 0));
        entry.0 += tx.amount;
        entry.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(start, (amount, transaction_count))| TrendPoint {
            period: granularity.label(start),
            start,
            amount,
            transaction_count,
        })
        .collect()
}

fn series_average(points: &[TrendPoint]) -> Decimal {
    let total: Decimal = points.iter().map(|p| p.amount).sum();
    average(total, points.len())
}

fn is_next_month(prev: NaiveDate, next: NaiveDate) -> bool {
    let (y, m) = if prev.month() == 12 {
        (prev.year() + 1, 1)
    } else {
        (prev.year(), prev.month() + 1)
    };
    next.year() == y && next.month() == m
}

/// Mean of month-over-month changes for calendar-consecutive months
///
/// Pairs separated by a gap, or whose earlier month is zero, are skipped.
fn monthly_growth(monthly: &[TrendPoint]) -> f64 {
    let changes: Vec<f64> = monthly
        .windows(2)
        .filter(|w| is_next_month(w[0].start, w[1].start) && !w[0].amount.is_zero())
        .map(|w| to_f64((w[1].amount - w[0].amount) / w[0].amount) * 100.0)
        .collect();

    if changes.is_empty() {
        return 0.0;
    }
    round_f64(changes.iter().sum::<f64>() / changes.len() as f64)
}

fn volatility(daily: &[TrendPoint]) -> f64 {
    if daily.len() < 2 {
        return 0.0;
    }
    let values: Vec<f64> = daily.iter().map(|p| to_f64(p.amount)).collect();
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    round_f64(variance.sqrt())
}
