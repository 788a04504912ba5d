//! Tally configuration
//!
//! Holds the budget table and the thresholds used by the budget evaluator,
//! the recommendation engine and the chart data builder.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path (`--config`), else an override in the data dir
//!    (~/.local/share/tally/config/tally.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Every key is optional; missing keys keep their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::budget::{BudgetEntry, BudgetTable};
use crate::error::{Error, Result};
use crate::models::check_amount;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/tally.toml");

/// Budget status rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetRules {
    /// Spending below `budget * on_track_ratio` is under budget
    pub on_track_ratio: Decimal,
}

impl Default for BudgetRules {
    fn default() -> Self {
        Self {
            on_track_ratio: Decimal::new(8, 1),
        }
    }
}

/// Recommendation thresholds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendationConfig {
    /// Length of the trailing window when the caller gives no dates
    pub window_days: u32,
    /// A merchant is "frequent" with strictly more purchases than this
    pub frequent_merchant_min_count: usize,
    /// Average daily spend above this triggers an alert
    pub daily_spending_threshold: Decimal,
    /// Savings rate (fraction of income) below this triggers an alert
    pub min_savings_rate: Decimal,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            window_days: 30,
            frequent_merchant_min_count: 5,
            daily_spending_threshold: Decimal::ONE_HUNDRED,
            min_savings_rate: Decimal::new(20, 2),
        }
    }
}

/// Chart data settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartConfig {
    pub output_dir: String,
    pub top_merchants: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            output_dir: "charts".to_string(),
            top_merchants: 10,
        }
    }
}

/// Full configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub budgets: BudgetTable,
    pub budget_rules: BudgetRules,
    pub recommendations: RecommendationConfig,
    pub charts: ChartConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            budgets: default_budget_table(),
            budget_rules: BudgetRules::default(),
            recommendations: RecommendationConfig::default(),
            charts: ChartConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration (explicit path, then override location, then embedded)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }

        if let Some(default_path) = default_config_path() {
            if default_path.exists() {
                return Self::from_file(&default_path);
            }
        }

        debug!("Using embedded default config");
        Self::embedded()
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;
        debug!(path = %path.display(), "Loading config");
        parse_config(&content)
    }

    /// The embedded default configuration
    pub fn embedded() -> Result<Self> {
        parse_config(DEFAULT_CONFIG)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tally").join("config").join("tally.toml"))
}

fn default_budget_table() -> BudgetTable {
    let entries = [
        ("Groceries", 400),
        ("Food & Dining", 300),
        ("Transportation", 200),
        ("Entertainment", 150),
        ("Shopping", 250),
        ("Healthcare", 100),
        ("Utilities", 200),
        ("Rent", 1200),
        ("Savings", 500),
        ("Income", 0),
    ]
    .into_iter()
    .map(|(category, limit)| BudgetEntry::new(category, Decimal::from(limit)))
    .collect();

    // Static table: categories are unique and limits non-negative
    BudgetTable::new(entries).unwrap_or_default()
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    budget: Option<Vec<BudgetEntry>>,
    budget_rules: Option<RawBudgetRules>,
    recommendations: Option<RawRecommendations>,
    charts: Option<RawCharts>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBudgetRules {
    on_track_ratio: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRecommendations {
    window_days: Option<u32>,
    frequent_merchant_min_count: Option<usize>,
    daily_spending_threshold: Option<Decimal>,
    min_savings_rate: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCharts {
    output_dir: Option<String>,
    top_merchants: Option<usize>,
}

fn non_negative(name: &str, value: Decimal) -> Result<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(Error::Config(format!("{} must not be negative: {}", name, value)));
    }
    check_amount(value).map_err(|reason| Error::Config(format!("{}: {}", name, reason)))?;
    Ok(value)
}

/// Parse config from TOML content
pub fn parse_config(content: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = Config::default();

    if let Some(entries) = raw.budget {
        config.budgets = BudgetTable::new(entries)?;
    }

    if let Some(rules) = raw.budget_rules {
        if let Some(ratio) = rules.on_track_ratio {
            let ratio = non_negative("on_track_ratio", ratio)?;
            if ratio > Decimal::ONE {
                return Err(Error::Config(format!(
                    "on_track_ratio must be between 0 and 1: {}",
                    ratio
                )));
            }
            config.budget_rules.on_track_ratio = ratio;
        }
    }

    if let Some(recs) = raw.recommendations {
        if let Some(days) = recs.window_days {
            if days == 0 {
                return Err(Error::Config("window_days must be at least 1".into()));
            }
            config.recommendations.window_days = days;
        }
        if let Some(count) = recs.frequent_merchant_min_count {
            config.recommendations.frequent_merchant_min_count = count;
        }
        if let Some(threshold) = recs.daily_spending_threshold {
            config.recommendations.daily_spending_threshold =
                non_negative("daily_spending_threshold", threshold)?;
        }
        if let Some(rate) = recs.min_savings_rate {
            config.recommendations.min_savings_rate = non_negative("min_savings_rate", rate)?;
        }
    }

    if let Some(charts) = raw.charts {
        if let Some(dir) = charts.output_dir {
            config.charts.output_dir = dir;
        }
        if let Some(top) = charts.top_merchants {
            if top == 0 {
                return Err(Error::Config("top_merchants must be at least 1".into()));
            }
            config.charts.top_merchants = top;
        }
    }

    Ok(config)
}
