use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Outcome of a sale offer. Raw spreadsheet values are normalized through
/// [`SaleStatus::parse`]; anything outside the fixed vocabulary becomes
/// `Unknown` and stays out of the hit-rate denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Won,
    Offered,
    Rejected,
    Unknown,
}

impl SaleStatus {
    /// Normalize a raw status cell. Case-insensitive, accepts the Danish
    /// source vocabulary and English equivalents, and corrects the one
    /// known spreadsheet typo ("aflsag"). Everything else is `Unknown`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "vundet" | "won" => Self::Won,
            "tilbudt" | "tilbud" | "offered" => Self::Offered,
            "afslag" | "aflsag" | "rejected" => Self::Rejected,
            _ => Self::Unknown,
        }
    }
}

/// One row of the sales snapshot. Price and date stay optional here; rows
/// with either missing are dropped by the aggregation layer, not at parse
/// time, so the source can report how many rows were unusable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub product: String,
    pub price: Option<f64>,
    pub sale_date: Option<NaiveDate>,
    pub status: SaleStatus,
}

/// The configured goal period: a contiguous ISO week range within one year
/// and the revenue goal for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodConfig {
    pub start_week: u32,
    pub end_week: u32,
    pub year: i32,
    pub goal_amount: f64,
}

impl PeriodConfig {
    pub fn contains(&self, week: u32) -> bool {
        week >= self.start_week && week <= self.end_week
    }

    pub fn week_count(&self) -> u32 {
        self.end_week - self.start_week + 1
    }
}

/// A product category and the lowercase needles that map a raw product
/// name into it. Matching is substring-based, like the source sheet's
/// free-text product column requires.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRule {
    pub name: String,
    pub needles: Vec<String>,
}

impl ProductRule {
    pub fn new(name: &str, needles: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            needles: needles.iter().map(|n| n.to_lowercase()).collect(),
        }
    }

    pub fn matches(&self, product: &str) -> bool {
        let folded = product.to_lowercase();
        self.needles.iter().any(|needle| folded.contains(needle))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPoint {
    pub week: u32,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitRate {
    pub won: u64,
    pub offered: u64,
    pub rejected: u64,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductTotal {
    pub name: String,
    pub total: f64,
    pub count: u64,
}

/// Everything the dashboard page needs for one render, recomputed from a
/// fresh snapshot on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalReport {
    pub year: i32,
    pub start_week: u32,
    pub end_week: u32,
    pub current_week: u32,
    pub goal_amount: f64,
    pub total: f64,
    pub percent: f64,
    pub weekly_goal: f64,
    pub remaining_weekly_target: f64,
    pub weekly: Vec<WeeklyPoint>,
    pub hit_rate: HitRate,
    pub products: Vec<ProductTotal>,
}
