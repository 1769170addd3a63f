use crate::models::{PeriodConfig, ProductRule};
use crate::source::resolve_data_path;
use chrono::{Datelike, Local};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Everything the service reads from the environment, resolved once at
/// startup. Bad values fail the boot instead of silently defaulting.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub period: PeriodConfig,
    pub data_path: PathBuf,
    pub port: u16,
    pub product_rules: Vec<ProductRule>,
    pub top_n: usize,
}

#[derive(Debug)]
pub struct ConfigError {
    pub var: &'static str,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.var, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let current_year = Local::now().date_naive().iso_week().year();
        let period = PeriodConfig {
            start_week: parse_var("PERIOD_START_WEEK", 14)?,
            end_week: parse_var("PERIOD_END_WEEK", 26)?,
            year: parse_var("PERIOD_YEAR", current_year)?,
            goal_amount: parse_var("GOAL_AMOUNT", 96_555.0)?,
        };
        validate_period(&period)?;

        Ok(Self {
            period,
            data_path: resolve_data_path(),
            port: parse_var("PORT", 8080)?,
            product_rules: default_product_rules(),
            top_n: parse_var("TOP_PRODUCTS", 5)?,
        })
    }
}

fn parse_var<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: fmt::Display,
{
    match env::var(var) {
        Ok(value) => value.trim().parse().map_err(|err| ConfigError {
            var,
            message: format!("invalid value {value:?}: {err}"),
        }),
        Err(_) => Ok(default),
    }
}

fn validate_period(period: &PeriodConfig) -> Result<(), ConfigError> {
    if period.start_week < 1 || period.end_week > 53 {
        return Err(ConfigError {
            var: "PERIOD_START_WEEK",
            message: format!(
                "weeks must lie in 1..=53, got {}..={}",
                period.start_week, period.end_week
            ),
        });
    }
    if period.start_week > period.end_week {
        return Err(ConfigError {
            var: "PERIOD_START_WEEK",
            message: format!(
                "start week {} is after end week {}",
                period.start_week, period.end_week
            ),
        });
    }
    if !period.goal_amount.is_finite() || period.goal_amount < 0.0 {
        return Err(ConfigError {
            var: "GOAL_AMOUNT",
            message: format!("goal must be a non-negative number, got {}", period.goal_amount),
        });
    }
    Ok(())
}

/// The product categories the sheet is grouped into. SST shows up under
/// several spellings in the product column, so it carries extra needles.
pub fn default_product_rules() -> Vec<ProductRule> {
    vec![
        ProductRule::new("Microsoft Ads", &["microsoft ads"]),
        ProductRule::new("Youtube", &["youtube"]),
        ProductRule::new("Leadpage", &["leadpage"]),
        ProductRule::new("SST", &["sst", "server-side", "server side"]),
    ]
}
