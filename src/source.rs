use crate::errors::AppError;
use crate::models::{SaleRecord, SaleStatus};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, warn};

/// Hands the aggregation layer an immutable snapshot of the sales rows.
/// The dashboard re-reads the snapshot on every request; nothing is cached
/// or mutated behind this seam.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn snapshot(&self) -> Result<Vec<SaleRecord>, AppError>;
}

/// Reads a CSV export of the sales sheet. Expected headers: `product`,
/// `price`, `sale_date` (or `date`), `status`; extra columns are ignored.
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DataSource for CsvFileSource {
    async fn snapshot(&self) -> Result<Vec<SaleRecord>, AppError> {
        let bytes = fs::read(&self.path).await.inspect_err(|err| {
            error!(
                "failed to read sales snapshot {}: {err}",
                self.path.display()
            );
        })?;
        Ok(parse_sales_csv(&bytes))
    }
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(default)]
    product: Option<String>,
    #[serde(default)]
    price: Option<String>,
    #[serde(default, alias = "date")]
    sale_date: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

/// Turn CSV bytes into records. Rows without a product are unusable and
/// skipped; bad price or date cells become `None` so the aggregation layer
/// applies its own exclusion rule. Every drop or blank-out logs a warning.
pub fn parse_sales_csv(bytes: &[u8]) -> Vec<SaleRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(bytes);

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<RawRow>().enumerate() {
        let line = index + 2;
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                warn!("skipping malformed row {line}: {err}");
                continue;
            }
        };

        let product = match row.product {
            Some(product) if !product.is_empty() => product,
            _ => {
                warn!("skipping row {line}: missing product");
                continue;
            }
        };

        let price = row.price.as_deref().and_then(|raw| {
            let parsed = parse_price(raw);
            if parsed.is_none() {
                warn!("row {line}: unparseable price {raw:?}");
            }
            parsed
        });

        let sale_date = row.sale_date.as_deref().and_then(|raw| {
            let parsed = parse_date(raw);
            if parsed.is_none() {
                warn!("row {line}: unparseable date {raw:?}");
            }
            parsed
        });

        let raw_status = row.status.unwrap_or_default();
        let status = SaleStatus::parse(&raw_status);
        if status == SaleStatus::Unknown && !raw_status.trim().is_empty() {
            warn!("row {line}: unrecognized status {raw_status:?}");
        }

        records.push(SaleRecord {
            product,
            price,
            sale_date,
            status,
        });
    }

    records
}

// Accepts plain decimals plus the sheet's Danish export quirks: a trailing
// currency marker and comma decimal separators.
fn parse_price(raw: &str) -> Option<f64> {
    let mut cleaned = raw.trim();
    let folded = cleaned.to_lowercase();
    for suffix in ["kr.", "kr", "dkk"] {
        if folded.ends_with(suffix) {
            cleaned = cleaned[..cleaned.len() - suffix.len()].trim_end();
            break;
        }
    }

    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned.to_string()
    };
    normalized.parse::<f64>().ok().filter(|price| price.is_finite())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    const FORMATS: [&str; 3] = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"];
    let trimmed = raw.trim();
    FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

pub fn resolve_data_path() -> PathBuf {
    default_data_path(std::env::var("SALES_DATA_PATH").ok())
}

fn default_data_path(configured: Option<String>) -> PathBuf {
    match configured {
        Some(path) => PathBuf::from(path),
        None => Path::new("data").join("sales.csv"),
    }
}
