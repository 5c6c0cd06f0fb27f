//! Historical monthly sales data

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Sales observed for one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    /// Month of the observation (day of month is not significant)
    pub month: NaiveDate,
    /// Total sales for the month
    pub sales: f64,
}

impl HistoricalRecord {
    /// Create a new record, rejecting negative or non-finite sales
    pub fn new(month: NaiveDate, sales: f64) -> Result<Self> {
        if !sales.is_finite() || sales < 0.0 {
            return Err(ForecastError::DataError(format!(
                "Sales for {} must be a non-negative number, got {}",
                month.format("%Y-%m"),
                sales
            )));
        }

        Ok(Self { month, sales })
    }

    /// Year and month pair used for ordering and duplicate detection
    fn year_month(&self) -> (i32, u32) {
        (self.month.year(), self.month.month())
    }
}

/// Chronologically sorted monthly sales history without duplicate months
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SalesHistory {
    records: Vec<HistoricalRecord>,
}

impl SalesHistory {
    /// Create a history from records in any order.
    ///
    /// Records are sorted by month; two records for the same month are an error.
    pub fn new(mut records: Vec<HistoricalRecord>) -> Result<Self> {
        records.sort_by_key(|r| r.month);

        if let Some(pair) = records
            .windows(2)
            .find(|w| w[0].year_month() == w[1].year_month())
        {
            return Err(ForecastError::DataError(format!(
                "Duplicate month in sales history: {}",
                pair[1].month.format("%Y-%m")
            )));
        }

        Ok(Self { records })
    }

    /// Create a history from (year, month, sales) triples (for testing)
    pub fn from_monthly(values: &[(i32, u32, f64)]) -> Result<Self> {
        let records = values
            .iter()
            .map(|&(year, month, sales)| {
                let date = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
                    ForecastError::DateError(format!("Invalid month {}-{}", year, month))
                })?;
                HistoricalRecord::new(date, sales)
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(records)
    }

    /// Get the records in chronological order
    pub fn records(&self) -> &[HistoricalRecord] {
        &self.records
    }

    /// Get the sales values in chronological order
    pub fn sales(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.sales).collect()
    }

    /// Get the earliest record
    pub fn first(&self) -> Option<&HistoricalRecord> {
        self.records.first()
    }

    /// Get the latest record
    pub fn last(&self) -> Option<&HistoricalRecord> {
        self.records.last()
    }

    /// Earliest calendar year in the history
    pub fn min_year(&self) -> Result<i32> {
        self.first()
            .map(|r| r.month.year())
            .ok_or(ForecastError::EmptyHistory)
    }

    /// Check if the history is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get the number of months in the history
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Data loader for historical sales files
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load historical sales from a CSV file with a month column and a sales column.
    ///
    /// A missing file is reported as [`ForecastError::DataNotFound`].
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<SalesHistory> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ForecastError::DataNotFound(path.display().to_string()));
        }

        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load historical sales from any CSV source
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<SalesHistory> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let month_idx = Self::detect_month_column(&headers)?;
        let sales_idx = Self::detect_sales_column(&headers)?;

        let mut records = Vec::new();
        for (line, row) in reader.records().enumerate() {
            let row = row?;
            let month_raw = row.get(month_idx).unwrap_or_default();
            let sales_raw = row.get(sales_idx).unwrap_or_default();

            let month = parse_month(month_raw)?;
            let sales: f64 = sales_raw.parse().map_err(|_| {
                ForecastError::DataError(format!(
                    "Row {}: cannot parse sales value '{}'",
                    line + 1,
                    sales_raw
                ))
            })?;

            records.push(HistoricalRecord::new(month, sales)?);
        }

        SalesHistory::new(records)
    }

    /// Detect the month column: an exact `month` header wins, otherwise the
    /// first header mentioning a month or date
    fn detect_month_column(headers: &csv::StringRecord) -> Result<usize> {
        Self::find_column(headers, "month", &["month", "date"])
            .ok_or_else(|| ForecastError::DataError("No month column found in data".to_string()))
    }

    /// Detect the sales column: an exact `sales` header wins, otherwise the
    /// first header mentioning sales
    fn detect_sales_column(headers: &csv::StringRecord) -> Result<usize> {
        Self::find_column(headers, "sales", &["sales"])
            .ok_or_else(|| ForecastError::DataError("No sales column found in data".to_string()))
    }

    /// Case-insensitive header lookup, exact name before substring matches
    fn find_column(headers: &csv::StringRecord, exact: &str, partial: &[&str]) -> Option<usize> {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(exact))
            .or_else(|| {
                headers.iter().position(|h| {
                    let lower = h.to_lowercase();
                    partial.iter().any(|p| lower.contains(*p))
                })
            })
    }
}

/// Accepted full-date layouts; a bare year-month is read as the first of the month
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a calendar month given as `YYYY-MM`, `YYYY-MM-DD`, `YYYY/MM` or `YYYY/MM/DD`
pub fn parse_month(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Ok(date);
        }
        let separator = &format[2..3];
        if let Ok(date) = NaiveDate::parse_from_str(&format!("{raw}{separator}01"), format) {
            return Ok(date);
        }
    }

    Err(ForecastError::DataError(format!(
        "Cannot parse '{}' as a calendar month",
        raw
    )))
}
