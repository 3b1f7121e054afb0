//! Extraction: load the raw inventory table into memory, validating that the
//! required columns are present before any row is read.

use std::path::Path;

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use thiserror::Error;

use crate::{
    io_utils,
    record::{RawRecord, REQUIRED_COLUMNS},
};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Input is missing required column '{0}'")]
    MissingColumn(&'static str),
}

/// The raw table: original headers plus one `RawRecord` per data row, in
/// input order.
#[derive(Debug)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRecord>,
}

impl RawTable {
    pub fn load(path: &Path, delimiter: u8, encoding: &'static Encoding) -> Result<Self> {
        let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
        let headers = io_utils::reader_headers(&mut reader, encoding)?;
        let layout = ColumnLayout::resolve(&headers)?;

        let mut rows = Vec::new();
        for (idx, record) in reader.byte_records().enumerate() {
            let record = record.with_context(|| format!("Reading row {}", idx + 2))?;
            let decoded = io_utils::decode_record(&record, encoding)?;
            let row = layout
                .materialize(&decoded)
                .with_context(|| format!("Parsing row {} in {path:?}", idx + 2))?;
            rows.push(row);
        }
        Ok(Self { headers, rows })
    }
}

#[derive(Debug)]
struct ColumnLayout {
    product_id: usize,
    category: usize,
    unit_cost_raw: usize,
    current_stock_raw: usize,
    daily_demand_est: usize,
    safety_stock_target: usize,
    vendor_name: usize,
    lead_time_days: usize,
}

impl ColumnLayout {
    fn resolve(headers: &[String]) -> Result<Self> {
        let position = |name: &'static str| -> Result<usize> {
            headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| ExtractError::MissingColumn(name).into())
        };
        Ok(Self {
            product_id: position(REQUIRED_COLUMNS[0])?,
            category: position(REQUIRED_COLUMNS[1])?,
            unit_cost_raw: position(REQUIRED_COLUMNS[2])?,
            current_stock_raw: position(REQUIRED_COLUMNS[3])?,
            daily_demand_est: position(REQUIRED_COLUMNS[4])?,
            safety_stock_target: position(REQUIRED_COLUMNS[5])?,
            vendor_name: position(REQUIRED_COLUMNS[6])?,
            lead_time_days: position(REQUIRED_COLUMNS[7])?,
        })
    }

    fn materialize(&self, decoded: &[String]) -> Result<RawRecord> {
        let field = |idx: usize| decoded.get(idx).map(|s| s.as_str()).unwrap_or("");
        Ok(RawRecord {
            product_id: field(self.product_id).to_string(),
            category: field(self.category).to_string(),
            unit_cost_raw: optional_text(field(self.unit_cost_raw)),
            current_stock_raw: optional_text(field(self.current_stock_raw)),
            daily_demand_est: parse_optional_f64(field(self.daily_demand_est), "Daily_Demand_Est")?,
            safety_stock_target: parse_required_f64(
                field(self.safety_stock_target),
                "Safety_Stock_Target",
            )?,
            vendor_name: field(self.vendor_name).to_string(),
            lead_time_days: parse_required_i64(field(self.lead_time_days), "Lead_Time_Days")?,
        })
    }
}

fn optional_text(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_optional_f64(value: &str, column: &str) -> Result<Option<f64>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .with_context(|| format!("Failed to parse '{trimmed}' as {column}"))
}

fn parse_required_f64(value: &str, column: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .with_context(|| format!("Failed to parse '{}' as {column}", value.trim()))
}

fn parse_required_i64(value: &str, column: &str) -> Result<i64> {
    let trimmed = value.trim();
    // Accept "12.0"-style exports alongside plain integers.
    trimmed
        .parse::<i64>()
        .or_else(|_| trimmed.parse::<f64>().map(|parsed| parsed as i64))
        .with_context(|| format!("Failed to parse '{trimmed}' as {column}"))
}
