//! The cleaning pipeline: a fixed, linear sequence of in-memory passes over
//! the raw table.
//!
//! Stage order is load-bearing: field normalization, numeric coercion,
//! outlier correction, median aggregation, missing-value fill, validation and
//! clamping, derived fields, projection. Per-category medians need the whole
//! table coerced before any fill can happen, so aggregation and fill are two
//! separate stages. No stage ever adds or drops a row; duplicate source rows
//! pass through untouched.

use std::collections::{BTreeSet, HashMap};

use crate::{
    cli::MissingDemandPolicy,
    coerce,
    record::{CleanRecord, RawRecord, StockStatus},
    stats,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct CleanOptions {
    pub missing_demand: MissingDemandPolicy,
}

/// Counters observed while cleaning. Purely observational; not part of the
/// data contract.
#[derive(Debug, Default, PartialEq)]
pub struct CleanReport {
    pub rows: usize,
    pub whitespace_trimmed: usize,
    pub categories_before: usize,
    pub categories_after: usize,
    pub categories: Vec<String>,
    pub distinct_vendors: usize,
    pub costs_parsed: usize,
    pub costs_unparseable: usize,
    pub negative_stock_corrected: usize,
    pub null_stock_filled: usize,
    pub costs_imputed: usize,
    pub lead_time_corrected: usize,
}

/// Runs every stage in order and returns the cleaned rows plus the report.
pub fn clean(mut rows: Vec<RawRecord>, options: &CleanOptions) -> (Vec<CleanRecord>, CleanReport) {
    let mut report = CleanReport {
        rows: rows.len(),
        ..CleanReport::default()
    };
    normalize_fields(&mut rows, &mut report);
    let mut working = coerce_numeric(rows, &mut report);
    correct_outliers(&mut working, &mut report);
    let medians = CategoryMedians::collect(&working);
    fill_missing(&mut working, &medians, &mut report);
    validate_and_clamp(&mut working, &mut report);
    let cleaned = derive_fields(working, options.missing_demand);
    (cleaned, report)
}

struct WorkingRow {
    product_id: String,
    category: String,
    unit_cost: Option<f64>,
    current_stock: Option<f64>,
    daily_demand_est: Option<f64>,
    safety_stock_target: f64,
    vendor_name: String,
    lead_time_days: i64,
}

/// Trims identity fields and collapses category spellings to capitalized
/// form. Distinct spellings that normalize to the same string merge into one
/// category.
fn normalize_fields(rows: &mut [RawRecord], report: &mut CleanReport) {
    let mut before = BTreeSet::new();
    let mut after = BTreeSet::new();
    let mut vendors = BTreeSet::new();
    for row in rows.iter_mut() {
        let trimmed = row.product_id.trim().to_string();
        report.whitespace_trimmed += row.product_id.chars().count() - trimmed.chars().count();
        row.product_id = trimmed;

        let trimmed = row.vendor_name.trim().to_string();
        report.whitespace_trimmed += row.vendor_name.chars().count() - trimmed.chars().count();
        row.vendor_name = trimmed;
        vendors.insert(row.vendor_name.clone());

        before.insert(row.category.clone());
        row.category = capitalize(row.category.trim());
        after.insert(row.category.clone());
    }
    report.categories_before = before.len();
    report.categories_after = after.len();
    report.categories = after.into_iter().collect();
    report.distinct_vendors = vendors.len();
}

/// Uppercases the first letter and lowercases the rest ("ELECTRONICS" becomes
/// "Electronics").
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn coerce_numeric(rows: Vec<RawRecord>, report: &mut CleanReport) -> Vec<WorkingRow> {
    rows.into_iter()
        .map(|row| {
            let unit_cost = coerce::coerce_cost(row.unit_cost_raw.as_deref());
            if unit_cost.is_some() {
                report.costs_parsed += 1;
            } else {
                report.costs_unparseable += 1;
            }
            WorkingRow {
                product_id: row.product_id,
                category: row.category,
                unit_cost,
                current_stock: coerce::coerce_stock(row.current_stock_raw.as_deref()),
                daily_demand_est: row.daily_demand_est,
                safety_stock_target: row.safety_stock_target,
                vendor_name: row.vendor_name,
                lead_time_days: row.lead_time_days,
            }
        })
        .collect()
}

/// Negative physical inventory is a data-entry error, not a backorder signal.
fn correct_outliers(rows: &mut [WorkingRow], report: &mut CleanReport) {
    for row in rows.iter_mut() {
        if let Some(stock) = row.current_stock
            && stock < 0.0
        {
            row.current_stock = Some(0.0);
            report.negative_stock_corrected += 1;
        }
    }
}

/// Aggregation pass: per-category cost medians over successfully parsed
/// values, plus the global median as the fallback tier.
struct CategoryMedians {
    by_category: HashMap<String, f64>,
    global: Option<f64>,
}

impl CategoryMedians {
    fn collect(rows: &[WorkingRow]) -> Self {
        let mut per_category: HashMap<String, Vec<f64>> = HashMap::new();
        let mut all = Vec::new();
        for row in rows {
            if let Some(cost) = row.unit_cost {
                per_category
                    .entry(row.category.clone())
                    .or_default()
                    .push(cost);
                all.push(cost);
            }
        }
        let by_category = per_category
            .into_iter()
            .filter_map(|(category, values)| stats::median(&values).map(|m| (category, m)))
            .collect();
        Self {
            by_category,
            global: stats::median(&all),
        }
    }

    fn for_category(&self, category: &str) -> Option<f64> {
        self.by_category.get(category).copied().or(self.global)
    }
}

/// Fill pass: a missing stock count means "out of stock", a missing cost gets
/// the category median (global median if the whole category was unparseable).
fn fill_missing(rows: &mut [WorkingRow], medians: &CategoryMedians, report: &mut CleanReport) {
    for row in rows.iter_mut() {
        if row.current_stock.is_none() {
            row.current_stock = Some(0.0);
            report.null_stock_filled += 1;
        }
        if row.unit_cost.is_none() {
            row.unit_cost = medians.for_category(&row.category);
            if row.unit_cost.is_some() {
                report.costs_imputed += 1;
            }
        }
    }
}

/// Clamps sub-zero demand and safety-stock values up to 0 and lead times up
/// to 1 day. A missing demand estimate is left missing; only numeric
/// violations are corrected here.
fn validate_and_clamp(rows: &mut [WorkingRow], report: &mut CleanReport) {
    for row in rows.iter_mut() {
        if let Some(demand) = row.daily_demand_est
            && demand < 0.0
        {
            row.daily_demand_est = Some(0.0);
        }
        if row.safety_stock_target < 0.0 {
            row.safety_stock_target = 0.0;
        }
        if row.lead_time_days < 1 {
            row.lead_time_days = 1;
            report.lead_time_corrected += 1;
        }
    }
}

fn derive_fields(rows: Vec<WorkingRow>, policy: MissingDemandPolicy) -> Vec<CleanRecord> {
    rows.into_iter()
        .map(|row| {
            let lead = row.lead_time_days as f64;
            let reorder_point = match (row.daily_demand_est, policy) {
                (Some(demand), _) => Some(demand * lead + row.safety_stock_target),
                (None, MissingDemandPolicy::ZeroDemand) => Some(row.safety_stock_target),
                (None, _) => None,
            };
            let current_stock = row.current_stock.unwrap_or(0.0);
            let unit_cost = row.unit_cost.unwrap_or(0.0);
            CleanRecord {
                product_id: row.product_id,
                category: row.category,
                unit_cost,
                current_stock,
                daily_demand_est: row.daily_demand_est,
                safety_stock_target: row.safety_stock_target,
                vendor_name: row.vendor_name,
                lead_time_days: row.lead_time_days,
                reorder_point,
                stock_status: classify(current_stock, reorder_point, policy),
                inventory_value: current_stock * unit_cost,
            }
        })
        .collect()
}

/// Classifies stock status, pattern-matching over a present or missing
/// reorder point instead of leaning on NaN comparison semantics.
fn classify(stock: f64, reorder_point: Option<f64>, policy: MissingDemandPolicy) -> StockStatus {
    if stock == 0.0 {
        return StockStatus::OutOfStock;
    }
    match reorder_point {
        Some(threshold) if stock < threshold => StockStatus::LowStock,
        Some(_) => StockStatus::NormalStock,
        None => match policy {
            MissingDemandPolicy::NormalStock => StockStatus::NormalStock,
            MissingDemandPolicy::LowStock | MissingDemandPolicy::ZeroDemand => {
                StockStatus::LowStock
            }
        },
    }
}
