//! Row types for the raw and cleaned inventory datasets.

use std::fmt;

use serde::Serialize;

/// Columns the input file must carry. Extra columns are tolerated and ignored.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "Product_ID",
    "Category",
    "Unit_Cost_Raw",
    "Current_Stock_Raw",
    "Daily_Demand_Est",
    "Safety_Stock_Target",
    "Vendor_Name",
    "Lead_Time_Days",
];

/// Columns of the cleaned output, in emission order.
pub const OUTPUT_COLUMNS: [&str; 11] = [
    "Product_ID",
    "Category",
    "Unit_Cost",
    "Current_Stock",
    "Daily_Demand_Est",
    "Safety_Stock_Target",
    "Vendor_Name",
    "Lead_Time_Days",
    "Reorder_Point",
    "Stock_Status",
    "Inventory_Value",
];

/// One input row, as extracted: string identity fields plus the numeric
/// fields that parse trivially. The heterogeneous cost/stock encodings stay
/// raw until the coercion stage.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub product_id: String,
    pub category: String,
    pub unit_cost_raw: Option<String>,
    pub current_stock_raw: Option<String>,
    pub daily_demand_est: Option<f64>,
    pub safety_stock_target: f64,
    pub vendor_name: String,
    pub lead_time_days: i64,
}

/// One fully cleaned output row. `daily_demand_est` and `reorder_point` stay
/// optional: a missing demand estimate is never imputed and serializes as an
/// empty field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanRecord {
    #[serde(rename = "Product_ID")]
    pub product_id: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Unit_Cost")]
    pub unit_cost: f64,
    #[serde(rename = "Current_Stock")]
    pub current_stock: f64,
    #[serde(rename = "Daily_Demand_Est")]
    pub daily_demand_est: Option<f64>,
    #[serde(rename = "Safety_Stock_Target")]
    pub safety_stock_target: f64,
    #[serde(rename = "Vendor_Name")]
    pub vendor_name: String,
    #[serde(rename = "Lead_Time_Days")]
    pub lead_time_days: i64,
    #[serde(rename = "Reorder_Point")]
    pub reorder_point: Option<f64>,
    #[serde(rename = "Stock_Status")]
    pub stock_status: StockStatus,
    #[serde(rename = "Inventory_Value")]
    pub inventory_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StockStatus {
    #[serde(rename = "Out of Stock")]
    OutOfStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "Normal Stock")]
    NormalStock,
}

impl StockStatus {
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "Out of Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::NormalStock => "Normal Stock",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
