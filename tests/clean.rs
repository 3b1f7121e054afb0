mod common;

use std::fs;

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::tempdir;

use common::{read_output, write_dirty_fixture, write_rows};
use inventory_etl::record::OUTPUT_COLUMNS;

fn clean_cmd() -> Command {
    Command::cargo_bin("inventory-etl").expect("binary exists")
}

fn run_clean(input: &std::path::Path, output: &std::path::Path, extra: &[&str]) {
    let mut cmd = clean_cmd();
    cmd.args([
        "clean",
        "-i",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
    ]);
    cmd.args(extra);
    cmd.assert().success();
}

fn field(rows: &[Vec<String>], row: usize, column: &str) -> String {
    let idx = OUTPUT_COLUMNS
        .iter()
        .position(|c| *c == column)
        .expect("known column");
    rows[row][idx].clone()
}

fn numeric(rows: &[Vec<String>], row: usize, column: &str) -> f64 {
    field(rows, row, column).parse().expect("numeric field")
}

#[test]
fn clean_projects_exactly_the_output_columns() {
    let temp = tempdir().expect("temp dir");
    let input = temp.path().join("dirty.csv");
    let output = temp.path().join("clean.csv");
    write_dirty_fixture(&input);
    run_clean(&input, &output, &[]);

    let (headers, rows) = read_output(&output);
    assert_eq!(headers, OUTPUT_COLUMNS);
    assert_eq!(rows.len(), 6, "row count is preserved");
    assert!(rows.iter().all(|row| row.len() == OUTPUT_COLUMNS.len()));
}

#[test]
fn clean_enforces_post_clean_invariants() {
    let temp = tempdir().expect("temp dir");
    let input = temp.path().join("dirty.csv");
    let output = temp.path().join("clean.csv");
    write_dirty_fixture(&input);
    run_clean(&input, &output, &[]);

    let (_, rows) = read_output(&output);
    for row in 0..rows.len() {
        let cost = numeric(&rows, row, "Unit_Cost");
        assert!(cost >= 0.0, "cost is non-null and non-negative");
        assert!(numeric(&rows, row, "Current_Stock") >= 0.0);
        assert!(numeric(&rows, row, "Safety_Stock_Target") >= 0.0);
        assert!(numeric(&rows, row, "Lead_Time_Days") >= 1.0);
    }
}

#[test]
fn clean_normalizes_fields_and_coerces_costs() {
    let temp = tempdir().expect("temp dir");
    let input = temp.path().join("dirty.csv");
    let output = temp.path().join("clean.csv");
    write_dirty_fixture(&input);
    run_clean(&input, &output, &[]);

    let (_, rows) = read_output(&output);
    assert_eq!(field(&rows, 0, "Product_ID"), "SKU-A1001");
    assert_eq!(field(&rows, 0, "Vendor_Name"), "Tokyo Electronics");
    for row in 0..3 {
        assert_eq!(field(&rows, row, "Category"), "Electronics");
    }
    for row in 3..6 {
        assert_eq!(field(&rows, row, "Category"), "Home");
    }

    assert_eq!(numeric(&rows, 0, "Unit_Cost"), 123.45);
    assert_eq!(numeric(&rows, 1, "Unit_Cost"), 80.0);
    assert_eq!(numeric(&rows, 2, "Unit_Cost"), 1200.0);
    assert_eq!(numeric(&rows, 0, "Current_Stock"), 150.0);
}

#[test]
fn clean_repairs_outliers_and_missing_values() {
    let temp = tempdir().expect("temp dir");
    let input = temp.path().join("dirty.csv");
    let output = temp.path().join("clean.csv");
    write_dirty_fixture(&input);
    run_clean(&input, &output, &[]);

    let (_, rows) = read_output(&output);
    // Negative stock clamps to zero and classifies as out of stock.
    assert_eq!(numeric(&rows, 1, "Current_Stock"), 0.0);
    assert_eq!(field(&rows, 1, "Stock_Status"), "Out of Stock");
    // Sub-minimum lead time raises to one day.
    assert_eq!(numeric(&rows, 1, "Lead_Time_Days"), 1.0);
    // Missing stock fills as zero.
    assert_eq!(numeric(&rows, 2, "Current_Stock"), 0.0);
    // The Quote Pending cost takes its category's median (42.5 from the two
    // parsed Home rows).
    assert_eq!(numeric(&rows, 3, "Unit_Cost"), 42.5);
}

#[test]
fn clean_derives_reorder_point_status_and_value() {
    let temp = tempdir().expect("temp dir");
    let input = temp.path().join("dirty.csv");
    let output = temp.path().join("clean.csv");
    write_dirty_fixture(&input);
    run_clean(&input, &output, &[]);

    let (_, rows) = read_output(&output);
    // 10 demand * 7 days + 50 safety stock, against 150 on hand.
    assert_eq!(numeric(&rows, 0, "Reorder_Point"), 120.0);
    assert_eq!(field(&rows, 0, "Stock_Status"), "Normal Stock");
    assert_eq!(numeric(&rows, 0, "Inventory_Value"), 150.0 * 123.45);
    // 2 * 5 + 10 = 20 against 40 on hand.
    assert_eq!(numeric(&rows, 4, "Reorder_Point"), 20.0);
    assert_eq!(field(&rows, 4, "Stock_Status"), "Normal Stock");
}

#[test]
fn clean_preserves_duplicate_rows_verbatim() {
    let temp = tempdir().expect("temp dir");
    let input = temp.path().join("dirty.csv");
    let output = temp.path().join("clean.csv");
    write_dirty_fixture(&input);
    run_clean(&input, &output, &[]);

    let (_, rows) = read_output(&output);
    assert_eq!(rows[4], rows[5]);
}

#[test]
fn clean_emits_header_row_for_an_empty_table() {
    let temp = tempdir().expect("temp dir");
    let input = temp.path().join("dirty.csv");
    let output = temp.path().join("clean.csv");
    let no_rows: Vec<[&str; 9]> = Vec::new();
    write_rows(&input, &common::RAW_HEADERS, &no_rows);
    run_clean(&input, &output, &[]);

    let (headers, rows) = read_output(&output);
    assert_eq!(headers, OUTPUT_COLUMNS);
    assert!(rows.is_empty());
    assert!(!fs::read_to_string(&output).expect("output").is_empty());
}

#[test]
fn clean_is_idempotent_with_byte_identical_output() {
    let temp = tempdir().expect("temp dir");
    let input = temp.path().join("dirty.csv");
    let first = temp.path().join("clean-a.csv");
    let second = temp.path().join("clean-b.csv");
    write_dirty_fixture(&input);
    run_clean(&input, &first, &[]);
    run_clean(&input, &second, &[]);

    let first_bytes = fs::read(&first).expect("first output");
    let second_bytes = fs::read(&second).expect("second output");
    assert_eq!(first_bytes, second_bytes);
}

#[test]
fn missing_demand_defaults_to_conservative_low_stock() {
    let temp = tempdir().expect("temp dir");
    let input = temp.path().join("dirty.csv");
    let output = temp.path().join("clean.csv");
    write_dirty_fixture(&input);
    run_clean(&input, &output, &[]);

    let (_, rows) = read_output(&output);
    // Fixture row 2 has no demand estimate; stock filled to 0 wins first.
    assert_eq!(field(&rows, 2, "Daily_Demand_Est"), "");
    assert_eq!(field(&rows, 2, "Reorder_Point"), "");
    assert_eq!(field(&rows, 2, "Stock_Status"), "Out of Stock");
}

#[test]
fn missing_demand_policy_is_configurable() {
    let temp = tempdir().expect("temp dir");
    let input = temp.path().join("dirty.csv");
    let mut rows: Vec<[&str; 9]> = vec![[
        "SKU-C3001",
        "Food",
        "10.0",
        "25",
        "",
        "5",
        "Hokkaido Foods",
        "4",
        "x",
    ]];
    rows.push(rows[0]);
    write_rows(&input, &common::RAW_HEADERS, &rows);

    let conservative = temp.path().join("low.csv");
    run_clean(&input, &conservative, &[]);
    let (_, out) = read_output(&conservative);
    assert_eq!(field(&out, 0, "Reorder_Point"), "");
    assert_eq!(field(&out, 0, "Stock_Status"), "Low Stock");

    let source_like = temp.path().join("normal.csv");
    run_clean(&input, &source_like, &["--missing-demand", "normal-stock"]);
    let (_, out) = read_output(&source_like);
    assert_eq!(field(&out, 0, "Stock_Status"), "Normal Stock");

    let substituted = temp.path().join("zero.csv");
    run_clean(&input, &substituted, &["--missing-demand", "zero-demand"]);
    let (_, out) = read_output(&substituted);
    assert_eq!(numeric(&out, 0, "Reorder_Point"), 5.0);
    assert_eq!(field(&out, 0, "Stock_Status"), "Normal Stock");
}

#[test]
fn missing_required_column_is_fatal_and_leaves_no_output() {
    let temp = tempdir().expect("temp dir");
    let input = temp.path().join("dirty.csv");
    let output = temp.path().join("clean.csv");
    let headers = [
        "Product_ID",
        "Category",
        "Unit_Cost_Raw",
        "Daily_Demand_Est",
        "Safety_Stock_Target",
        "Vendor_Name",
        "Lead_Time_Days",
    ];
    let rows: Vec<[&str; 7]> = vec![[
        "SKU-A1001",
        "Home",
        "10",
        "2",
        "5",
        "Kyoto Crafts",
        "4",
    ]];
    write_rows(&input, &headers, &rows);

    clean_cmd()
        .args([
            "clean",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(contains("Current_Stock_Raw"));
    assert!(!output.exists(), "no partial output is written");
}

#[test]
fn unreadable_input_is_fatal() {
    let temp = tempdir().expect("temp dir");
    let output = temp.path().join("clean.csv");
    clean_cmd()
        .args([
            "clean",
            "-i",
            temp.path().join("missing.csv").to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(contains("missing.csv"));
    assert!(!output.exists());
}
