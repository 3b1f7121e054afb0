use std::path::Path;

use csv::WriterBuilder;

pub const RAW_HEADERS: [&str; 9] = [
    "Product_ID",
    "Category",
    "Unit_Cost_Raw",
    "Current_Stock_Raw",
    "Daily_Demand_Est",
    "Safety_Stock_Target",
    "Vendor_Name",
    "Lead_Time_Days",
    "Notes",
];

/// Writes a dirty fixture covering the interesting raw encodings: whitespace
/// identifiers, mixed category casing, currency-coded costs, unit-suffixed
/// and negative stock, missing values, a sub-minimum lead time, an extra
/// column, and one exact duplicate row.
pub fn write_dirty_fixture(path: &Path) {
    let rows: Vec<[&str; 9]> = vec![
        [
            " SKU-A1001 ",
            "ELECTRONICS",
            "$123.45",
            "150 pcs",
            "10",
            "50",
            " Tokyo Electronics ",
            "7",
            "a",
        ],
        [
            "SKU-A1002",
            "electronics ",
            "USD 80.00",
            "-30",
            "5",
            "20",
            "Tokyo Electronics",
            "0",
            "b",
        ],
        [
            "SKU-A1003",
            "Electronics",
            "1,200.00",
            "",
            "",
            "30",
            "Osaka Supplies",
            "3",
            "c",
        ],
        [
            "SKU-B2001",
            "HOME",
            "Quote Pending",
            "40",
            "2",
            "10",
            "Kyoto Crafts",
            "5",
            "d",
        ],
        [
            "SKU-B2002",
            "home",
            "42.5",
            "40",
            "2",
            "10",
            "Kyoto Crafts",
            "5",
            "e",
        ],
        [
            "SKU-B2002",
            "home",
            "42.5",
            "40",
            "2",
            "10",
            "Kyoto Crafts",
            "5",
            "e",
        ],
    ];
    write_rows(path, &RAW_HEADERS, &rows);
}

pub fn write_rows<const N: usize>(path: &Path, headers: &[&str; N], rows: &[[&str; N]]) {
    let mut writer = WriterBuilder::new().from_path(path).expect("create fixture");
    writer.write_record(headers).expect("write header");
    for row in rows {
        writer.write_record(row).expect("write row");
    }
    writer.flush().expect("flush fixture");
}

pub fn read_output(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .expect("open output");
    let headers = reader
        .headers()
        .expect("headers")
        .iter()
        .map(|h| h.to_string())
        .collect();
    let rows = reader
        .records()
        .map(|record| {
            record
                .expect("record")
                .iter()
                .map(|field| field.to_string())
                .collect()
        })
        .collect();
    (headers, rows)
}
