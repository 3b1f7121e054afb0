//! Synthetic dirty-dataset generator, the external data source for the
//! cleaning pipeline.
//!
//! All randomness flows through one explicitly seeded [`StdRng`], so the same
//! seed always produces the same file.

use anyhow::{Context, Result};
use log::info;
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::{
    cli::GenerateArgs,
    io_utils::{self, AtomicCsvWriter},
    record::REQUIRED_COLUMNS,
};

pub const CATEGORIES: [&str; 7] = [
    "Electronics",
    "Home",
    "Food",
    "Shipping",
    "Office",
    "Apparel",
    "Industrial",
];

const VENDORS: [&str; 7] = [
    "Tokyo Electronics",
    "Fukuoka Logistics",
    "Hokkaido Foods",
    "Kyoto Crafts",
    "Osaka Supplies",
    "Nagoya Parts",
    "Sapporo Steel",
];

const SKU_PREFIXES: [char; 6] = ['A', 'B', 'C', 'X', 'Y', 'Z'];

pub fn execute(args: &GenerateArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.output, args.delimiter);
    let mut rng = StdRng::seed_from_u64(args.seed);

    let mut rows = Vec::with_capacity(args.rows + args.duplicates);
    for _ in 0..args.rows {
        rows.push(generate_row(&mut rng));
    }

    // Sampled without replacement, appended verbatim: duplicates are a
    // passthrough property the cleaning side must preserve.
    let indexes = (0..rows.len()).collect::<Vec<_>>();
    let mut sampled = indexes
        .choose_multiple(&mut rng, args.duplicates.min(rows.len()))
        .map(|&index| rows[index].clone())
        .collect::<Vec<_>>();
    rows.append(&mut sampled);

    let mut writer = AtomicCsvWriter::create(&args.output, delimiter)
        .with_context(|| format!("Opening output {:?}", args.output))?;
    writer.write_record(REQUIRED_COLUMNS)?;
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.commit()?;

    info!(
        "Generated {} dirty row(s) (seed {}, {} duplicate(s)) -> {:?}",
        rows.len(),
        args.seed,
        args.duplicates.min(args.rows),
        args.output
    );
    Ok(())
}

fn generate_row(rng: &mut StdRng) -> Vec<String> {
    let prefix = *SKU_PREFIXES.choose(rng).expect("non-empty prefix list");
    let mut sku = format!("SKU-{prefix}{}", rng.gen_range(1000..=9999));
    let mut category = (*CATEGORIES.choose(rng).expect("non-empty category list")).to_string();
    let vendor = *VENDORS.choose(rng).expect("non-empty vendor list");

    let cost = rng.gen_range(5.0..500.0);
    let demand = rng.gen_range(1..=100i64);
    let safety_stock = (demand as f64 * rng.gen_range(7.0..14.0)) as i64;
    let stock = (demand as f64 * rng.gen_range(0.0..60.0)) as i64;
    let lead_time = rng.gen_range(3..=30i64);

    if rng.gen_range(0.0..1.0) < 0.1 {
        category = if rng.gen_range(0.0..1.0) < 0.5 {
            category.to_lowercase()
        } else {
            category.to_uppercase()
        };
    }
    if rng.gen_range(0.0..1.0) < 0.05 {
        sku = format!(" {sku} ");
    }

    let demand_field = if rng.gen_range(0.0..1.0) < 0.05 {
        String::new()
    } else {
        demand.to_string()
    };

    vec![
        sku,
        category,
        dirty_cost(rng, cost),
        dirty_stock(rng, stock),
        demand_field,
        safety_stock.to_string(),
        vendor.to_string(),
        lead_time.to_string(),
    ]
}

fn dirty_cost(rng: &mut StdRng, cost: f64) -> String {
    let r: f64 = rng.gen_range(0.0..1.0);
    if r < 0.05 {
        String::new()
    } else if r < 0.10 {
        format!("${cost:.2}")
    } else if r < 0.15 {
        format!("USD {cost:.2}")
    } else if cost > 1000.0 && r < 0.20 {
        group_thousands(cost)
    } else if r < 0.22 {
        "Quote Pending".to_string()
    } else {
        format!("{cost:.2}")
    }
}

fn dirty_stock(rng: &mut StdRng, stock: i64) -> String {
    let r: f64 = rng.gen_range(0.0..1.0);
    if r < 0.03 {
        (-stock).to_string()
    } else if r < 0.06 {
        String::new()
    } else if r < 0.10 {
        format!("{stock} pcs")
    } else {
        stock.to_string()
    }
}

/// Formats a cost with comma-grouped thousands, e.g. 1200.0 -> "1,200.00".
fn group_thousands(value: f64) -> String {
    let text = format!("{value:.2}");
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part.to_string(), frac_part.to_string()),
        None => (text, "00".to_string()),
    };
    let mut grouped = String::new();
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{grouped}.{frac_part}")
}
