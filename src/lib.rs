pub mod cli;
pub mod coerce;
pub mod extract;
pub mod generate;
pub mod io_utils;
pub mod pipeline;
pub mod record;
pub mod stats;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::{
    cli::{CleanArgs, Cli, Commands},
    extract::RawTable,
    pipeline::{CleanOptions, CleanReport},
    record::{CleanRecord, OUTPUT_COLUMNS},
    stats::{Descriptive, Distribution},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("inventory_etl", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Clean(args) => handle_clean(&args),
        Commands::Generate(args) => generate::execute(&args),
    }
}

fn handle_clean(args: &CleanArgs) -> Result<()> {
    let input_delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let input_encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let output_delimiter = io_utils::resolve_output_delimiter(
        &args.output,
        args.output_delimiter,
        input_delimiter,
    );

    info!("Loading '{}'", args.input.display());
    let raw = RawTable::load(&args.input, input_delimiter, input_encoding)
        .with_context(|| format!("Extracting raw table from {:?}", args.input))?;
    info!(
        "Raw table: {} row(s), {} column(s): {}",
        raw.rows.len(),
        raw.headers.len(),
        raw.headers.join(", ")
    );

    let options = CleanOptions {
        missing_demand: args.missing_demand,
    };
    let (cleaned, report) = pipeline::clean(raw.rows, &options);

    let mut writer = io_utils::AtomicCsvWriter::create(&args.output, output_delimiter)?;
    writer.write_record(OUTPUT_COLUMNS)?;
    for record in &cleaned {
        writer.serialize(record)?;
    }
    writer.commit()?;
    info!(
        "Cleaned table: {} row(s), {} column(s) written to {:?}",
        cleaned.len(),
        OUTPUT_COLUMNS.len(),
        args.output
    );

    log_summary(&cleaned, &report);
    Ok(())
}

/// Console data-quality summary. Observational only; never part of the data
/// contract.
fn log_summary(records: &[CleanRecord], report: &CleanReport) {
    info!(
        "Categories: {} -> {} distinct ({})",
        report.categories_before,
        report.categories_after,
        report.categories.join(", ")
    );
    info!(
        "Product IDs and vendors trimmed ({} whitespace character(s) removed, {} distinct vendor(s))",
        report.whitespace_trimmed, report.distinct_vendors
    );
    info!(
        "Costs: {} parsed, {} unparseable, {} imputed from category/global medians",
        report.costs_parsed, report.costs_unparseable, report.costs_imputed
    );
    info!(
        "Stock: {} negative value(s) corrected to 0, {} missing value(s) filled as 0",
        report.negative_stock_corrected, report.null_stock_filled
    );
    if report.lead_time_corrected > 0 {
        info!(
            "Lead times: {} value(s) raised to the 1-day minimum",
            report.lead_time_corrected
        );
    }

    let mut categories = Distribution::new();
    let mut statuses = Distribution::new();
    let mut cost_stats = Descriptive::new("Unit_Cost");
    let mut stock_stats = Descriptive::new("Current_Stock");
    let mut total_value = 0.0;
    for record in records {
        categories.add(record.category.clone());
        statuses.add(record.stock_status.label());
        cost_stats.add(record.unit_cost);
        stock_stats.add(record.current_stock);
        total_value += record.inventory_value;
    }

    let frequency_headers = vec![
        "value".to_string(),
        "count".to_string(),
        "percent".to_string(),
    ];
    println!("\nCategory distribution:");
    table::print_table(&frequency_headers, &categories.render_rows());
    println!("\nStock status distribution:");
    table::print_table(&frequency_headers, &statuses.render_rows());

    let stats_headers = vec![
        "column".to_string(),
        "count".to_string(),
        "min".to_string(),
        "max".to_string(),
        "mean".to_string(),
        "median".to_string(),
        "std_dev".to_string(),
    ];
    println!("\nNumeric summary:");
    table::print_table(
        &stats_headers,
        &[cost_stats.render_row(), stock_stats.render_row()],
    );
    println!();

    info!("Total inventory value: ${total_value:.2}");
}
