use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about = "Clean supply-chain inventory CSV datasets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Clean a dirty inventory CSV into an analysis-ready dataset
    Clean(CleanArgs),
    /// Generate a synthetic dirty inventory dataset
    Generate(GenerateArgs),
}

#[derive(Debug, Args)]
pub struct CleanArgs {
    /// Input CSV file with the raw inventory columns ('-' reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Destination CSV file for the cleaned dataset
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
    /// CSV delimiter character for reading input (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Delimiter to use for output (defaults to input delimiter)
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Stock status rule for rows whose reorder point cannot be computed
    #[arg(long = "missing-demand", value_enum, default_value = "low-stock")]
    pub missing_demand: MissingDemandPolicy,
}

/// How to classify stock status when `Daily_Demand_Est` is missing and the
/// reorder point is therefore indeterminate.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum MissingDemandPolicy {
    /// Treat an indeterminate reorder point as below threshold (conservative)
    LowStock,
    /// Treat an indeterminate reorder point as satisfied
    NormalStock,
    /// Substitute zero demand into the reorder point formula
    ZeroDemand,
}

impl Default for MissingDemandPolicy {
    fn default() -> Self {
        MissingDemandPolicy::LowStock
    }
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Destination CSV file for the dirty dataset
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
    /// Number of base rows to generate (before duplicates)
    #[arg(long, default_value_t = 10_000)]
    pub rows: usize,
    /// Deterministic RNG seed
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
    /// Number of duplicate rows to append after generation
    #[arg(long, default_value_t = 50)]
    pub duplicates: usize,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
