//! Output formatting module.
//!
//! Provides formatters for plain text, JSON, and CSV output of scan results.

mod csv_format;
mod json_format;
mod plain;

pub use csv_format::{print_csv, write_csv};
pub use json_format::{print_json, write_json, write_json_file};
pub use plain::{print_error, print_info, print_plain, print_warning, render_summary};

use crate::results::ScanResultSet;
use std::io;

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Plain,
    /// JSON structured output
    Json,
    /// CSV format for data analysis
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Format and print scan results according to the specified format.
pub fn print_results(set: &ScanResultSet, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Plain => print_plain(set),
        OutputFormat::Json => print_json(set),
        OutputFormat::Csv => print_csv(set),
    }
}
