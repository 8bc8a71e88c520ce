//! Output formatting module.
//!
//! Provides formatters for plain text, JSON, and CSV output of scan reports.

mod csv_format;
mod json_format;
mod plain;

pub use csv_format::{print_csv, write_csv};
pub use json_format::{print_json, write_json};
pub use plain::{
    print_error, print_info, print_plain, print_scan_header, print_warning, write_plain,
    ConsoleObserver,
};

use crate::cli::OutputFormat;
use crate::scanner::ScanReport;
use std::io;

/// Format and print scan results according to the specified format.
pub fn print_results(report: &ScanReport, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Plain => print_plain(report),
        OutputFormat::Json => print_json(report),
        OutputFormat::Csv => print_csv(report),
    }
}
