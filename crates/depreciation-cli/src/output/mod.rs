//! Rendering of command results on stdout.
//!
//! Every command returns a JSON envelope (`result`, `warnings`,
//! `methodology`, ...). Depreciation rows are the exception for CSV: they go
//! through the library's report writer so stdout matches the `--out` file.

pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use clap::ValueEnum;
use depreciation_core::fixed_assets::schedule::ReportRow;
use serde_json::Value;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

pub fn format_output(format: OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => match report_rows(value) {
            Some(rows) => csv_out::print_report_csv(&rows),
            None => csv_out::print_csv(value),
        },
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The depreciation rows of a `report` or `schedule` result, if present.
fn report_rows(value: &Value) -> Option<Vec<ReportRow>> {
    let rows = value.get("result")?.get("rows")?;
    serde_json::from_value(rows.clone()).ok()
}
