//! CSV export of report rows with the fixed report header.

use csv::WriterBuilder;
use std::io::Write;

use super::register::DATE_FORMAT;
use super::schedule::ReportRow;
use crate::DepreciationResult;

pub const REPORT_HEADERS: [&str; 9] = [
    "Item No",
    "Purchase Date",
    "Cost",
    "Carcass Value",
    "Life Years",
    "Year",
    "Depreciation",
    "Remaining Amount",
    "Last Depreciation Date",
];

impl ReportRow {
    /// Fields in report column order. Charges are printed with two decimals.
    pub fn to_record(&self) -> [String; 9] {
        [
            self.item_no.clone(),
            self.purchase_date.format(DATE_FORMAT).to_string(),
            self.cost.to_string(),
            self.carcass_value.to_string(),
            self.life_years.to_string(),
            self.year.to_string(),
            format!("{:.2}", self.depreciation),
            format!("{:.2}", self.remaining_amount),
            self.last_depreciation_date.format(DATE_FORMAT).to_string(),
        ]
    }
}

/// Write the header followed by one record per row.
pub fn write_report<W: Write>(writer: W, rows: &[ReportRow]) -> DepreciationResult<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(REPORT_HEADERS)?;
    for row in rows {
        wtr.write_record(row.to_record())?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed_assets::asset::Asset;
    use crate::fixed_assets::schedule::calculate_depreciation;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_writes_header_and_rows() {
        let asset = Asset::new(
            "A001",
            "FA",
            NaiveDate::from_ymd_opt(2020, 1, 1),
            dec!(10000),
            dec!(1000),
            5,
        );
        let rows = calculate_depreciation(&asset);

        let mut buf = Vec::new();
        write_report(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(
            lines[0],
            "Item No,Purchase Date,Cost,Carcass Value,Life Years,Year,Depreciation,Remaining Amount,Last Depreciation Date"
        );
        assert_eq!(lines[1], "A001,2020-01-01,10000,1000,5,2020,1800.00,8200.00,2020-12-31");
        assert_eq!(lines[5], "A001,2020-01-01,10000,1000,5,2024,1800.00,1000.00,2024-12-31");
    }

    #[test]
    fn test_empty_rows_write_only_header() {
        let mut buf = Vec::new();
        write_report(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().lines().count(), 1);
    }
}
