//! Asset register reader.
//!
//! The register is a CSV file with a header row followed by one asset per
//! record. Columns are positional:
//!
//! ```text
//! item_no, item_type, purchase_date, cost, carcass_value, life_years[, last_depreciation_date, remaining_amount]
//! ```
//!
//! Dates are `YYYY-MM-DD`. Every field is trimmed. A record is checked in
//! this order: column count, item number, purchase date, type code, then
//! the numeric columns. Rows that are not fixed assets are skipped before
//! their amounts are parsed, so a non-`FA` row with a bad amount is still
//! just skipped. A blank purchase date or an unparsable value on an `FA` row
//! is an input error that aborts the batch unless
//! [`RegisterPolicy::SkipMalformed`] is selected.

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Read;
use tracing::{debug, info, warn};

use super::asset::{Asset, FIXED_ASSET_TYPE};
use super::validation::{validate, Ineligibility};
use crate::error::DepreciationError;
use crate::types::Money;
use crate::DepreciationResult;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const REQUIRED_COLUMNS: usize = 6;
const MAX_COLUMNS: usize = 8;

/// What to do with a record that cannot be coerced into an asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegisterPolicy {
    /// Abort the whole batch on the first bad record.
    #[default]
    Strict,
    /// Skip bad records, keeping the reason.
    SkipMalformed,
}

/// A register record that did not become an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    pub line: u64,
    pub item_no: String,
    pub reason: String,
}

/// Parsed asset register.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Register {
    pub assets: Vec<Asset>,
    pub skipped: Vec<SkippedRecord>,
}

/// Read a register from CSV. The first record is treated as a header.
pub fn read_register<R: Read>(reader: R, policy: RegisterPolicy) -> DepreciationResult<Register> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut register = Register::default();

    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let item_no = record.get(0).unwrap_or_default().to_string();

        let parsed = match parse_record(&record, line) {
            Ok(parsed) => parsed,
            Err(err) if policy == RegisterPolicy::SkipMalformed => {
                warn!(line, item_no = %item_no, error = %err, "skipping malformed register record");
                register.skipped.push(SkippedRecord {
                    line,
                    item_no,
                    reason: err.to_string(),
                });
                continue;
            }
            Err(err) => return Err(err),
        };

        match parsed.and_then(|asset| validate(&asset).map(|()| asset)) {
            Ok(asset) => {
                debug!(line, item_no = %asset.item_no, "register record accepted");
                register.assets.push(asset);
            }
            Err(reason) => {
                info!(line, item_no = %reason.item_no(), %reason, "register record skipped");
                register.skipped.push(SkippedRecord {
                    line,
                    item_no: reason.item_no().to_string(),
                    reason: reason.to_string(),
                });
            }
        }
    }

    debug!(
        assets = register.assets.len(),
        skipped = register.skipped.len(),
        "register read"
    );
    Ok(register)
}

/// Coerce one record. The inner `Err` is a well-formed record that is not a
/// fixed asset; its amounts are never parsed.
fn parse_record(
    record: &StringRecord,
    line: u64,
) -> DepreciationResult<Result<Asset, Ineligibility>> {
    if record.len() < REQUIRED_COLUMNS || record.len() > MAX_COLUMNS {
        return Err(DepreciationError::MalformedRecord {
            line,
            reason: format!(
                "expected {REQUIRED_COLUMNS} to {MAX_COLUMNS} columns, found {}",
                record.len()
            ),
        });
    }
    let field = |idx: usize| record.get(idx).unwrap_or_default();

    let item_no = field(0);
    if item_no.is_empty() {
        return Err(DepreciationError::MalformedRecord {
            line,
            reason: "item_no is empty".into(),
        });
    }

    let purchase_date = field(2);
    if purchase_date.is_empty() {
        return Err(DepreciationError::MissingPurchaseDate {
            item_no: item_no.to_string(),
        });
    }
    let purchase_date = parse_date(purchase_date, "purchase_date", line)?;

    let item_type = field(1);
    if item_type != FIXED_ASSET_TYPE {
        return Ok(Err(Ineligibility::NotFixedAsset {
            item_no: item_no.to_string(),
            item_type: item_type.to_string(),
        }));
    }

    let mut asset = Asset::new(
        item_no,
        item_type,
        Some(purchase_date),
        parse_money(field(3), "cost", line)?,
        parse_money(field(4), "carcass_value", line)?,
        parse_life(field(5), line)?,
    );

    let last_depreciation_date = field(6);
    if !last_depreciation_date.is_empty() {
        asset.last_depreciation_date =
            Some(parse_date(last_depreciation_date, "last_depreciation_date", line)?);
    }
    let remaining_amount = field(7);
    if !remaining_amount.is_empty() {
        asset.remaining_amount = Some(parse_money(remaining_amount, "remaining_amount", line)?);
    }

    Ok(Ok(asset))
}

pub fn parse_date(value: &str, field: &str, line: u64) -> DepreciationResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| DepreciationError::MalformedRecord {
        line,
        reason: format!("{field} '{value}' is not a YYYY-MM-DD date: {e}"),
    })
}

fn parse_money(value: &str, field: &str, line: u64) -> DepreciationResult<Money> {
    value
        .parse::<Decimal>()
        .map_err(|e| DepreciationError::MalformedRecord {
            line,
            reason: format!("{field} '{value}' is not a number: {e}"),
        })
}

fn parse_life(value: &str, line: u64) -> DepreciationResult<u32> {
    value.parse::<u32>().map_err(|e| DepreciationError::MalformedRecord {
        line,
        reason: format!("life_years '{value}' is not a whole number of years: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    const HEADER: &str = "Item No,Item Type,Purchase Date,Cost,Carcass Value,Life Years\n";

    fn read(body: &str, policy: RegisterPolicy) -> DepreciationResult<Register> {
        read_register(format!("{HEADER}{body}").as_bytes(), policy)
    }

    #[test]
    fn test_reads_fixed_assets_and_skips_others() {
        let register = read(
            "A001,FA,2020-01-01,10000,1000,5\n\
             A002,EQ,2021-05-01,5000,500,3\n\
             A004, FA ,2022-03-15,15000.00,2000,6\n",
            RegisterPolicy::Strict,
        )
        .unwrap();

        let ids: Vec<&str> = register.assets.iter().map(|a| a.item_no.as_str()).collect();
        assert_eq!(ids, vec!["A001", "A004"]);
        assert_eq!(register.assets[1].item_type, "FA");
        assert_eq!(register.assets[1].cost, dec!(15000));
        assert_eq!(
            register.skipped,
            vec![SkippedRecord {
                line: 3,
                item_no: "A002".into(),
                reason: "Skipping item A002: Not a Fixed Asset (FA).".into(),
            }]
        );
    }

    #[test]
    fn test_blank_purchase_date_aborts_batch() {
        let err = read(
            "A001,FA,2020-01-01,10000,1000,5\nA003,FA,,8000,800,4\n",
            RegisterPolicy::Strict,
        )
        .unwrap_err();
        assert!(matches!(err, DepreciationError::MissingPurchaseDate { ref item_no } if item_no == "A003"));
        assert_eq!(err.to_string(), "Missing purchase date for item A003.");
    }

    #[test]
    fn test_malformed_value_aborts_in_strict_mode() {
        let err = read("A001,FA,2020-01-01,ten thousand,1000,5\n", RegisterPolicy::Strict)
            .unwrap_err();
        assert!(matches!(err, DepreciationError::MalformedRecord { line: 2, .. }));

        let err = read("A001,FA,01/01/2020,10000,1000,5\n", RegisterPolicy::Strict).unwrap_err();
        assert!(err.to_string().contains("purchase_date"));

        let err = read("A001,FA,2020-01-01,10000,1000,-5\n", RegisterPolicy::Strict).unwrap_err();
        assert!(err.to_string().contains("life_years"));
    }

    #[test]
    fn test_non_fixed_asset_is_skipped_before_amounts_are_parsed() {
        let register = read(
            "A001,FA,2020-01-01,10000,1000,5
             A002,EQ,2021-05-01,n/a,500,three
",
            RegisterPolicy::Strict,
        )
        .unwrap();

        assert_eq!(register.assets.len(), 1);
        assert_eq!(
            register.skipped,
            vec![SkippedRecord {
                line: 3,
                item_no: "A002".into(),
                reason: "Skipping item A002: Not a Fixed Asset (FA).".into(),
            }]
        );
    }

    #[test]
    fn test_blank_date_on_non_fixed_asset_still_aborts() {
        let err = read("A002,EQ,,5000,500,3
", RegisterPolicy::Strict).unwrap_err();
        assert!(matches!(err, DepreciationError::MissingPurchaseDate { .. }));
    }

    #[test]
    fn test_wrong_column_count_is_malformed() {
        let err = read("A001,FA,2020-01-01,10000\n", RegisterPolicy::Strict).unwrap_err();
        assert!(err.to_string().contains("columns"));
    }

    #[test]
    fn test_skip_malformed_policy_keeps_going() {
        let register = read(
            "A001,FA,2020-01-01,10000,1000,5\n\
             A003,FA,,8000,800,4\n\
             A005,FA,2021-02-30,100,0,1\n\
             A006,FA,2021-01-01,600,0,3\n",
            RegisterPolicy::SkipMalformed,
        )
        .unwrap();

        let ids: Vec<&str> = register.assets.iter().map(|a| a.item_no.as_str()).collect();
        assert_eq!(ids, vec!["A001", "A006"]);
        let skipped: Vec<(u64, &str)> = register
            .skipped
            .iter()
            .map(|s| (s.line, s.item_no.as_str()))
            .collect();
        assert_eq!(skipped, vec![(3, "A003"), (4, "A005")]);
    }

    #[test]
    fn test_zero_life_is_skipped_as_ineligible() {
        let register = read("A007,FA,2020-01-01,1000,0,0\n", RegisterPolicy::Strict).unwrap();
        assert!(register.assets.is_empty());
        assert!(register.skipped[0].reason.contains("life years"));
    }

    #[test]
    fn test_optional_resume_columns() {
        let register = read_register(
            "item_no,item_type,purchase_date,cost,carcass_value,life_years,last_depreciation_date,remaining_amount\n\
             A001,FA,2020-01-01,10000,1000,5,2021-12-31,6400\n\
             A008,FA,2020-01-01,10000,1000,5,,\n"
                .as_bytes(),
            RegisterPolicy::Strict,
        )
        .unwrap();

        let resumed = &register.assets[0];
        assert_eq!(resumed.last_depreciation_date, NaiveDate::from_ymd_opt(2021, 12, 31));
        assert_eq!(resumed.remaining_amount, Some(dec!(6400)));

        let fresh = &register.assets[1];
        assert_eq!(fresh.last_depreciation_date, None);
        assert_eq!(fresh.remaining_amount, None);
    }

    #[test]
    fn test_header_only_register_is_empty() {
        let register = read("", RegisterPolicy::Strict).unwrap();
        assert_eq!(register, Register::default());
    }
}
