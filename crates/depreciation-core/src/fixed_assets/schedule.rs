//! Year-by-year straight-line depreciation schedule for a single asset.
//!
//! The annual charge is `(cost - carcass_value) / life_years`, computed once.
//! Starting in the calendar year of the last depreciation date, one row is
//! produced per year until either `life_years` rows exist or the book value
//! reaches the carcass value. The final charge is capped so the book value
//! never undershoots the floor.
//!
//! The asset itself is never mutated: the schedule is computed from the
//! asset's opening state and the closing state is returned alongside the
//! rows, so scheduling the same asset twice yields the same result.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::asset::{Asset, AssetState};
use super::validation::{validate, Ineligibility};
use crate::error::DepreciationError;
use crate::types::{round_money, Money};
use crate::DepreciationResult;

/// Residue above the carcass value that is folded into the current year's
/// charge instead of being left on the books.
const SETTLEMENT_DUST: Decimal = dec!(0.000000001);

/// One line of the depreciation report: a single asset in a single year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub item_no: String,
    pub purchase_date: NaiveDate,
    pub cost: Money,
    pub carcass_value: Money,
    pub life_years: u32,
    /// Calendar year being depreciated
    pub year: i32,
    /// Depreciation charged in `year`, rounded to cents
    pub depreciation: Money,
    /// Book value after this year's charge, rounded to cents
    pub remaining_amount: Money,
    /// Year-end cutoff (December 31 of `year`)
    pub last_depreciation_date: NaiveDate,
}

/// The full schedule of one asset together with its closing book state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSchedule {
    pub item_no: String,
    /// Unrounded constant annual charge
    pub annual_depreciation: Money,
    pub rows: Vec<ReportRow>,
    /// Unrounded book state after the last emitted row
    pub closing: AssetState,
}

impl AssetSchedule {
    /// Sum of the reported charges; `None` if it leaves the `Decimal` range.
    pub fn total_depreciation(&self) -> Option<Money> {
        checked_total(&self.rows)
    }
}

/// Overflow-checked sum of the rounded yearly charges of `rows`.
pub fn checked_total(rows: &[ReportRow]) -> Option<Money> {
    rows.iter()
        .try_fold(Money::ZERO, |acc, row| acc.checked_add(row.depreciation))
}

/// Constant annual straight-line charge for `asset`.
pub fn straight_line_depreciation(asset: &Asset) -> DepreciationResult<Money> {
    if asset.life_years == 0 {
        return Err(DepreciationError::DivisionByZero {
            context: format!("straight-line depreciation of item {}", asset.item_no),
        });
    }
    Ok((asset.cost - asset.carcass_value) / Decimal::from(asset.life_years))
}

/// Build the schedule of `asset`, or explain why it is not depreciable.
pub fn depreciation_schedule(asset: &Asset) -> Result<AssetSchedule, Ineligibility> {
    validate(asset)?;

    let Some(purchase_date) = asset.purchase_date else {
        return Err(Ineligibility::MissingPurchaseDate {
            item_no: asset.item_no.clone(),
        });
    };
    let annual = straight_line_depreciation(asset).map_err(|_| Ineligibility::DegenerateLife {
        item_no: asset.item_no.clone(),
    })?;

    let opening = asset.opening_state();
    let start_year = opening
        .last_depreciation_date
        .unwrap_or(purchase_date)
        .year();

    let mut remaining = opening.remaining_amount;
    let mut last_depreciation_date = opening.last_depreciation_date;
    let mut rows = Vec::new();

    for year in (start_year..).take(asset.life_years as usize) {
        if remaining <= asset.carcass_value {
            break;
        }
        let Some(year_end) = NaiveDate::from_ymd_opt(year, 12, 31) else {
            warn!(item_no = %asset.item_no, year, "year out of calendar range, schedule truncated");
            break;
        };

        let mut amount = annual.min(remaining - asset.carcass_value);
        remaining -= amount;

        let residue = remaining - asset.carcass_value;
        if residue < SETTLEMENT_DUST {
            amount += residue;
            remaining = asset.carcass_value;
        }

        last_depreciation_date = Some(year_end);
        rows.push(ReportRow {
            item_no: asset.item_no.clone(),
            purchase_date,
            cost: asset.cost,
            carcass_value: asset.carcass_value,
            life_years: asset.life_years,
            year,
            depreciation: round_money(amount),
            remaining_amount: round_money(remaining),
            last_depreciation_date: year_end,
        });
    }

    debug!(
        item_no = %asset.item_no,
        %annual,
        rows = rows.len(),
        closing = %remaining,
        "asset scheduled"
    );

    Ok(AssetSchedule {
        item_no: asset.item_no.clone(),
        annual_depreciation: annual,
        rows,
        closing: AssetState {
            remaining_amount: remaining,
            last_depreciation_date,
        },
    })
}

/// Report rows for `asset`; empty when the asset is not depreciable.
pub fn calculate_depreciation(asset: &Asset) -> Vec<ReportRow> {
    match depreciation_schedule(asset) {
        Ok(schedule) => schedule.rows,
        Err(reason) => {
            info!(item_no = %asset.item_no, %reason, "asset not scheduled");
            Vec::new()
        }
    }
}
