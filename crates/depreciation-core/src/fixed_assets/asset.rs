use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::Money;

/// Category code of the only asset type eligible for depreciation.
pub const FIXED_ASSET_TYPE: &str = "FA";

/// A single depreciable item from the asset register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Register identifier (e.g. "A001")
    pub item_no: String,
    /// Category code; only "FA" is depreciated
    pub item_type: String,
    /// Acquisition date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<NaiveDate>,
    /// Original acquisition value
    pub cost: Money,
    /// Residual (salvage) value the book value never goes below
    pub carcass_value: Money,
    /// Number of annual depreciation periods
    pub life_years: u32,
    /// Date through which depreciation has already been applied.
    /// Defaults to the purchase date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_depreciation_date: Option<NaiveDate>,
    /// Undepreciated book value carried into the schedule.
    /// Defaults to the cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_amount: Option<Money>,
}

/// Book state of an asset at a point of its schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetState {
    pub remaining_amount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_depreciation_date: Option<NaiveDate>,
}

impl Asset {
    /// A freshly acquired asset with no depreciation applied yet.
    pub fn new(
        item_no: impl Into<String>,
        item_type: impl Into<String>,
        purchase_date: Option<NaiveDate>,
        cost: Money,
        carcass_value: Money,
        life_years: u32,
    ) -> Self {
        Self {
            item_no: item_no.into(),
            item_type: item_type.into(),
            purchase_date,
            cost,
            carcass_value,
            life_years,
            last_depreciation_date: None,
            remaining_amount: None,
        }
    }

    /// Resume from a previous run: depreciation has been applied through
    /// `last_depreciation_date`, leaving `remaining_amount` on the books.
    pub fn with_prior_depreciation(
        mut self,
        last_depreciation_date: NaiveDate,
        remaining_amount: Money,
    ) -> Self {
        self.last_depreciation_date = Some(last_depreciation_date);
        self.remaining_amount = Some(remaining_amount);
        self
    }

    pub fn is_fixed_asset(&self) -> bool {
        self.item_type == FIXED_ASSET_TYPE
    }

    /// State the schedule starts from.
    pub fn opening_state(&self) -> AssetState {
        AssetState {
            remaining_amount: self.remaining_amount.unwrap_or(self.cost),
            last_depreciation_date: self.last_depreciation_date.or(self.purchase_date),
        }
    }
}
