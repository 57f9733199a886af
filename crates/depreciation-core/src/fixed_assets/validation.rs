//! Eligibility checks run before an asset is scheduled.
//!
//! An ineligible asset is not an error: it is excluded from the report and
//! the [`Ineligibility`] is kept as the diagnostic reason.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::asset::{Asset, FIXED_ASSET_TYPE};

/// Why an asset cannot be depreciated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Ineligibility {
    NotFixedAsset { item_no: String, item_type: String },
    MissingPurchaseDate { item_no: String },
    DegenerateLife { item_no: String },
    InvalidAmounts { item_no: String, reason: String },
}

impl Ineligibility {
    pub fn item_no(&self) -> &str {
        match self {
            Ineligibility::NotFixedAsset { item_no, .. }
            | Ineligibility::MissingPurchaseDate { item_no }
            | Ineligibility::DegenerateLife { item_no }
            | Ineligibility::InvalidAmounts { item_no, .. } => item_no,
        }
    }
}

impl fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ineligibility::NotFixedAsset { item_no, .. } => {
                write!(f, "Skipping item {item_no}: Not a Fixed Asset ({FIXED_ASSET_TYPE}).")
            }
            Ineligibility::MissingPurchaseDate { item_no } => {
                write!(f, "Missing purchase date for item {item_no}.")
            }
            Ineligibility::DegenerateLife { item_no } => {
                write!(f, "Skipping item {item_no}: life years must be greater than zero.")
            }
            Ineligibility::InvalidAmounts { item_no, reason } => {
                write!(f, "Skipping item {item_no}: {reason}.")
            }
        }
    }
}

impl std::error::Error for Ineligibility {}

/// Check that `asset` can be depreciated. The first failing rule wins.
pub fn validate(asset: &Asset) -> Result<(), Ineligibility> {
    if !asset.is_fixed_asset() {
        return Err(Ineligibility::NotFixedAsset {
            item_no: asset.item_no.clone(),
            item_type: asset.item_type.clone(),
        });
    }
    if asset.purchase_date.is_none() {
        return Err(Ineligibility::MissingPurchaseDate {
            item_no: asset.item_no.clone(),
        });
    }
    if asset.life_years == 0 {
        return Err(Ineligibility::DegenerateLife {
            item_no: asset.item_no.clone(),
        });
    }
    if asset.cost < Decimal::ZERO {
        return Err(invalid_amounts(asset, "cost cannot be negative"));
    }
    if asset.carcass_value < Decimal::ZERO {
        return Err(invalid_amounts(asset, "carcass value cannot be negative"));
    }
    if asset.carcass_value > asset.cost {
        return Err(invalid_amounts(asset, "carcass value exceeds cost"));
    }
    Ok(())
}

fn invalid_amounts(asset: &Asset, reason: &str) -> Ineligibility {
    Ineligibility::InvalidAmounts {
        item_no: asset.item_no.clone(),
        reason: reason.to_string(),
    }
}
