//! Straight-line depreciation of fixed assets.
//!
//! Assets flow linearly through the module: an asset register is parsed
//! into [`asset::Asset`] values, each asset is checked for eligibility,
//! the survivors of the report filters are scheduled year by year, and the
//! resulting rows are concatenated into a single ordered report.

pub mod asset;
pub mod export;
pub mod register;
pub mod report;
pub mod schedule;
pub mod validation;
