//! Report assembly: filter the asset population, schedule the survivors and
//! concatenate their rows in input order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

use super::asset::Asset;
use super::schedule::{checked_total, depreciation_schedule, ReportRow};
use crate::error::DepreciationError;
use crate::types::{with_metadata, ComputationOutput, DateRange, Money};
use crate::DepreciationResult;

/// Message shown when no asset produced a report row.
pub const NO_DATA_MESSAGE: &str = "No valid depreciation data available.";

/// Pre-generation filters. Both criteria are optional and independent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilter {
    /// Keep only this identifier (trimmed, case-insensitive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_no: Option<String>,
    /// Keep only assets purchased inside this window
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_date_range: Option<DateRange>,
}

impl ReportFilter {
    pub fn with_item_no(mut self, item_no: impl Into<String>) -> Self {
        self.item_no = Some(item_no.into());
        self
    }

    pub fn with_purchase_date_range(
        mut self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Self {
        self.purchase_date_range = Some(DateRange::new(start, end));
        self
    }

    /// The identifier filter, if it is non-empty after trimming.
    pub fn item_no_filter(&self) -> Option<&str> {
        self.item_no
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn validate(&self) -> DepreciationResult<()> {
        if let Some(DateRange {
            start: Some(start),
            end: Some(end),
        }) = self.purchase_date_range
        {
            if start > end {
                return Err(DepreciationError::InvalidInput {
                    field: "purchase_date_range".into(),
                    reason: format!("start date {start} is after end date {end}"),
                });
            }
        }
        Ok(())
    }

    /// Whether `item_no` passes the identifier filter. Always true when no
    /// identifier filter is set.
    pub fn admits_item_no(&self, item_no: &str) -> bool {
        self.item_no_filter()
            .map_or(true, |wanted| item_no.trim().to_lowercase() == wanted.to_lowercase())
    }

    /// Why `asset` is filtered out, or `None` when it passes.
    ///
    /// An asset without a purchase date is never excluded by the date
    /// window; it is left for the validator to reject.
    fn exclusion(&self, asset: &Asset) -> Option<String> {
        if !self.admits_item_no(&asset.item_no) {
            return self
                .item_no_filter()
                .map(|item_no| format!("doesn't match item filter ({item_no})"));
        }
        let (range, purchased) = (self.purchase_date_range?, asset.purchase_date?);
        if range.contains(purchased) {
            return None;
        }
        match (range.start, range.end) {
            (Some(start), _) if purchased < start => Some(format!("purchased before {start}")),
            (_, Some(end)) => Some(format!("purchased after {end}")),
            _ => None,
        }
    }
}

/// An asset that passed the filters but could not be depreciated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedAsset {
    pub item_no: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub assets_considered: usize,
    pub assets_filtered: usize,
    pub assets_scheduled: usize,
    pub assets_ineligible: usize,
    pub rows: usize,
    /// Sum of the reported (rounded) yearly charges
    pub total_depreciation: Money,
}

/// Ordered depreciation report: all rows of all scheduled assets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepreciationReport {
    pub summary: ReportSummary,
    pub rows: Vec<ReportRow>,
    pub skipped: Vec<SkippedAsset>,
}

impl DepreciationReport {
    /// True when nothing was scheduled: the "no data" outcome.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Report rows for every asset that passes `filter`, in input order.
pub fn generate_report(assets: &[Asset], filter: &ReportFilter) -> Vec<ReportRow> {
    assemble(assets, filter).rows
}

/// Validate `filter`, assemble the report and wrap it with metadata.
/// Ineligible assets surface as warnings. Fails if the report total does
/// not fit in a `Decimal`.
pub fn build_report(
    assets: &[Asset],
    filter: &ReportFilter,
) -> DepreciationResult<ComputationOutput<DepreciationReport>> {
    let start = Instant::now();
    filter.validate()?;

    let mut report = assemble(assets, filter);
    report.summary.total_depreciation =
        checked_total(&report.rows).ok_or_else(|| DepreciationError::InvalidInput {
            field: "total_depreciation".into(),
            reason: format!(
                "sum of {} yearly charges exceeds the representable range",
                report.rows.len()
            ),
        })?;
    let warnings = report.skipped.iter().map(|s| s.reason.clone()).collect();

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Straight-line depreciation to carcass value, year-end cutoff",
        filter,
        warnings,
        elapsed,
        report,
    ))
}

fn assemble(assets: &[Asset], filter: &ReportFilter) -> DepreciationReport {
    let mut report = DepreciationReport::default();
    report.summary.assets_considered = assets.len();

    for asset in assets {
        debug!(item_no = %asset.item_no, purchase_date = ?asset.purchase_date, "processing asset");

        if let Some(reason) = filter.exclusion(asset) {
            info!(item_no = %asset.item_no, %reason, "asset filtered out");
            report.summary.assets_filtered += 1;
            continue;
        }

        match depreciation_schedule(asset) {
            Ok(schedule) => {
                report.summary.assets_scheduled += 1;
                report.rows.extend(schedule.rows);
            }
            Err(reason) => {
                info!(item_no = %asset.item_no, %reason, "asset not scheduled");
                report.summary.assets_ineligible += 1;
                report.skipped.push(SkippedAsset {
                    item_no: reason.item_no().to_string(),
                    reason: reason.to_string(),
                });
            }
        }
    }

    report.summary.rows = report.rows.len();

    if report.is_empty() {
        info!("{}", NO_DATA_MESSAGE);
    }
    report
}
