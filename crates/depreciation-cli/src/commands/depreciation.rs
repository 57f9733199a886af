use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::time::Instant;
use tracing::info;

use depreciation_core::fixed_assets::asset::{Asset, FIXED_ASSET_TYPE};
use depreciation_core::fixed_assets::export::write_report;
use depreciation_core::fixed_assets::register::{self, Register, RegisterPolicy, SkippedRecord};
use depreciation_core::fixed_assets::report::{self, ReportFilter, NO_DATA_MESSAGE};
use depreciation_core::fixed_assets::schedule;
use depreciation_core::fixed_assets::validation::validate;
use depreciation_core::with_metadata;

use crate::input;

/// The filters left nothing to report. Not a failure, but no file is written.
#[derive(Debug)]
pub struct NoData;

impl fmt::Display for NoData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(NO_DATA_MESSAGE)
    }
}

impl std::error::Error for NoData {}

/// Where the asset population comes from
#[derive(Args)]
pub struct AssetSource {
    /// Path to CSV asset register (header row, then one asset per line)
    #[arg(long)]
    pub register: Option<String>,

    /// Path to JSON or YAML list of assets
    #[arg(long, conflicts_with = "register")]
    pub input: Option<String>,

    /// Skip malformed register rows instead of rejecting the whole register
    #[arg(long)]
    pub skip_malformed: bool,
}

/// Arguments for the depreciation report
#[derive(Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub source: AssetSource,

    /// Only report this item number (case-insensitive)
    #[arg(long)]
    pub item_no: Option<String>,

    /// Only report assets purchased on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Only report assets purchased on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    /// Write the report as CSV to this path
    #[arg(long)]
    pub out: Option<String>,
}

/// Arguments for a single asset schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Item number
    #[arg(long, default_value = "ASSET")]
    pub item_no: String,

    /// Item type code; only FA is depreciated
    #[arg(long, default_value = FIXED_ASSET_TYPE)]
    pub item_type: String,

    /// Purchase date (YYYY-MM-DD)
    #[arg(long)]
    pub purchase_date: Option<NaiveDate>,

    /// Acquisition cost
    #[arg(long)]
    pub cost: Option<Decimal>,

    /// Carcass (salvage) value
    #[arg(long)]
    pub carcass_value: Option<Decimal>,

    /// Useful life in years
    #[arg(long)]
    pub life_years: Option<u32>,

    /// Date through which depreciation was already applied
    #[arg(long)]
    pub last_depreciation_date: Option<NaiveDate>,

    /// Book value left after previous depreciation
    #[arg(long)]
    pub remaining_amount: Option<Decimal>,

    /// Path to JSON or YAML asset (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for register validation
#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub source: AssetSource,
}

pub fn run_report(args: ReportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let register = load_assets(&args.source)?;

    let mut filter = ReportFilter {
        item_no: args.item_no.clone(),
        purchase_date_range: None,
    };
    if args.start_date.is_some() || args.end_date.is_some() {
        filter = filter.with_purchase_date_range(args.start_date, args.end_date);
    }

    let mut output = report::build_report(&register.assets, &filter)?;
    if output.result.is_empty() {
        return Err(NoData.into());
    }
    output.warnings = register_warnings(&register, &filter)
        .into_iter()
        .chain(output.warnings)
        .collect();

    if let Some(ref path) = args.out {
        let file = File::create(path).map_err(|e| format!("Failed to create '{}': {}", path, e))?;
        write_report(BufWriter::new(file), &output.result.rows)?;
        info!(path = %path, rows = output.result.rows.len(), "report written");
    }

    let mut value = serde_json::to_value(&output)?;
    if let (Some(path), Some(result)) = (
        &args.out,
        value.get_mut("result").and_then(Value::as_object_mut),
    ) {
        result.insert("report_path".into(), Value::String(path.clone()));
    }
    Ok(value)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let asset: Asset = if let Some(ref path) = args.input {
        input::file::read_structured(path)?
    } else {
        let mut asset = Asset::new(
            args.item_no,
            args.item_type,
            args.purchase_date,
            args.cost.ok_or("--cost is required (or --input <file>)")?,
            args.carcass_value.unwrap_or(Decimal::ZERO),
            args.life_years
                .ok_or("--life-years is required (or --input <file>)")?,
        );
        asset.last_depreciation_date = args.last_depreciation_date;
        asset.remaining_amount = args.remaining_amount;
        asset
    };

    let start = Instant::now();
    let result = schedule::depreciation_schedule(&asset)?;
    let elapsed = start.elapsed().as_micros() as u64;

    let output = with_metadata(
        "Straight-line depreciation to carcass value, year-end cutoff",
        &asset,
        Vec::new(),
        elapsed,
        result,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_validate(args: ValidateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let register = load_assets(&args.source)?;
    let accepted: Vec<&str> = register.assets.iter().map(|a| a.item_no.as_str()).collect();

    Ok(json!({
        "result": {
            "accepted": accepted,
            "skipped": register.skipped,
        },
        "warnings": register.skipped.iter().map(describe_skip).collect::<Vec<_>>(),
    }))
}

/// Load assets from a CSV register, a JSON/YAML asset list, or piped CSV.
/// Ineligible assets are moved to `skipped` in every case.
fn load_assets(source: &AssetSource) -> Result<Register, Box<dyn std::error::Error>> {
    let policy = if source.skip_malformed {
        RegisterPolicy::SkipMalformed
    } else {
        RegisterPolicy::Strict
    };

    if let Some(ref path) = source.register {
        return Ok(register::read_register(input::file::open(path)?, policy)?);
    }
    if let Some(ref path) = source.input {
        let assets: Vec<Asset> = input::file::read_structured(path)?;
        return Ok(partition_eligible(assets));
    }
    if let Some(text) = input::stdin::read_stdin()? {
        return Ok(register::read_register(text.as_bytes(), policy)?);
    }
    Err("--register <file.csv>, --input <file.json|yaml> or a CSV register on stdin required".into())
}

fn partition_eligible(assets: Vec<Asset>) -> Register {
    let mut register = Register::default();
    for (idx, asset) in assets.into_iter().enumerate() {
        match validate(&asset) {
            Ok(()) => register.assets.push(asset),
            Err(reason) => {
                info!(item_no = %asset.item_no, %reason, "asset skipped");
                register.skipped.push(SkippedRecord {
                    line: idx as u64 + 1,
                    item_no: asset.item_no,
                    reason: reason.to_string(),
                });
            }
        }
    }
    register
}

/// Register-level skips that concern the filtered report. Records for other
/// item numbers are left out when an item filter is set.
fn register_warnings(register: &Register, filter: &ReportFilter) -> Vec<String> {
    register
        .skipped
        .iter()
        .filter(|skip| filter.admits_item_no(&skip.item_no))
        .map(describe_skip)
        .collect()
}

fn describe_skip(skip: &SkippedRecord) -> String {
    format!("register line {}: {}", skip.line, skip.reason)
}
