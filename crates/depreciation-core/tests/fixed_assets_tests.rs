use chrono::NaiveDate;
use depreciation_core::fixed_assets::asset::Asset;
use depreciation_core::fixed_assets::export::write_report;
use depreciation_core::fixed_assets::register::{read_register, RegisterPolicy};
use depreciation_core::fixed_assets::report::{build_report, generate_report, ReportFilter};
use depreciation_core::fixed_assets::schedule::{calculate_depreciation, depreciation_schedule};
use depreciation_core::DepreciationError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

const REGISTER: &str = "\
Item No,Item Type,Purchase Date,Cost,Carcass Value,Life Years
A001,FA,2020-01-01,10000,1000,5
A002,EQ,2021-05-01,5000,500,3
A004,FA,2022-03-15,15000,2000,6
A005,FA,2018-09-30,2500.50,100.50,4
";

// ===========================================================================
// Scheduling properties
// ===========================================================================

#[test]
fn test_full_schedule_depreciates_cost_less_carcass() {
    let assets = vec![
        Asset::new("A001", "FA", Some(date(2020, 1, 1)), dec!(10000), dec!(1000), 5),
        Asset::new("A004", "FA", Some(date(2022, 3, 15)), dec!(15000), dec!(2000), 6),
        Asset::new("A005", "FA", Some(date(2018, 9, 30)), dec!(2500.50), dec!(100.50), 4),
        Asset::new("A006", "FA", Some(date(2019, 2, 1)), dec!(999.99), dec!(0), 7),
        Asset::new("A007", "FA", Some(date(2015, 1, 1)), dec!(1), dec!(0), 3),
    ];

    for asset in &assets {
        let schedule = depreciation_schedule(asset).unwrap();
        let depreciable = asset.cost - asset.carcass_value;
        // Each row is rounded to the cent, so allow half a cent per row.
        let tolerance = dec!(0.005) * Decimal::from(schedule.rows.len() as u64);
        let total = schedule.total_depreciation().unwrap();
        assert!(
            (total - depreciable).abs() <= tolerance,
            "{}: depreciated {} of {}",
            asset.item_no,
            total,
            depreciable
        );
        assert!(schedule.rows.len() <= asset.life_years as usize);
        assert_eq!(schedule.closing.remaining_amount, asset.carcass_value);
        assert_eq!(
            schedule.rows.last().map(|r| r.remaining_amount),
            Some(asset.carcass_value)
        );
    }
}

#[test]
fn test_remaining_amount_never_increases_or_undershoots() {
    let asset = Asset::new("A006", "FA", Some(date(2019, 2, 1)), dec!(999.99), dec!(12.34), 7);
    let rows = calculate_depreciation(&asset);
    assert_eq!(rows.len(), 7);
    for pair in rows.windows(2) {
        assert!(pair[1].remaining_amount <= pair[0].remaining_amount);
    }
    assert!(rows.iter().all(|r| r.remaining_amount >= dec!(12.34)));
}

#[test]
fn test_reference_scenario_a001() {
    let asset = Asset::new("A001", "FA", Some(date(2020, 1, 1)), dec!(10000), dec!(1000), 5);
    let rows = calculate_depreciation(&asset);

    let summary: Vec<(i32, Decimal, Decimal)> = rows
        .iter()
        .map(|r| (r.year, r.depreciation, r.remaining_amount))
        .collect();
    assert_eq!(
        summary,
        vec![
            (2020, dec!(1800.00), dec!(8200.00)),
            (2021, dec!(1800.00), dec!(6400.00)),
            (2022, dec!(1800.00), dec!(4600.00)),
            (2023, dec!(1800.00), dec!(2800.00)),
            (2024, dec!(1800.00), dec!(1000.00)),
        ]
    );
    assert_eq!(rows[4].last_depreciation_date, date(2024, 12, 31));
}

#[test]
fn test_reference_scenario_missing_purchase_date() {
    let asset = Asset::new("A003", "FA", None, dec!(8000), dec!(800), 4);
    assert!(calculate_depreciation(&asset).is_empty());
    let reason = depreciation_schedule(&asset).unwrap_err();
    assert_eq!(reason.to_string(), "Missing purchase date for item A003.");
}

#[test]
fn test_non_fixed_asset_yields_no_rows() {
    let asset = Asset::new("A002", "EQ", Some(date(2021, 5, 1)), dec!(5000), dec!(500), 3);
    assert!(calculate_depreciation(&asset).is_empty());
}

// ===========================================================================
// Register -> report -> CSV pipeline
// ===========================================================================

#[test]
fn test_pipeline_from_register_to_csv() {
    let register = read_register(REGISTER.as_bytes(), RegisterPolicy::Strict).unwrap();
    assert_eq!(register.assets.len(), 3);
    assert_eq!(register.skipped.len(), 1);

    let output = build_report(&register.assets, &ReportFilter::default()).unwrap();
    let report = output.result;
    assert_eq!(report.summary.assets_scheduled, 3);
    assert_eq!(report.rows.len(), 5 + 6 + 4);

    let mut buf = Vec::new();
    write_report(&mut buf, &report.rows).unwrap();
    let csv = String::from_utf8(buf).unwrap();
    assert_eq!(csv.lines().count(), 1 + report.rows.len());
    assert!(csv.contains("A005,2018-09-30,2500.50,100.50,4,2018,600.00,1900.50,2018-12-31"));
}

#[test]
fn test_item_filter_through_pipeline() {
    let register = read_register(REGISTER.as_bytes(), RegisterPolicy::Strict).unwrap();
    let filter = ReportFilter::default().with_item_no(" a004 ");
    let rows = generate_report(&register.assets, &filter);

    assert_eq!(rows.len(), 6);
    assert!(rows.iter().all(|r| r.item_no == "A004"));
    assert_eq!(rows.first().map(|r| r.year), Some(2022));
    assert_eq!(rows.last().map(|r| r.year), Some(2027));
}

#[test]
fn test_date_range_through_pipeline() {
    let register = read_register(REGISTER.as_bytes(), RegisterPolicy::Strict).unwrap();
    let filter = ReportFilter::default()
        .with_purchase_date_range(Some(date(2022, 1, 1)), Some(date(2023, 12, 31)));
    let rows = generate_report(&register.assets, &filter);

    assert!(!rows.is_empty());
    assert!(rows.iter().all(|r| r.item_no == "A004"));
}

#[test]
fn test_no_matching_data_is_distinct_from_error() {
    let register = read_register(REGISTER.as_bytes(), RegisterPolicy::Strict).unwrap();
    let filter = ReportFilter::default().with_item_no("Z999");
    let output = build_report(&register.assets, &filter).unwrap();
    assert!(output.result.is_empty());
    assert_eq!(output.result.summary.assets_filtered, 3);
}

#[test]
fn test_malformed_register_aborts_before_any_report() {
    let body = format!("{REGISTER}A009,FA,2020-01-01,abc,0,2\n");
    let err = read_register(body.as_bytes(), RegisterPolicy::Strict).unwrap_err();
    assert!(matches!(err, DepreciationError::MalformedRecord { line: 6, .. }));
}
