use depreciation_core::fixed_assets::export::write_report;
use depreciation_core::fixed_assets::schedule::ReportRow;
use serde_json::Value;
use std::io;

/// Write depreciation rows to stdout with the report header, exactly as
/// `report --out` writes them to a file.
pub fn print_report_csv(rows: &[ReportRow]) {
    if let Err(e) = write_report(io::stdout().lock(), rows) {
        tracing::error!(error = %e, "failed to write CSV report");
    }
}

/// Write output as CSV to stdout.
///
/// A result carrying `skipped` is written as one record per entry; any
/// other result becomes a two-column field/value listing.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            let result = map.get("result").unwrap_or(value);
            match result {
                Value::Object(res) => {
                    if let Some(Value::Array(skipped)) = res.get("skipped") {
                        write_array_csv(&mut wtr, skipped);
                    } else {
                        let _ = wtr.write_record(["field", "value"]);
                        for (key, val) in res {
                            let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                        }
                    }
                }
                other => {
                    let _ = wtr.write_record([&format_csv_value(other)]);
                }
            }
        }
        Value::Array(arr) => {
            write_array_csv(&mut wtr, arr);
        }
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    // Extract headers from first object
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
