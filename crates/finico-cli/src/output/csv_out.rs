use serde_json::Value;
use std::io;

use super::format_scalar;
use super::series::{is_series_key, primary_series};

/// Write output as CSV to stdout.
///
/// Results with a per-period series (projection months, yearly bands, loan
/// schedule, solver trace) are written one row per period; anything else is
/// written as `field,value` pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .and_then(Value::as_object);

    match result {
        Some(result) => {
            if let Some(series) = primary_series(result) {
                let _ = wtr.write_record(&series.headers);
                for row in &series.rows {
                    let _ = wtr.write_record(row.iter().map(csv_value));
                }
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in result.iter().filter(|(k, _)| !is_series_key(k)) {
                    let _ = wtr.write_record([key.as_str(), &csv_value(val)]);
                }
            }
        }
        None => {
            let _ = wtr.write_record([format_scalar(value)]);
        }
    }

    let _ = wtr.flush();
}

/// Full precision for numbers so CSV exports can be re-analysed.
fn csv_value(value: &Value) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        other => format_scalar(other),
    }
}
