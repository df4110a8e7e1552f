use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::format_scalar;
use super::series::{is_series_key, primary_series, Series};

/// Longest series printed in full; longer ones show head and tail.
const MAX_TABLE_ROWS: usize = 40;

/// Format output as tables: a summary of scalar fields, then the series.
pub fn print_table(value: &Value) {
    let Some(envelope) = value.as_object() else {
        println!("{}", value);
        return;
    };
    let Some(Value::Object(result)) = envelope.get("result") else {
        print_fields(envelope);
        return;
    };

    print_fields(result);
    if let Some(series) = primary_series(result) {
        println!();
        print_series(&series);
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }
    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map.iter().filter(|(k, _)| !is_series_key(k)) {
        builder.push_record([key.as_str(), &format_field(val)]);
    }
    println!("{}", Table::from(builder));
}

fn format_field(value: &Value) -> String {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{k}={}", format_scalar(v)))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Array(arr) => format!("[{} values]", arr.len()),
        other => format_scalar(other),
    }
}

fn print_series(series: &Series) {
    let mut builder = Builder::default();
    builder.push_record(series.headers.iter().cloned());

    let total = series.rows.len();
    let elided = total > MAX_TABLE_ROWS;
    let head = if elided { MAX_TABLE_ROWS / 2 } else { total };
    for row in &series.rows[..head] {
        builder.push_record(row.iter().map(format_scalar));
    }
    if elided {
        let padding = series.headers.len().saturating_sub(1);
        builder.push_record(
            std::iter::once(format!("... {} rows ...", total - MAX_TABLE_ROWS))
                .chain(std::iter::repeat(String::new()).take(padding)),
        );
        for row in &series.rows[total - MAX_TABLE_ROWS / 2..] {
            builder.push_record(row.iter().map(format_scalar));
        }
    }
    println!("{}", Table::from(builder));
}
