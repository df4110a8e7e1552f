use serde_json::{Map, Value};

/// A row-oriented view of the time series inside a result.
pub struct Series {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Extract the main per-period series of a result, if it has one.
///
/// Loan schedules and solver traces are already arrays of rows; projections
/// and Monte Carlo bands are stored column-wise and are zipped back together.
pub fn primary_series(result: &Map<String, Value>) -> Option<Series> {
    for key in ["schedule", "iterations"] {
        if let Some(Value::Array(rows)) = result.get(key) {
            if let Some(series) = rows_of_objects(rows) {
                return Some(series);
            }
        }
    }

    if let (Some(Value::Array(years)), Some(Value::Array(bands))) =
        (result.get("years"), result.get("yearly_percentiles"))
    {
        let mut headers = vec!["year".to_string()];
        if let Some(Value::Object(first)) = bands.first() {
            headers.extend(first.keys().cloned());
        }
        let rows = years
            .iter()
            .zip(bands)
            .map(|(year, band)| {
                let mut row = vec![year.clone()];
                if let Value::Object(map) = band {
                    row.extend(headers[1..].iter().map(|h| map.get(h).cloned().unwrap_or(Value::Null)));
                }
                row
            })
            .collect();
        return Some(Series { headers, rows });
    }

    if let (Some(Value::Array(months)), Some(Value::Array(nominal)), Some(Value::Array(real))) = (
        result.get("months"),
        result.get("balances_nominal"),
        result.get("balances_real"),
    ) {
        let rows = months
            .iter()
            .zip(nominal)
            .zip(real)
            .map(|((m, n), r)| vec![m.clone(), n.clone(), r.clone()])
            .collect();
        return Some(Series {
            headers: vec!["month".into(), "nominal".into(), "real".into()],
            rows,
        });
    }

    None
}

/// Keys that belong to the series rather than the scalar summary.
pub fn is_series_key(key: &str) -> bool {
    matches!(
        key,
        "schedule"
            | "iterations"
            | "years"
            | "yearly_percentiles"
            | "months"
            | "balances_nominal"
            | "balances_real"
    )
}

fn rows_of_objects(rows: &[Value]) -> Option<Series> {
    let Value::Object(first) = rows.first()? else {
        return None;
    };
    let headers: Vec<String> = first.keys().cloned().collect();
    let rows = rows
        .iter()
        .filter_map(|item| item.as_object())
        .map(|map| {
            headers
                .iter()
                .map(|h| map.get(h).cloned().unwrap_or(Value::Null))
                .collect()
        })
        .collect();
    Some(Series { headers, rows })
}
