pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Scalar fields of a result object as `(key, value)` pairs, with nested
/// objects spelled `parent.child`. Arrays are left to the caller.
pub(crate) fn flatten_fields(map: &Map<String, Value>) -> Vec<(String, Value)> {
    let mut fields = Vec::new();
    collect(map, None, &mut fields);
    fields
}

fn collect(map: &Map<String, Value>, prefix: Option<&str>, out: &mut Vec<(String, Value)>) {
    for (key, val) in map {
        let name = match prefix {
            Some(p) => format!("{p}.{key}"),
            None => key.clone(),
        };
        match val {
            Value::Object(inner) => collect(inner, Some(&name), out),
            Value::Array(_) => {}
            _ => out.push((name, val.clone())),
        }
    }
}

/// First array-of-rows inside a result object (the `loans` of a batch).
pub(crate) fn row_array(map: &Map<String, Value>) -> Option<&[Value]> {
    map.values().find_map(|v| match v {
        Value::Array(arr) => Some(arr.as_slice()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_breakdown() {
        let value = json!({
            "monthly_payment": "933.33",
            "breakdown": { "monthly_capital": "833.33", "monthly_interest": "100.00" }
        });
        let fields = flatten_fields(value.as_object().unwrap());
        let keys: Vec<&str> = fields.iter().map(|(k, _)| k.as_str()).collect();
        assert!(keys.contains(&"breakdown.monthly_capital"));
        assert!(keys.contains(&"monthly_payment"));
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn test_row_array_found() {
        let value = json!({ "succeeded": 1, "failed": 0, "loans": [{ "id": "a" }] });
        let rows = row_array(value.as_object().unwrap()).unwrap();
        assert_eq!(rows.len(), 1);
    }
}
