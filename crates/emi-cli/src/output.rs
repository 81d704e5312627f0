//! Output formatting for computation envelopes.
//!
//! Every command returns the core `ComputationOutput` envelope serialized to
//! JSON; the formatters here render it as pretty JSON, a table, CSV, or the
//! single headline figure.

use serde_json::Value;
use std::io;
use tabled::{builder::Builder, Table};

use crate::OutputFormat;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => print_table(value),
        OutputFormat::Csv => print_csv(value),
        OutputFormat::Minimal => print_minimal(value),
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

fn print_table(value: &Value) {
    let Some(envelope) = value.as_object() else {
        println!("{}", value);
        return;
    };

    match envelope.get("result") {
        Some(Value::Object(result)) => {
            // Schedule and sensitivity outputs carry a "rows" array; print it
            // as a column table after the scalar summary fields.
            let scalars: Vec<(&String, &Value)> = result
                .iter()
                .filter(|(k, v)| k.as_str() != "rows" && !v.is_array() && !v.is_object())
                .collect();
            if !scalars.is_empty() {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                for (key, val) in &scalars {
                    builder.push_record([key.as_str(), &scalar_string(val)]);
                }
                println!("{}", Table::from(builder));
            }

            if let Some(Value::Object(formatted)) = result.get("formatted") {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                for (key, val) in formatted {
                    builder.push_record([key.as_str(), &scalar_string(val)]);
                }
                println!("{}", Table::from(builder));
            }

            if let Some(Value::Array(rows)) = result.get("rows") {
                print_row_table(rows);
            }
        }
        _ => {
            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            for (key, val) in envelope {
                builder.push_record([key.as_str(), &scalar_string(val)]);
            }
            println!("{}", Table::from(builder));
        }
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(methodology)) = envelope.get("methodology") {
        println!("\nMethodology: {}", methodology);
    }
}

fn print_row_table(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        println!("(empty)");
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);

    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| map.get(h).map(scalar_string).unwrap_or_default())
                .collect();
            builder.push_record(record);
        }
    }

    println!("{}", Table::from(builder));
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => {
            if let Some(Value::Array(rows)) = map.get("rows") {
                write_rows_csv(&mut wtr, rows);
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    if !val.is_array() && !val.is_object() {
                        let _ = wtr.write_record([key.as_str(), &scalar_string(val)]);
                    }
                }
            }
        }
        other => {
            let _ = wtr.write_record([scalar_string(other)]);
        }
    }

    let _ = wtr.flush();
}

fn write_rows_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(scalar_string).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&record);
        }
    }
}

// ---------------------------------------------------------------------------
// Minimal
// ---------------------------------------------------------------------------

/// Print just the headline figure: the formatted monthly installment where
/// present, otherwise the first scalar field of the result.
fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(Value::String(installment)) = result
        .as_object()
        .and_then(|m| m.get("formatted"))
        .and_then(|f| f.get("monthly_installment"))
    {
        println!("{}", installment);
        return;
    }

    if let Some(Value::String(installment)) = result
        .as_object()
        .and_then(|m| m.get("monthly_installment"))
    {
        println!("{}", installment);
        return;
    }

    if let Some(map) = result.as_object() {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, scalar_string(val));
            return;
        }
    }

    println!("{}", scalar_string(result));
}

fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}
