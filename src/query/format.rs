//! Result rendering for the `formatted` response field.

use crate::db::{QueryResult, Value};
use crate::models::OutputFormat;

/// Renders a result set in the requested format.
pub fn format_result(result: &QueryResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => format_table(result),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Json => format_json(result),
    }
}

fn format_table(result: &QueryResult) -> String {
    let headers = result.column_names();
    let cells: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| row.iter().map(Value::to_display_string).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let render_line = |values: &[String]| {
        values
            .iter()
            .zip(&widths)
            .map(|(value, &width)| format!("{value:<width$}"))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(cells.len() + 3);
    if !headers.is_empty() {
        lines.push(render_line(&headers));
        lines.push(
            widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-"),
        );
    }
    lines.extend(cells.iter().map(|row| render_line(row)));

    let noun = if result.row_count == 1 { "row" } else { "rows" };
    lines.push(format!("({} {noun})", result.row_count));
    lines.join("\n")
}

fn format_csv(result: &QueryResult) -> String {
    let mut lines = vec![result
        .column_names()
        .iter()
        .map(|h| csv_field(h))
        .collect::<Vec<_>>()
        .join(",")];

    for row in &result.rows {
        let fields: Vec<String> = row
            .iter()
            .map(|value| match value {
                Value::Null => String::new(),
                other => csv_field(&other.to_display_string()),
            })
            .collect();
        lines.push(fields.join(","));
    }

    lines.join("\n")
}

/// Quotes a field when it contains a delimiter, quote or line break.
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn format_json(result: &QueryResult) -> String {
    let names = result.column_names();
    let objects: Vec<serde_json::Map<String, serde_json::Value>> = result
        .rows
        .iter()
        .map(|row| {
            names
                .iter()
                .cloned()
                .zip(row.iter().map(|v| serde_json::to_value(v).unwrap_or_default()))
                .collect()
        })
        .collect();

    serde_json::to_string_pretty(&objects).unwrap_or_default()
}
