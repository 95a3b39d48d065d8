//! Financial statement tables
//!
//! Each statement arrives as a list of reporting periods, most recent first,
//! where every line item is a `{raw, fmt, longFmt}` object. The tables put
//! line items in rows and period end dates in columns.

use super::model::{FinancialStatements, NOT_AVAILABLE};
use comfy_table::{Table, presets::ASCII_MARKDOWN};
use serde_json::Value;

const SKIPPED_FIELDS: &[&str] = &["maxAge", "endDate"];

/// Render all three statements from a quote-summary result object
pub fn extract_statements(summary: &Value, periods: usize) -> FinancialStatements {
    FinancialStatements {
        income_statement: render_statement(
            summary.pointer("/incomeStatementHistory/incomeStatementHistory"),
            periods,
        ),
        balance_sheet: render_statement(
            summary.pointer("/balanceSheetHistory/balanceSheetStatements"),
            periods,
        ),
        cash_flow: render_statement(
            summary.pointer("/cashflowStatementHistory/cashflowStatements"),
            periods,
        ),
    }
}

/// Render up to `periods` columns, `N/A` when the statement is empty
pub fn render_statement(statement: Option<&Value>, periods: usize) -> String {
    let columns: Vec<&serde_json::Map<String, Value>> = statement
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(Value::as_object).take(periods).collect())
        .unwrap_or_default();

    let mut line_items: Vec<&str> = Vec::new();
    for column in &columns {
        for key in column.keys() {
            if !SKIPPED_FIELDS.contains(&key.as_str()) && !line_items.contains(&key.as_str()) {
                line_items.push(key);
            }
        }
    }

    if columns.is_empty() || line_items.is_empty() {
        return NOT_AVAILABLE.to_string();
    }

    let mut table = Table::new();
    table.load_preset(ASCII_MARKDOWN);

    let mut header = vec![String::new()];
    header.extend(columns.iter().map(|c| period_label(c.get("endDate"))));
    table.set_header(header);

    for item in line_items {
        let mut row = vec![item.to_string()];
        row.extend(columns.iter().map(|c| cell(c.get(item))));
        table.add_row(row);
    }

    table.to_string()
}

fn period_label(end_date: Option<&Value>) -> String {
    match end_date {
        Some(Value::Object(date)) => date
            .get("fmt")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| date.get("raw").map(ToString::to_string))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        Some(Value::String(date)) => date.clone(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Prefer the long formatted value, then the short one, then the raw number
fn cell(value: Option<&Value>) -> String {
    match value {
        Some(Value::Object(field)) => field
            .get("longFmt")
            .or_else(|| field.get("fmt"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| field.get("raw").map(ToString::to_string))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.clone(),
        _ => NOT_AVAILABLE.to_string(),
    }
}
