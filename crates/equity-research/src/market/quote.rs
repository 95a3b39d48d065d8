//! Quote-summary payload to [`RawQuoteInfo`]
//!
//! The quote summary splits fields across modules (`financialData`, `price`,
//! `summaryDetail`, `defaultKeyStatistics`, `assetProfile`), and numbers come
//! wrapped as `{raw, fmt}`. Each field names the modules it is read from, in
//! order; the first usable value wins.

use super::model::RawQuoteInfo;
use serde_json::Value;

/// Modules requested from the quote-summary endpoint
pub const QUOTE_SUMMARY_MODULES: &[&str] = &[
    "price",
    "summaryDetail",
    "defaultKeyStatistics",
    "financialData",
    "assetProfile",
    "incomeStatementHistory",
    "balanceSheetHistory",
    "cashflowStatementHistory",
];

/// Extract the quote fields from one quote-summary result object
pub fn parse_quote_summary(result: &Value) -> RawQuoteInfo {
    RawQuoteInfo {
        current_price: first_number(result, &["financialData"], "currentPrice"),
        regular_market_price: first_number(result, &["price", "summaryDetail"], "regularMarketPrice"),
        long_name: first_text(result, &["price"], "longName"),
        short_name: first_text(result, &["price"], "shortName"),
        currency: first_text(result, &["price", "summaryDetail", "financialData"], "currency")
            .or_else(|| first_text(result, &["financialData"], "financialCurrency")),
        market_cap: first_number(result, &["price", "summaryDetail"], "marketCap"),
        trailing_pe: first_number(result, &["summaryDetail", "defaultKeyStatistics"], "trailingPE"),
        forward_pe: first_number(result, &["summaryDetail", "defaultKeyStatistics"], "forwardPE"),
        peg_ratio: first_number(result, &["defaultKeyStatistics", "summaryDetail"], "pegRatio"),
        beta: first_number(result, &["summaryDetail", "defaultKeyStatistics"], "beta"),
        fifty_two_week_high: first_number(result, &["summaryDetail"], "fiftyTwoWeekHigh"),
        fifty_two_week_low: first_number(result, &["summaryDetail"], "fiftyTwoWeekLow"),
        sector: first_text(result, &["assetProfile"], "sector"),
        industry: first_text(result, &["assetProfile"], "industry"),
        website: first_text(result, &["assetProfile"], "website"),
        long_business_summary: first_text(result, &["assetProfile"], "longBusinessSummary"),
        revenue_growth: first_number(result, &["financialData"], "revenueGrowth"),
        profit_margins: first_number(result, &["financialData", "defaultKeyStatistics"], "profitMargins"),
    }
}

fn first_number(result: &Value, modules: &[&str], field: &str) -> Option<f64> {
    modules
        .iter()
        .filter_map(|module| result.get(*module)?.get(field))
        .find_map(as_number)
}

fn first_text(result: &Value, modules: &[&str], field: &str) -> Option<String> {
    modules
        .iter()
        .filter_map(|module| result.get(*module)?.get(field))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// `{raw: n}` or a bare number; `{}`, strings like "Infinity" and nulls are absent
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Object(wrapped) => wrapped.get("raw").and_then(Value::as_f64),
        _ => None,
    }
    .filter(|n| n.is_finite())
}
