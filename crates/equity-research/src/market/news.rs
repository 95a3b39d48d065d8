//! News feed normalisation
//!
//! Provider news entries come in two shapes: a legacy flat object and a newer
//! one wrapped in `content`. Every field has its own fallback chain so a
//! single odd entry degrades per field instead of dropping the batch.

use super::model::{NOT_AVAILABLE, NewsItem};
use chrono::DateTime;
use serde_json::Value;

const UNKNOWN_PUBLISHER: &str = "Unknown";

/// Take at most `cap` entries in provider order and normalise each
pub fn extract_news(entries: &[Value], cap: usize) -> Vec<NewsItem> {
    entries.iter().take(cap).map(parse_news_entry).collect()
}

/// Normalise a single provider entry
pub fn parse_news_entry(entry: &Value) -> NewsItem {
    let content = entry
        .get("content")
        .filter(|c| c.is_object())
        .unwrap_or(entry);

    NewsItem {
        title: resolve_title(content),
        publisher: resolve_publisher(content),
        link: resolve_link(content),
        publish_time: resolve_publish_date(content),
    }
}

fn resolve_title(content: &Value) -> String {
    content
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

/// `provider.displayName`, a stringified non-object provider, the legacy
/// `publisher` field, then "Unknown"
fn resolve_publisher(content: &Value) -> String {
    match content.get("provider") {
        Some(Value::Object(provider)) => provider
            .get("displayName")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_PUBLISHER)
            .to_string(),
        Some(Value::Null) | None => content
            .get("publisher")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_PUBLISHER)
            .to_string(),
        Some(other) => stringify(other),
    }
}

/// `clickThroughUrl.url`, a stringified non-object value, top-level `link`,
/// then "N/A"
fn resolve_link(content: &Value) -> String {
    let click_through = match content.get("clickThroughUrl") {
        Some(Value::Object(url)) => url.get("url").and_then(Value::as_str).map(str::to_string),
        Some(Value::Null) | None => None,
        Some(other) => Some(stringify(other)),
    };

    click_through
        .filter(|link| link != NOT_AVAILABLE)
        .or_else(|| content.get("link").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// `pubDate` as given, `providerPublishTime` (unix seconds) as `YYYY-MM-DD`,
/// then "N/A"
fn resolve_publish_date(content: &Value) -> String {
    if let Some(date) = content.get("pubDate").and_then(Value::as_str) {
        return date.to_string();
    }

    content
        .get("providerPublishTime")
        .and_then(Value::as_i64)
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .map_or_else(
            || NOT_AVAILABLE.to_string(),
            |dt| dt.format("%Y-%m-%d").to_string(),
        )
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
