//! Ticker extraction from free-form model output
//!
//! The model is asked for a comma-separated list but may answer with prose,
//! numbering, markdown or exchange names. Tokens made of letters, digits,
//! `.`, `-` and `^` are pulled out, then only those shaped like an uppercase
//! ticker survive.

use regex::Regex;
use std::sync::LazyLock;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9.\-^]+").expect("token pattern is valid"));

static TICKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\^?[A-Z0-9]+(?:[.\-][A-Z0-9]+)*$").expect("ticker pattern is valid")
});

/// Uppercase words that show up around tickers but are never one
const STOPWORDS: &[&str] = &[
    "ADR", "ADRS", "AMEX", "ARCA", "CEO", "EPS", "ETF", "HKEX", "I", "LSE", "NASDAQ", "NYSE",
    "OTC", "PE", "TSE", "TSX", "US", "USA", "USD", "XETRA",
];

/// Extract candidate tickers in first-seen order
///
/// Drops the target ticker, duplicates and stopwords, then truncates to
/// `cap`. Never fails; unparseable text yields an empty list.
pub fn parse_ticker_candidates(response: &str, target: &str, cap: usize) -> Vec<String> {
    let target = target.trim().to_uppercase();
    let mut candidates: Vec<String> = Vec::new();

    for token in TOKEN_RE.find_iter(response) {
        if candidates.len() >= cap {
            break;
        }
        let token = token.as_str().trim_matches(['.', '-']);
        if !is_ticker_shaped(token) {
            continue;
        }
        if token == target || STOPWORDS.contains(&token) {
            continue;
        }
        if candidates.iter().any(|c| c == token) {
            continue;
        }

        candidates.push(token.to_string());
    }

    candidates
}

/// Uppercase letters/digits with `.`/`-` separators, optional leading `^`,
/// and at least one letter
pub fn is_ticker_shaped(token: &str) -> bool {
    TICKER_RE.is_match(token) && token.chars().any(|c| c.is_ascii_uppercase())
}
