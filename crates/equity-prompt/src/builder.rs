//! Data block assembly
//!
//! Analyst templates interpolate pre-formatted blocks of market data, peer
//! comparisons and headlines. [`PromptBuilder`] produces those blocks with a
//! consistent layout so every template sees the same shape of input.

use std::fmt::{Display, Write};

/// Builds one plain-text data block
///
/// The output of [`build`](Self::build) is always trimmed.
///
/// # Examples
///
/// ```
/// use equity_prompt::PromptBuilder;
///
/// let block = PromptBuilder::new()
///     .field("Current Price", "150 USD")
///     .field("Sector", "Technology")
///     .list(["MSFT: P/E=35.1"], "No peers.")
///     .build();
///
/// assert!(block.contains("Current Price: 150 USD"));
/// assert!(block.ends_with("- MSFT: P/E=35.1"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    buf: String,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `Key: value` line
    pub fn field(mut self, key: &str, value: impl Display) -> Self {
        let _ = writeln!(self.buf, "{key}: {value}");
        self
    }

    /// Append a titled block, using `fallback` when `body` is blank
    ///
    /// Consecutive sections are separated by a blank line.
    pub fn section(mut self, title: &str, body: &str, fallback: &str) -> Self {
        if !self.buf.is_empty() && !self.buf.ends_with("\n\n") {
            self.buf.push_str(if self.buf.ends_with('\n') { "\n" } else { "\n\n" });
        }
        let body = if body.trim().is_empty() { fallback } else { body.trim_end() };
        let _ = writeln!(self.buf, "{title}:\n{body}");
        self
    }

    /// Append one `- item` line per entry, or `empty` when there are none
    pub fn list<I>(mut self, items: I, empty: &str) -> Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let start = self.buf.len();
        for item in items {
            let _ = writeln!(self.buf, "- {item}");
        }
        if self.buf.len() == start {
            self.buf.push_str(empty);
            self.buf.push('\n');
        }
        self
    }

    pub fn build(self) -> String {
        self.buf.trim().to_string()
    }
}
