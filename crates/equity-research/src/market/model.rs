//! Market data types shared by the gateway, peer filter and analyst stages

use serde::{Serialize, Serializer};
use std::fmt;

/// Placeholder used wherever a value is not available
pub const NOT_AVAILABLE: &str = "N/A";

/// A numeric metric that may be missing upstream
///
/// Missing is distinct from zero and serializes as `"N/A"`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Metric {
    Value(f64),
    #[default]
    NotAvailable,
}

impl Metric {
    /// Finite values become `Value`, everything else `NotAvailable`
    pub fn from_option(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Self::Value(v),
            _ => Self::NotAvailable,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::NotAvailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Value(_))
    }
}

impl From<Option<f64>> for Metric {
    fn from(value: Option<f64>) -> Self {
        Self::from_option(value)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => serializer.serialize_f64(*v),
            Self::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

/// Render an optional text field, `N/A` when absent
pub fn text_or_na(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_AVAILABLE)
}

/// Provider quote fields, every one optional
///
/// This is the loosely-shaped upstream payload reduced to named fields; the
/// resolution rules that turn it into a [`MarketSnapshot`] live on that type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawQuoteInfo {
    pub current_price: Option<f64>,
    pub regular_market_price: Option<f64>,
    pub long_name: Option<String>,
    pub short_name: Option<String>,
    pub currency: Option<String>,
    pub market_cap: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub forward_pe: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub beta: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub long_business_summary: Option<String>,
    pub revenue_growth: Option<f64>,
    pub profit_margins: Option<f64>,
}

/// Resolved quote for a ticker with a usable price
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSnapshot {
    pub ticker: String,
    pub company_name: String,
    pub current_price: f64,
    pub currency: String,
    pub market_cap: Metric,
    pub pe_ratio: Metric,
    pub forward_pe: Metric,
    pub peg_ratio: Metric,
    pub beta: Metric,
    #[serde(rename = "52w_high")]
    pub fifty_two_week_high: Metric,
    #[serde(rename = "52w_low")]
    pub fifty_two_week_low: Metric,
    pub revenue_growth: Metric,
    pub profit_margins: Metric,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
}

impl MarketSnapshot {
    /// Price resolution: current price, then regular market price
    ///
    /// Zero and non-finite prices count as absent.
    pub fn resolve_price(info: &RawQuoteInfo) -> Option<f64> {
        let usable = |p: &f64| p.is_finite() && *p != 0.0;
        info.current_price
            .filter(usable)
            .or_else(|| info.regular_market_price.filter(usable))
    }

    /// Company name resolution: long name, then short name, then the ticker
    pub fn resolve_company_name(info: &RawQuoteInfo, ticker: &str) -> String {
        non_blank(info.long_name.as_deref())
            .or_else(|| non_blank(info.short_name.as_deref()))
            .unwrap_or(ticker)
            .to_string()
    }

    /// Build a snapshot, or `None` when no usable price exists
    pub fn from_info(ticker: &str, info: &RawQuoteInfo) -> Option<Self> {
        let current_price = Self::resolve_price(info)?;

        Some(Self {
            ticker: ticker.to_string(),
            company_name: Self::resolve_company_name(info, ticker),
            current_price,
            currency: non_blank(info.currency.as_deref())
                .unwrap_or("USD")
                .to_string(),
            market_cap: info.market_cap.into(),
            pe_ratio: info.trailing_pe.into(),
            forward_pe: info.forward_pe.into(),
            peg_ratio: info.peg_ratio.into(),
            beta: info.beta.into(),
            fifty_two_week_high: info.fifty_two_week_high.into(),
            fifty_two_week_low: info.fifty_two_week_low.into(),
            revenue_growth: info.revenue_growth.into(),
            profit_margins: info.profit_margins.into(),
            sector: non_blank(info.sector.as_deref()).map(str::to_string),
            industry: non_blank(info.industry.as_deref()).map(str::to_string),
            website: non_blank(info.website.as_deref()).map(str::to_string),
            description: non_blank(info.long_business_summary.as_deref()).map(str::to_string),
        })
    }

    /// Sector when known
    pub fn known_sector(&self) -> Option<&str> {
        self.sector.as_deref().filter(|s| *s != NOT_AVAILABLE)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Outcome of a market data lookup
///
/// `Unavailable` is the error record: no usable price or an upstream failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MarketData {
    Available(MarketSnapshot),
    Unavailable { error: String },
}

impl MarketData {
    /// Resolve a payload into a snapshot or the "Price not found" record
    pub fn from_info(ticker: &str, info: &RawQuoteInfo) -> Self {
        match MarketSnapshot::from_info(ticker, info) {
            Some(snapshot) => Self::Available(snapshot),
            None => Self::unavailable("Price not found"),
        }
    }

    pub fn unavailable(error: impl Into<String>) -> Self {
        Self::Unavailable {
            error: error.into(),
        }
    }

    pub fn snapshot(&self) -> Option<&MarketSnapshot> {
        match self {
            Self::Available(snapshot) => Some(snapshot),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Available(_) => None,
            Self::Unavailable { error } => Some(error),
        }
    }
}

/// Up to three recent periods per statement, as display-ready tables
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FinancialStatements {
    pub income_statement: String,
    pub balance_sheet: String,
    pub cash_flow: String,
}

impl FinancialStatements {
    /// All three statements set to the `N/A` placeholder
    pub fn not_available() -> Self {
        Self {
            income_statement: NOT_AVAILABLE.to_string(),
            balance_sheet: NOT_AVAILABLE.to_string(),
            cash_flow: NOT_AVAILABLE.to_string(),
        }
    }

    /// True for the degraded bundle, where nothing was fetched
    pub fn is_empty(&self) -> bool {
        self.income_statement.is_empty()
            && self.balance_sheet.is_empty()
            && self.cash_flow.is_empty()
    }
}

/// One news headline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsItem {
    pub title: String,
    pub publisher: String,
    pub link: String,
    pub publish_time: String,
}

/// Comparable metrics for a validated peer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeerRecord {
    #[serde(skip)]
    pub ticker: String,
    pub company_name: String,
    pub price: f64,
    pub market_cap: Metric,
    pub pe_ratio: Metric,
    pub fwd_pe: Metric,
    pub revenue_growth: Metric,
    pub profit_margins: Metric,
}

impl From<&MarketSnapshot> for PeerRecord {
    fn from(snapshot: &MarketSnapshot) -> Self {
        Self {
            ticker: snapshot.ticker.clone(),
            company_name: snapshot.company_name.clone(),
            price: snapshot.current_price,
            market_cap: snapshot.market_cap,
            pe_ratio: snapshot.pe_ratio,
            fwd_pe: snapshot.forward_pe,
            revenue_growth: snapshot.revenue_growth,
            profit_margins: snapshot.profit_margins,
        }
    }
}
