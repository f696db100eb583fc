//! Canonical quote construction.
//!
//! `normalize` turns a partially-populated `RawQuoteFields` into a `Quote` by
//! resolving the current price and the reference price through independent
//! fallback tiers:
//!
//! - current price: direct last price, then the latest close of the history window;
//! - reference price: previous close, then session open, then the prior close of the
//!   history window.
//!
//! The percent change is always computed from the two values the `Quote` reports.
//! A zero or non-finite reference tier is skipped when a later tier resolves; when
//! none does, the record fails with `DivisionByZero` rather than
//! `MissingReferenceData`, so Infinity/NaN never reaches a `Quote`.

use log::warn;
use serde::Serialize;
use strum_macros::{Display, EnumString};

use crate::error::DashboardError;
use crate::raw::{RawQuoteFields, usable};
use crate::result::Result;
use crate::tickers::Ticker;

/// Which reference tier produced `Quote::reference_price`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReferenceSource {
    /// Previous session close.
    PreviousClose,
    /// Current session open.
    SessionOpen,
    /// Second most recent sample of the history window.
    History,
}

/// Normalized quote for a single ticker. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    ticker: Ticker,
    price: f64,
    reference_price: f64,
    reference_source: ReferenceSource,
    percent_change: f64,
    extended_price: Option<f64>,
    extended_percent_change: Option<f64>,
    volume: Option<u64>,
}

impl Quote {
    /// Instrument identifier.
    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    /// Selected current price.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Baseline the change is measured against.
    pub fn reference_price(&self) -> f64 {
        self.reference_price
    }

    /// Tier that supplied the reference price.
    pub fn reference_source(&self) -> ReferenceSource {
        self.reference_source
    }

    /// `(price - reference) / reference * 100`.
    pub fn percent_change(&self) -> f64 {
        self.percent_change
    }

    /// Post- or pre-market price, if the source supplied one.
    pub fn extended_price(&self) -> Option<f64> {
        self.extended_price
    }

    /// Change of `extended_price` relative to `price`.
    pub fn extended_percent_change(&self) -> Option<f64> {
        self.extended_percent_change
    }

    /// Session volume carried through from the raw record.
    pub fn volume(&self) -> Option<u64> {
        self.volume
    }
}

/// Guarded percent change of `current` against `reference`.
///
/// Fails with `DivisionByZero` (tagged with `ticker`) when the reference is zero or
/// non-finite, or when the result would not be finite.
pub fn percent_change(ticker: &Ticker, current: f64, reference: f64) -> Result<f64> {
    if reference == 0.0 || !reference.is_finite() {
        return Err(DashboardError::DivisionByZero(ticker.to_string()));
    }
    let change = (current - reference) / reference * 100.0;
    if !change.is_finite() {
        return Err(DashboardError::DivisionByZero(ticker.to_string()));
    }
    Ok(change)
}

fn resolve_price(raw: &RawQuoteFields) -> Option<f64> {
    usable(raw.last_price).or_else(|| raw.latest_close())
}

fn resolve_reference(raw: &RawQuoteFields) -> Option<(f64, ReferenceSource)> {
    usable(raw.previous_close)
        .map(|p| (p, ReferenceSource::PreviousClose))
        .or_else(|| usable(raw.session_open).map(|p| (p, ReferenceSource::SessionOpen)))
        .or_else(|| raw.prior_close().map(|p| (p, ReferenceSource::History)))
}

/// `true` when some reference tier was supplied but is zero or not finite.
fn has_degenerate_reference(raw: &RawQuoteFields) -> bool {
    let degenerate = |v: f64| v == 0.0 || !v.is_finite();
    let prior = match raw.recent_closes.len() {
        n if n >= 2 => Some(raw.recent_closes[n - 2]),
        _ => None,
    };
    [raw.previous_close, raw.session_open, prior]
        .into_iter()
        .flatten()
        .any(degenerate)
}

/// Post-market, then pre-market; a value equal to `price` is not an extended quote.
fn resolve_extended(raw: &RawQuoteFields, price: f64) -> Option<f64> {
    let distinct = |v: &f64| *v != price;
    usable(raw.post_market_price)
        .filter(distinct)
        .or_else(|| usable(raw.pre_market_price).filter(distinct))
}

/// Build a canonical `Quote` for `ticker` from `raw`.
pub fn normalize(raw: &RawQuoteFields, ticker: &Ticker) -> Result<Quote> {
    let price =
        resolve_price(raw).ok_or_else(|| DashboardError::MissingPriceData(ticker.to_string()))?;
    let (reference_price, reference_source) = match resolve_reference(raw) {
        Some(found) => found,
        None if has_degenerate_reference(raw) => {
            return Err(DashboardError::DivisionByZero(ticker.to_string()));
        }
        None => return Err(DashboardError::MissingReferenceData(ticker.to_string())),
    };
    let change = percent_change(ticker, price, reference_price)?;

    let (extended_price, extended_percent_change) = match resolve_extended(raw, price) {
        Some(ext) => (Some(ext), Some(percent_change(ticker, ext, price)?)),
        None => (None, None),
    };

    Ok(Quote {
        ticker: ticker.clone(),
        price,
        reference_price,
        reference_source,
        percent_change: change,
        extended_price,
        extended_percent_change,
        volume: raw.volume,
    })
}

/// Normalize each record independently.
///
/// A failing record is logged and returned as an `Err` next to its ticker; it never
/// prevents the remaining records from being normalized.
pub fn normalize_batch<'a, I>(items: I) -> Vec<(Ticker, Result<Quote>)>
where
    I: IntoIterator<Item = (&'a Ticker, &'a RawQuoteFields)>,
{
    items
        .into_iter()
        .map(|(ticker, raw)| {
            let result = normalize(raw, ticker);
            if let Err(e) = &result {
                warn!("Skipping {}: {}", ticker, e);
            }
            (ticker.clone(), result)
        })
        .collect()
}
