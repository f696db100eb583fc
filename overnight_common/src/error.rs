//! Error types shared between the core library and the dashboard binary.
//!
//! `DashboardError` covers two families of failures. Data failures
//! (`MissingPriceData`, `MissingReferenceData`, `DivisionByZero`, `EmptyBasket`)
//! are scoped to a single ticker or basket and never abort sibling work.
//! Setup failures (I/O, JSON, ticker parsing) stop the caller.
use std::io;

use thiserror::Error;

/// Unified error type shared by the library and the binary.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// No usable current price: neither a direct price nor a history sample.
    #[error("Missing price data for {0}")]
    MissingPriceData(String),

    /// No usable reference price: no previous close, open, or prior history sample.
    #[error("Missing reference data for {0}")]
    MissingReferenceData(String),

    /// The resolved reference price is zero or non-finite.
    #[error("Cannot compute change for {0}: reference price is zero or not finite")]
    DivisionByZero(String),

    /// Aggregation was requested over zero quotes.
    #[error("Cannot aggregate an empty basket")]
    EmptyBasket,

    /// A ticker string was empty or contained whitespace.
    #[error("Invalid ticker: {0:?}")]
    InvalidTicker(String),

    /// Error while parsing the ticker file into `Ticker` values.
    #[error("Parse tickers file error: {0}")]
    ParseTickersFile(String),

    /// The market source has no record for the requested ticker.
    #[error("Ticker not found: {0}")]
    TickerNotFound(String),

    /// I/O error originating from the standard library or files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),
}

impl DashboardError {
    /// `true` for failures that only degrade one ticker or basket.
    pub fn is_per_ticker(&self) -> bool {
        matches!(
            self,
            DashboardError::MissingPriceData(_)
                | DashboardError::MissingReferenceData(_)
                | DashboardError::DivisionByZero(_)
                | DashboardError::EmptyBasket
                | DashboardError::TickerNotFound(_)
        )
    }
}
