//!
//! Core types and pure transforms behind the overnight movers dashboard.
//!
//! This crate aggregates:
//! - `error`: unified error type `DashboardError` used across the workspace.
//! - `result`: handy `Result<T, DashboardError>` alias.
//! - `tickers`: ticker identifiers and ticker-list parsing.
//! - `raw`: provider-agnostic `RawQuoteFields` and `HistorySeries`.
//! - `adapters`: provider payload shapes converted into `RawQuoteFields`.
//! - `normalize`: canonical `Quote` construction with fallback tiers.
//! - `sparkline`: history to viewport geometry.
//! - `basket`: sorting, averaging and top-gainer selection over quotes.
//! - `calendar`: previous trading day lookup.
//! - `cache`: time-to-live cache with an injectable clock.
//! - `source`: `MarketSource` trait, snapshot file source and cached wrapper.
#![warn(missing_docs)]
pub mod adapters;
pub mod basket;
pub mod cache;
pub mod calendar;
pub mod error;
pub mod normalize;
pub mod raw;
pub mod result;
pub mod source;
pub mod sparkline;
pub mod tickers;

pub use basket::{Aggregate, Basket, aggregate};
pub use error::DashboardError;
pub use normalize::{Quote, normalize};
pub use raw::{HistorySeries, RawQuoteFields};
pub use result::Result;
pub use sparkline::{Direction, SparklinePath, Viewport, render};
pub use tickers::Ticker;
