//! Market data sources.
//!
//! `MarketSource` is the seam between the dashboard and whatever supplies raw
//! provider payloads. `SnapshotFile` serves a JSON snapshot captured from one or
//! more providers; `CachedSource` puts a time-to-live cache in front of any source.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::adapters::Provider;
use crate::cache::{Clock, SystemClock, TtlCache};
use crate::error::DashboardError;
use crate::raw::{HistorySeries, RawQuoteFields};
use crate::result::Result;
use crate::tickers::Ticker;

/// Display metadata for an instrument.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstrumentProfile {
    /// Company or fund name.
    pub name: Option<String>,
    /// Sector label.
    pub sector: Option<String>,
}

/// Supplier of raw quotes and price histories, keyed by ticker.
pub trait MarketSource {
    /// Raw quote fields for `ticker`.
    fn fetch_quote(&self, ticker: &Ticker) -> Result<RawQuoteFields>;

    /// Time-ascending price history for `ticker`.
    fn fetch_history(&self, ticker: &Ticker) -> Result<HistorySeries>;

    /// Display metadata for `ticker`, if known.
    fn profile(&self, _ticker: &Ticker) -> Option<InstrumentProfile> {
        None
    }
}

/// One instrument inside a snapshot file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentRecord {
    /// Instrument identifier.
    pub ticker: Ticker,
    /// Provider whose payload shape `quote` follows.
    pub provider: Provider,
    /// Provider payload, decoded lazily so one malformed record only fails its ticker.
    pub quote: serde_json::Value,
    /// Closes for the sparkline, oldest first.
    #[serde(default)]
    pub history: HistorySeries,
    /// Company or fund name.
    #[serde(default)]
    pub name: Option<String>,
    /// Sector label.
    #[serde(default)]
    pub sector: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SnapshotDocument {
    #[serde(default)]
    as_of: Option<NaiveDate>,
    instruments: Vec<InstrumentRecord>,
}

/// Snapshot of provider payloads loaded from JSON.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    as_of: Option<NaiveDate>,
    records: Vec<InstrumentRecord>,
    index: HashMap<Ticker, usize>,
}

impl SnapshotFile {
    /// Load a snapshot document from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let snapshot = Self::from_reader(BufReader::new(file))?;
        info!(
            "Loaded {} instruments from {}",
            snapshot.records.len(),
            path.display()
        );
        Ok(snapshot)
    }

    /// Parse a snapshot document from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let doc: SnapshotDocument = serde_json::from_reader(reader)?;
        let mut index = HashMap::new();
        for (i, record) in doc.instruments.iter().enumerate() {
            index.entry(record.ticker.clone()).or_insert(i);
        }
        Ok(SnapshotFile {
            as_of: doc.as_of,
            records: doc.instruments,
            index,
        })
    }

    /// Date the snapshot was taken, when recorded.
    pub fn as_of(&self) -> Option<NaiveDate> {
        self.as_of
    }

    /// Tickers in file order, first occurrence only.
    pub fn tickers(&self) -> Vec<Ticker> {
        self.records
            .iter()
            .enumerate()
            .filter(|(i, r)| self.index.get(&r.ticker) == Some(i))
            .map(|(_, r)| r.ticker.clone())
            .collect()
    }

    fn record(&self, ticker: &Ticker) -> Result<&InstrumentRecord> {
        self.index
            .get(ticker)
            .map(|&i| &self.records[i])
            .ok_or_else(|| DashboardError::TickerNotFound(ticker.to_string()))
    }
}

impl MarketSource for SnapshotFile {
    fn fetch_quote(&self, ticker: &Ticker) -> Result<RawQuoteFields> {
        let record = self.record(ticker)?;
        record.provider.decode(record.quote.clone())
    }

    /// The explicit `history` of the record, or the provider's own close window
    /// when the record has none.
    fn fetch_history(&self, ticker: &Ticker) -> Result<HistorySeries> {
        let record = self.record(ticker)?;
        if !record.history.is_empty() {
            return Ok(record.history.clone());
        }
        let raw = record.provider.decode(record.quote.clone())?;
        Ok(HistorySeries::new(raw.recent_closes))
    }

    fn profile(&self, ticker: &Ticker) -> Option<InstrumentProfile> {
        let record = self.record(ticker).ok()?;
        Some(InstrumentProfile {
            name: record.name.clone(),
            sector: record.sector.clone(),
        })
    }
}

/// Time-to-live cache in front of another source.
///
/// Quotes and histories are cached separately per ticker. Failed lookups are not
/// cached.
pub struct CachedSource<S, C: Clock = SystemClock> {
    inner: S,
    quotes: RefCell<TtlCache<Ticker, RawQuoteFields, C>>,
    histories: RefCell<TtlCache<Ticker, HistorySeries, C>>,
}

impl<S: MarketSource> CachedSource<S, SystemClock> {
    /// Wrap `inner` with caches on the system clock.
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self::with_clock(inner, ttl, SystemClock)
    }
}

impl<S: MarketSource, C: Clock + Clone> CachedSource<S, C> {
    /// Wrap `inner` with caches driven by `clock`.
    pub fn with_clock(inner: S, ttl: Duration, clock: C) -> Self {
        CachedSource {
            inner,
            quotes: RefCell::new(TtlCache::with_clock(ttl, clock.clone())),
            histories: RefCell::new(TtlCache::with_clock(ttl, clock)),
        }
    }

    /// Access the wrapped source.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Replace the wrapped source and drop everything cached from the old one.
    pub fn replace_inner(&mut self, inner: S) {
        self.inner = inner;
        self.quotes.get_mut().clear();
        self.histories.get_mut().clear();
    }

    /// Drop stale entries from both caches.
    pub fn purge_expired(&self) -> usize {
        let expired = self.quotes.borrow_mut().purge_expired().len()
            + self.histories.borrow_mut().purge_expired().len();
        if expired > 0 {
            debug!("Purged {} expired cache entries", expired);
        }
        expired
    }
}

impl<S: MarketSource, C: Clock + Clone> MarketSource for CachedSource<S, C> {
    fn fetch_quote(&self, ticker: &Ticker) -> Result<RawQuoteFields> {
        self.quotes
            .borrow_mut()
            .get_or_try_insert_with(ticker, || self.inner.fetch_quote(ticker))
    }

    fn fetch_history(&self, ticker: &Ticker) -> Result<HistorySeries> {
        self.histories
            .borrow_mut()
            .get_or_try_insert_with(ticker, || self.inner.fetch_history(ticker))
    }

    fn profile(&self, ticker: &Ticker) -> Option<InstrumentProfile> {
        self.inner.profile(ticker)
    }
}
