//! Polygon.io stocks snapshot.
//!
//! Only the fields the dashboard reads are modelled; everything else in the
//! payload is ignored.

use serde::{Deserialize, Serialize};

use crate::raw::{RawQuoteFields, usable};

/// Aggregate bar inside a snapshot (`day`, `prevDay`, `min`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bar {
    /// Open.
    #[serde(rename = "o")]
    pub open: Option<f64>,
    /// Close.
    #[serde(rename = "c")]
    pub close: Option<f64>,
    /// Volume. Polygon reports it as a float.
    #[serde(rename = "v")]
    pub volume: Option<f64>,
}

/// Last trade inside a snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LastTrade {
    /// Trade price.
    #[serde(rename = "p")]
    pub price: Option<f64>,
}

/// One ticker of a `/v2/snapshot/locale/us/markets/stocks/tickers` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Current session bar.
    #[serde(default)]
    pub day: Option<Bar>,
    /// Previous session bar.
    #[serde(default)]
    pub prev_day: Option<Bar>,
    /// Most recent minute bar; extended-hours trades land here.
    #[serde(default)]
    pub min: Option<Bar>,
    /// Most recent trade.
    #[serde(default)]
    pub last_trade: Option<LastTrade>,
}

impl From<Snapshot> for RawQuoteFields {
    fn from(snap: Snapshot) -> Self {
        let day = snap.day.unwrap_or_default();
        let prev_day = snap.prev_day.unwrap_or_default();
        let last_trade = usable(snap.last_trade.and_then(|t| t.price));

        // Day close stands in for the last trade when no trade was reported.
        let last_price = last_trade.or(usable(day.close));
        // The two closes double as a history window for the normalizer.
        let recent_closes = [prev_day.close, day.close].into_iter().flatten().collect();

        RawQuoteFields {
            last_price,
            previous_close: prev_day.close,
            session_open: day.open,
            pre_market_price: None,
            post_market_price: snap.min.and_then(|m| m.close).filter(|p| Some(*p) != last_price),
            volume: day
                .volume
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(|v| v as u64),
            recent_closes,
        }
    }
}
