//! Provider payload shapes.
//!
//! Each submodule mirrors the JSON a market-data provider returns for one
//! instrument and converts it into the provider-agnostic `RawQuoteFields`, so the
//! normalizer's fallback logic is written once.
//! - `polygon`: stocks snapshot records (`lastTrade`, `day`, `prevDay`, `min`).
//! - `yahoo`: chart results (`meta` plus close indicators).

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::raw::RawQuoteFields;
use crate::result::Result;

pub mod polygon;
pub mod yahoo;

/// Provider that produced a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Polygon.io snapshot.
    Polygon,
    /// Yahoo Finance chart result.
    Yahoo,
    /// Payload already shaped like `RawQuoteFields`.
    Raw,
}

impl Provider {
    /// Decode a provider payload into `RawQuoteFields`.
    pub fn decode(self, payload: serde_json::Value) -> Result<RawQuoteFields> {
        let raw = match self {
            Provider::Polygon => serde_json::from_value::<polygon::Snapshot>(payload)?.into(),
            Provider::Yahoo => serde_json::from_value::<yahoo::ChartResult>(payload)?.into(),
            Provider::Raw => serde_json::from_value::<RawQuoteFields>(payload)?,
        };
        Ok(raw)
    }
}
