//! Dashboard configuration loaded from JSON.
//!
//! Every field has a default, so an empty object (or no file at all) yields a
//! usable configuration. Command-line flags are applied on top in `main`.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::info;
use overnight_common::{Result, Ticker, Viewport};
use serde::{Deserialize, Serialize};

/// Named group of tickers shown as one card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasketConfig {
    /// Card title.
    pub name: String,
    /// Members in display order.
    pub tickers: Vec<Ticker>,
}

/// Settings for one dashboard run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Rows in the top gainers table.
    pub top_n: usize,
    /// Rows in the hot sectors list.
    pub hot_sectors: usize,
    /// Lifetime of fetched quotes and histories.
    pub cache_ttl_secs: u64,
    /// Sparkline drawing area.
    pub viewport: Viewport,
    /// Basket cards.
    pub baskets: Vec<BasketConfig>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            top_n: 10,
            hot_sectors: 5,
            cache_ttl_secs: 60,
            viewport: Viewport::default(),
            baskets: vec![BasketConfig {
                name: String::from("Major indices"),
                tickers: ["SPY", "QQQ", "DIA"]
                    .iter()
                    .filter_map(|s| s.parse().ok())
                    .collect(),
            }],
        }
    }
}

impl DashboardConfig {
    /// Read a configuration from `path`, or the defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let file = File::open(path)?;
                let config = Self::from_reader(BufReader::new(file))?;
                info!("Configuration loaded from {}", path.display());
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse a configuration from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}
