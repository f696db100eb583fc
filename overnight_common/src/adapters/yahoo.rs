//! Yahoo Finance chart result (`chart.result[0]`).

use serde::{Deserialize, Serialize};

use crate::raw::RawQuoteFields;

/// `meta` block of a chart result.
#[allow(missing_docs)]
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub regular_market_price: Option<f64>,
    pub regular_market_previous_close: Option<f64>,
    pub chart_previous_close: Option<f64>,
    pub regular_market_open: Option<f64>,
    pub pre_market_price: Option<f64>,
    pub post_market_price: Option<f64>,
    pub regular_market_volume: Option<u64>,
}

#[allow(missing_docs)]
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteSeries>,
}

/// Closes may contain `null` for bars without trades.
#[allow(missing_docs)]
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct QuoteSeries {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

#[allow(missing_docs)]
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct ChartResult {
    #[serde(default)]
    pub meta: ChartMeta,
    #[serde(default)]
    pub indicators: Indicators,
}

impl ChartResult {
    /// Non-null closes of the first quote series, oldest first.
    pub fn closes(&self) -> Vec<f64> {
        self.indicators
            .quote
            .first()
            .map(|q| q.close.iter().flatten().copied().collect())
            .unwrap_or_default()
    }
}

impl From<ChartResult> for RawQuoteFields {
    fn from(chart: ChartResult) -> Self {
        let recent_closes = chart.closes();
        let meta = chart.meta;
        RawQuoteFields {
            last_price: meta.regular_market_price,
            previous_close: meta
                .regular_market_previous_close
                .or(meta.chart_previous_close),
            session_open: meta.regular_market_open,
            pre_market_price: meta.pre_market_price,
            post_market_price: meta.post_market_price,
            volume: meta.regular_market_volume,
            recent_closes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_result_with_nulls() {
        let chart: ChartResult = serde_json::from_str(
            r#"{
                "meta": {
                    "regularMarketPrice": 52.0,
                    "chartPreviousClose": 50.0,
                    "preMarketPrice": 52.4
                },
                "indicators": { "quote": [ { "close": [49.5, null, 50.0, 52.0] } ] }
            }"#,
        )
        .unwrap();
        let raw = RawQuoteFields::from(chart);
        assert_eq!(raw.last_price, Some(52.0));
        assert_eq!(raw.previous_close, Some(50.0));
        assert_eq!(raw.pre_market_price, Some(52.4));
        assert_eq!(raw.recent_closes, vec![49.5, 50.0, 52.0]);
    }

    #[test]
    fn test_regular_previous_close_wins() {
        let chart: ChartResult = serde_json::from_str(
            r#"{ "meta": { "regularMarketPreviousClose": 10.0, "chartPreviousClose": 9.0 } }"#,
        )
        .unwrap();
        let raw = RawQuoteFields::from(chart);
        assert_eq!(raw.previous_close, Some(10.0));
        assert!(raw.recent_closes.is_empty());
    }
}
