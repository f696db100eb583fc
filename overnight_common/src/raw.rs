//! Provider-agnostic raw inputs.
//!
//! Every provider adapter fills a `RawQuoteFields` with whatever subset of fields
//! its payload carries. Missing fields are `None` and are never treated as
//! corruption; the normalizer decides which tiers are satisfied.

use serde::{Deserialize, Serialize};

/// Returns the value if it is a positive finite number.
pub fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Partially-populated quote record as delivered by a source adapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawQuoteFields {
    /// Last trade or regular-market price.
    pub last_price: Option<f64>,
    /// Previous session close.
    pub previous_close: Option<f64>,
    /// Current regular-session open.
    pub session_open: Option<f64>,
    /// Pre-market trade price.
    pub pre_market_price: Option<f64>,
    /// Post-market trade price.
    pub post_market_price: Option<f64>,
    /// Traded volume for the session.
    pub volume: Option<u64>,
    /// Short, time-ascending window of recent closes. Empty when no history
    /// lookup is available.
    #[serde(default)]
    pub recent_closes: Vec<f64>,
}

impl RawQuoteFields {
    /// Most recent close in the history window, if usable.
    pub fn latest_close(&self) -> Option<f64> {
        usable(self.recent_closes.last().copied())
    }

    /// Second most recent close in the history window, if usable.
    pub fn prior_close(&self) -> Option<f64> {
        let n = self.recent_closes.len();
        if n < 2 {
            return None;
        }
        usable(self.recent_closes.get(n - 2).copied())
    }
}

/// Ordered, time-ascending price samples for one ticker.
///
/// Non-positive and non-finite samples are dropped on construction; gaps are
/// never interpolated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<f64>", into = "Vec<f64>")]
pub struct HistorySeries(Vec<f64>);

impl HistorySeries {
    /// Build a series, keeping only positive finite samples.
    pub fn new(samples: impl IntoIterator<Item = f64>) -> Self {
        HistorySeries(
            samples
                .into_iter()
                .filter(|v| v.is_finite() && *v > 0.0)
                .collect(),
        )
    }

    /// Samples in time-ascending order.
    pub fn samples(&self) -> &[f64] {
        &self.0
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when no samples are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The last `n` samples, or all of them if the series is shorter.
    pub fn tail(&self, n: usize) -> &[f64] {
        let start = self.0.len().saturating_sub(n);
        &self.0[start..]
    }
}

impl From<Vec<f64>> for HistorySeries {
    fn from(samples: Vec<f64>) -> Self {
        HistorySeries::new(samples)
    }
}

impl From<HistorySeries> for Vec<f64> {
    fn from(series: HistorySeries) -> Self {
        series.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable_rejects_zero_negative_and_nan() {
        assert_eq!(usable(Some(1.5)), Some(1.5));
        assert_eq!(usable(Some(0.0)), None);
        assert_eq!(usable(Some(-3.0)), None);
        assert_eq!(usable(Some(f64::NAN)), None);
        assert_eq!(usable(Some(f64::INFINITY)), None);
        assert_eq!(usable(None), None);
    }

    #[test]
    fn test_history_window_accessors() {
        let raw = RawQuoteFields {
            recent_closes: vec![10.0, 11.0, 12.0],
            ..Default::default()
        };
        assert_eq!(raw.latest_close(), Some(12.0));
        assert_eq!(raw.prior_close(), Some(11.0));

        let short = RawQuoteFields {
            recent_closes: vec![10.0],
            ..Default::default()
        };
        assert_eq!(short.latest_close(), Some(10.0));
        assert_eq!(short.prior_close(), None);
    }

    #[test]
    fn test_history_series_drops_invalid_samples() {
        let series = HistorySeries::new(vec![1.0, f64::NAN, -2.0, 0.0, 3.0]);
        assert_eq!(series.samples(), &[1.0, 3.0]);
        assert_eq!(series.tail(1), &[3.0]);
        assert_eq!(series.tail(10), &[1.0, 3.0]);
    }
}
