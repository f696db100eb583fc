//! Basket reductions over normalized quotes.
//!
//! All sorting here is stable: quotes with equal percent change keep their input
//! order, so repeated refreshes over the same data print the same table.

use std::cmp::Ordering;

use serde::Serialize;

use crate::error::DashboardError;
use crate::normalize::Quote;
use crate::result::Result;

/// Sector label treated as "no sector" by `hot_sectors`.
pub const UNKNOWN_SECTOR: &str = "Unknown";

/// Result of reducing a basket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregate {
    /// Quotes ordered by percent change, highest first.
    pub sorted: Vec<Quote>,
    /// Arithmetic mean of percent change.
    pub average_change: f64,
}

/// Named, ordered group of quotes rebuilt on every refresh.
#[derive(Debug, Clone, Default)]
pub struct Basket {
    name: String,
    quotes: Vec<Quote>,
}

impl Basket {
    /// Create an empty basket.
    pub fn new(name: impl Into<String>) -> Self {
        Basket {
            name: name.into(),
            quotes: Vec::new(),
        }
    }

    /// Basket name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Quotes in insertion order.
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    /// Append a quote.
    pub fn push(&mut self, quote: Quote) {
        self.quotes.push(quote);
    }

    /// Number of quotes.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// `true` if no quotes were added.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Sort and average this basket.
    pub fn aggregate(&self) -> Result<Aggregate> {
        aggregate(&self.quotes)
    }
}

impl Extend<Quote> for Basket {
    fn extend<T: IntoIterator<Item = Quote>>(&mut self, iter: T) {
        self.quotes.extend(iter);
    }
}

fn by_change_desc(a: &Quote, b: &Quote) -> Ordering {
    b.percent_change().total_cmp(&a.percent_change())
}

/// Stable sort by percent change descending plus the mean change.
pub fn aggregate(quotes: &[Quote]) -> Result<Aggregate> {
    if quotes.is_empty() {
        return Err(DashboardError::EmptyBasket);
    }
    let mut sorted = quotes.to_vec();
    sorted.sort_by(by_change_desc);
    let average_change =
        quotes.iter().map(Quote::percent_change).sum::<f64>() / quotes.len() as f64;
    Ok(Aggregate {
        sorted,
        average_change,
    })
}

/// Quotes with a strictly positive change, best first, at most `limit` of them.
pub fn top_gainers(quotes: &[Quote], limit: usize) -> Vec<Quote> {
    let mut gainers: Vec<Quote> = quotes
        .iter()
        .filter(|q| q.percent_change() > 0.0)
        .cloned()
        .collect();
    gainers.sort_by(by_change_desc);
    gainers.truncate(limit);
    gainers
}

/// Most frequent sectors among `sectors`, as `(sector, count)`.
///
/// Empty and `UNKNOWN_SECTOR` labels are ignored. Equal counts keep the order in
/// which the sector first appeared.
pub fn hot_sectors<'a, I>(sectors: I, limit: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    for sector in sectors {
        let sector = sector.trim();
        if sector.is_empty() || sector.eq_ignore_ascii_case(UNKNOWN_SECTOR) {
            continue;
        }
        match counts.iter_mut().find(|(name, _)| name == sector) {
            Some((_, count)) => *count += 1,
            None => counts.push((sector.to_string(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(limit);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::raw::RawQuoteFields;

    /// Quote with the given change against a reference of 100.
    fn quote(ticker: &str, change: f64) -> Quote {
        let raw = RawQuoteFields {
            last_price: Some(100.0 + change),
            previous_close: Some(100.0),
            ..Default::default()
        };
        normalize(&raw, &ticker.parse().unwrap()).unwrap()
    }

    fn symbols(quotes: &[Quote]) -> Vec<&str> {
        quotes.iter().map(|q| q.ticker().as_str()).collect()
    }

    #[test]
    fn test_aggregate_is_stable_and_averages() {
        let quotes = vec![quote("AAA", 2.0), quote("BBB", 2.0), quote("CCC", 5.0)];
        let result = aggregate(&quotes).unwrap();
        assert_eq!(symbols(&result.sorted), vec!["CCC", "AAA", "BBB"]);
        assert!((result.average_change - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_empty_basket() {
        assert!(matches!(aggregate(&[]), Err(DashboardError::EmptyBasket)));
        assert!(matches!(
            Basket::new("Indices").aggregate(),
            Err(DashboardError::EmptyBasket)
        ));
    }

    #[test]
    fn test_basket_keeps_insertion_order() {
        let mut basket = Basket::new("Semis");
        basket.push(quote("NVDA", -1.0));
        basket.extend([quote("AMD", 3.0), quote("INTC", 0.5)]);
        assert_eq!(basket.name(), "Semis");
        assert_eq!(basket.len(), 3);
        assert_eq!(symbols(basket.quotes()), vec!["NVDA", "AMD", "INTC"]);

        let result = basket.aggregate().unwrap();
        assert_eq!(symbols(&result.sorted), vec!["AMD", "INTC", "NVDA"]);
        assert!((result.average_change - 2.5 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_top_gainers_filters_and_limits() {
        let quotes = vec![
            quote("A", 1.0),
            quote("B", -4.0),
            quote("C", 0.0),
            quote("D", 7.0),
            quote("E", 3.0),
        ];
        let top = top_gainers(&quotes, 2);
        assert_eq!(symbols(&top), vec!["D", "E"]);
        assert_eq!(symbols(&top_gainers(&quotes, 10)), vec!["D", "E", "A"]);
    }

    #[test]
    fn test_hot_sectors_counts_known_labels() {
        let sectors = [
            "Technology",
            "Unknown",
            "Healthcare",
            "Technology",
            "",
            "Energy",
            "Healthcare",
            "Technology",
        ];
        let hot = hot_sectors(sectors, 2);
        assert_eq!(
            hot,
            vec![("Technology".to_string(), 3), ("Healthcare".to_string(), 2)]
        );
    }
}
