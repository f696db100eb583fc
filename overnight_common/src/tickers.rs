//! Ticker identifiers and helpers for reading ticker lists.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

use crate::error::DashboardError;

/// Trait providing file parsing for tickers.
pub trait TickerParser {
    /// Parses tickers from a buffered reader.
    ///
    /// Symbols may be separated by commas, whitespace, or new lines; blank
    /// entries are skipped and duplicates keep their first position.
    /// Returns an error if any entry cannot be parsed.
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Ticker>, DashboardError>;
}

impl TickerParser for Ticker {
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Self>, DashboardError> {
        let mut tickers: Vec<Ticker> = Vec::new();

        for line_result in reader.lines() {
            let line = line_result.map_err(DashboardError::Io)?;
            let entries = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty());

            for entry in entries {
                match entry.parse::<Self>() {
                    Ok(ticker) if !tickers.contains(&ticker) => tickers.push(ticker),
                    Ok(_) => continue,
                    Err(e) => return Err(DashboardError::ParseTickersFile(e.to_string())),
                }
            }
        }
        Ok(tickers)
    }
}

/// Opaque instrument identifier (equity, index, ETF, future).
///
/// Always non-empty, upper-cased, and free of whitespace.
#[derive(Debug, Clone, Serialize, Deserialize, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Borrow the symbol text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Ticker {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(DashboardError::InvalidTicker(s.to_string()));
        }
        Ok(Ticker(trimmed.to_ascii_uppercase()))
    }
}

impl TryFrom<String> for Ticker {
    type Error = DashboardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_normalizes_case() {
        let ticker: Ticker = " aapl ".parse().unwrap();
        assert_eq!(ticker.as_str(), "AAPL");
        assert_eq!(ticker.to_string(), "AAPL");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(
            "   ".parse::<Ticker>(),
            Err(DashboardError::InvalidTicker(_))
        ));
    }

    #[test]
    fn test_parse_from_file_mixed_separators() {
        let input = "AAPL, msft\n\nNVDA TSLA\nmsft\n";
        let tickers = Ticker::parse_from_file(Cursor::new(input)).unwrap();
        let symbols: Vec<&str> = tickers.iter().map(Ticker::as_str).collect();
        assert_eq!(symbols, vec!["AAPL", "MSFT", "NVDA", "TSLA"]);
    }

    #[test]
    fn test_serde_uses_plain_string() {
        let ticker: Ticker = serde_json::from_str("\"spy\"").unwrap();
        assert_eq!(ticker.as_str(), "SPY");
        assert_eq!(serde_json::to_string(&ticker).unwrap(), "\"SPY\"");
        assert!(serde_json::from_str::<Ticker>("\"\"").is_err());
    }
}
