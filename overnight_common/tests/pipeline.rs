use overnight_common::basket::top_gainers;
use overnight_common::source::{MarketSource, SnapshotFile};
use overnight_common::sparkline::render_change;
use overnight_common::{Direction, DashboardError, Viewport, aggregate, normalize, render};

const SNAPSHOT: &str = r#"{
    "instruments": [
        {
            "ticker": "NVDA",
            "provider": "polygon",
            "quote": {
                "day": { "o": 870.0, "c": 905.0, "v": 41000000 },
                "prevDay": { "c": 875.0 },
                "lastTrade": { "p": 920.0 }
            },
            "history": [860.0, 871.5, 875.0, 920.0],
            "sector": "Technology"
        },
        {
            "ticker": "XOM",
            "provider": "yahoo",
            "quote": {
                "meta": { "regularMarketPrice": 110.0, "regularMarketPreviousClose": 112.0 },
                "indicators": { "quote": [ { "close": [113.0, 112.0, 110.0] } ] }
            },
            "sector": "Energy"
        },
        {
            "ticker": "DDD",
            "provider": "raw",
            "quote": { "previous_close": 0, "session_open": 50.0, "last_price": 52.0 }
        },
        {
            "ticker": "GHOST",
            "provider": "raw",
            "quote": { "volume": 10 }
        }
    ]
}"#;

#[test]
fn snapshot_to_dashboard_rows() {
    let source = SnapshotFile::from_reader(SNAPSHOT.as_bytes()).unwrap();
    let viewport = Viewport::default();

    let mut quotes = Vec::new();
    let mut failures = Vec::new();
    for ticker in source.tickers() {
        let raw = source.fetch_quote(&ticker).unwrap();
        match normalize(&raw, &ticker) {
            Ok(quote) => {
                let path = render(&source.fetch_history(&ticker).unwrap(), viewport);
                let expected = if quote.percent_change() >= 0.0 {
                    Direction::Up
                } else {
                    Direction::Down
                };
                if !path.is_empty() {
                    assert_eq!(path.direction, expected, "{ticker}");
                }
                quotes.push(quote);
            }
            Err(e) => failures.push(e),
        }
    }

    assert_eq!(quotes.len(), 3);
    assert!(matches!(
        failures.as_slice(),
        [DashboardError::MissingPriceData(t)] if t == "GHOST"
    ));

    let ddd = quotes.iter().find(|q| q.ticker().as_str() == "DDD").unwrap();
    assert!((ddd.percent_change() - 4.0).abs() < 1e-9);

    let summary = aggregate(&quotes).unwrap();
    let order: Vec<&str> = summary.sorted.iter().map(|q| q.ticker().as_str()).collect();
    assert_eq!(order, vec!["NVDA", "DDD", "XOM"]);

    let gainers = top_gainers(&quotes, 10);
    assert_eq!(gainers.len(), 2);
    assert_eq!(gainers[0].ticker().as_str(), "NVDA");
}

#[test]
fn index_card_without_history_uses_change_glyph() {
    let source = SnapshotFile::from_reader(SNAPSHOT.as_bytes()).unwrap();
    let ticker = "XOM".parse().unwrap();
    let quote = normalize(&source.fetch_quote(&ticker).unwrap(), &ticker).unwrap();
    let path = render_change(quote.percent_change(), Viewport::default());
    assert_eq!(path.direction, Direction::Down);
    assert_eq!(path.points.len(), 2);
}
