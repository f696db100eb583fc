//! Text rendering of the dashboard.
//!
//! A `Dashboard` is rebuilt from the market source on every refresh: each ticker is
//! fetched, normalized and turned into a sparkline independently, and the sections
//! (top gainers, basket cards, hot sectors, unavailable tickers) are reductions over
//! those rows. Tickers that fail are printed as `N/A` with the reason.

use std::collections::{HashMap, HashSet};
use std::io::{self, Write};

use chrono::NaiveDate;
use log::{debug, error, warn};
use overnight_common::basket::{UNKNOWN_SECTOR, hot_sectors, top_gainers};
use overnight_common::normalize::normalize_batch;
use overnight_common::source::{InstrumentProfile, MarketSource};
use overnight_common::sparkline::render_change;
use overnight_common::{
    Basket, DashboardError, Direction, HistorySeries, Quote, Result, SparklinePath, Ticker,
    Viewport, render,
};

use crate::config::DashboardConfig;

/// Most recent samples drawn in a sparkline.
const SPARKLINE_SAMPLES: usize = 30;

const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Everything shown for one ticker.
#[derive(Debug)]
pub struct Row {
    /// Display metadata.
    pub profile: InstrumentProfile,
    /// Normalized quote and its sparkline, or why they are unavailable.
    pub outcome: Result<(Quote, SparklinePath)>,
}

impl Row {
    /// Attach profile and sparkline to a normalization outcome for `ticker`.
    ///
    /// Without at least two history samples the sparkline falls back to the quote's
    /// percent change drawn as a two-point trend.
    pub fn new<S: MarketSource>(
        source: &S,
        ticker: &Ticker,
        quote: Result<Quote>,
        viewport: Viewport,
    ) -> Row {
        let outcome = quote.map(|quote| {
            let path = match source.fetch_history(ticker) {
                Ok(history) if history.len() >= 2 => {
                    let recent = HistorySeries::new(history.tail(SPARKLINE_SAMPLES).to_vec());
                    render(&recent, viewport)
                }
                Ok(_) => render_change(quote.percent_change(), viewport),
                Err(e) => {
                    warn!("No history for {}: {}", ticker, e);
                    render_change(quote.percent_change(), viewport)
                }
            };
            (quote, path)
        });

        Row {
            profile: source.profile(ticker).unwrap_or_default(),
            outcome,
        }
    }

    fn quote(&self) -> Option<&Quote> {
        self.outcome.as_ref().ok().map(|(quote, _)| quote)
    }

    fn sector(&self) -> &str {
        self.profile.sector.as_deref().unwrap_or(UNKNOWN_SECTOR)
    }
}

/// One refresh worth of rows.
pub struct Dashboard {
    date: NaiveDate,
    watchlist: Vec<Ticker>,
    rows: HashMap<Ticker, Row>,
}

impl Dashboard {
    /// Build rows for the watchlist and every basket member, each ticker once.
    ///
    /// Quotes that were fetched are normalized as one batch; a ticker that fails at
    /// any step only marks its own row.
    pub fn build<S: MarketSource>(
        source: &S,
        date: NaiveDate,
        watchlist: Vec<Ticker>,
        config: &DashboardConfig,
    ) -> Self {
        let mut rows = HashMap::new();
        let mut seen = HashSet::new();
        let mut fetched = Vec::new();

        let basket_members = config.baskets.iter().flat_map(|b| b.tickers.iter());
        for ticker in watchlist.iter().chain(basket_members) {
            if !seen.insert(ticker) {
                continue;
            }
            match source.fetch_quote(ticker) {
                Ok(raw) => fetched.push((ticker.clone(), raw)),
                Err(e) => {
                    log_fetch_failure(ticker, &e);
                    let row = Row::new(source, ticker, Err(e), config.viewport);
                    rows.insert(ticker.clone(), row);
                }
            }
        }

        let batch = normalize_batch(fetched.iter().map(|(ticker, raw)| (ticker, raw)));
        for (ticker, quote) in batch {
            let row = Row::new(source, &ticker, quote, config.viewport);
            rows.insert(ticker, row);
        }
        debug!("Built {} rows", rows.len());
        Dashboard {
            date,
            watchlist,
            rows,
        }
    }

    /// Row for `ticker`, if it was requested.
    pub fn row(&self, ticker: &Ticker) -> Option<&Row> {
        self.rows.get(ticker)
    }

    fn watchlist_quotes(&self) -> Vec<Quote> {
        self.watchlist
            .iter()
            .filter_map(|t| self.rows.get(t))
            .filter_map(|row| row.quote().cloned())
            .collect()
    }

    fn path_for(&self, ticker: &Ticker) -> Option<&SparklinePath> {
        self.rows
            .get(ticker)
            .and_then(|row| row.outcome.as_ref().ok())
            .map(|(_, path)| path)
    }

    /// Write every section to `out`.
    pub fn write<W: Write>(
        &self,
        out: &mut W,
        config: &DashboardConfig,
        svg: bool,
    ) -> io::Result<()> {
        writeln!(out, "Overnight movers | analysis date {}", self.date)?;
        writeln!(out)?;
        self.write_gainers(out, config, svg)?;
        self.write_baskets(out, config, svg)?;
        self.write_unavailable(out)?;
        Ok(())
    }

    fn write_gainers<W: Write>(
        &self,
        out: &mut W,
        config: &DashboardConfig,
        svg: bool,
    ) -> io::Result<()> {
        let gainers = top_gainers(&self.watchlist_quotes(), config.top_n);
        writeln!(out, "Top {} gainers", config.top_n)?;
        if gainers.is_empty() {
            writeln!(out, "  No gainers in the current data.")?;
            writeln!(out)?;
            return Ok(());
        }

        writeln!(
            out,
            "  {:<8} {:<28} {:>9} {:>12} {:>15}  {:<22} Trend",
            "Ticker", "Name", "Change", "Price", "Volume", "Sector"
        )?;
        for quote in &gainers {
            let row = &self.rows[quote.ticker()];
            let name = row.profile.name.as_deref().unwrap_or(quote.ticker().as_str());
            let path = self.path_for(quote.ticker());
            writeln!(
                out,
                "  {:<8} {:<28} {:>9} {:>12} {:>15}  {:<22} {}",
                quote.ticker(),
                truncate(name, 28),
                format_change(quote.percent_change()),
                format_price(quote.price()),
                format_volume(quote.volume()),
                truncate(row.sector(), 22),
                path.map(|p| glyph(p, config.viewport)).unwrap_or_default(),
            )?;
            if let (true, Some(path)) = (svg, path) {
                writeln!(out, "           svg: {}", svg_points(path))?;
            }
        }
        writeln!(out)?;

        let sectors = gainers.iter().map(|q| self.rows[q.ticker()].sector());
        let hot = hot_sectors(sectors, config.hot_sectors);
        if !hot.is_empty() {
            writeln!(out, "Hot sectors")?;
            for (sector, count) in hot {
                writeln!(out, "  {}: {} movers", sector, count)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    fn write_baskets<W: Write>(
        &self,
        out: &mut W,
        config: &DashboardConfig,
        svg: bool,
    ) -> io::Result<()> {
        for basket_config in &config.baskets {
            let mut basket = Basket::new(basket_config.name.as_str());
            for ticker in &basket_config.tickers {
                if let Some(quote) = self.rows.get(ticker).and_then(Row::quote) {
                    basket.push(quote.clone());
                }
            }
            debug!("{}: {} quotes", basket.name(), basket.len());

            match basket.aggregate() {
                Ok(summary) => {
                    writeln!(
                        out,
                        "{} (avg {})",
                        basket.name(),
                        format_change(summary.average_change)
                    )?;
                    for quote in &summary.sorted {
                        let path = self.path_for(quote.ticker());
                        writeln!(
                            out,
                            "  {} {:<8} {:>12} {:>9}{}  {}",
                            path.map(arrow).unwrap_or(' '),
                            quote.ticker(),
                            format_price(quote.price()),
                            format_change(quote.percent_change()),
                            format_extended(quote),
                            path.map(|p| glyph(p, config.viewport)).unwrap_or_default(),
                        )?;
                        if let (true, Some(path)) = (svg, path) {
                            writeln!(out, "           svg: {}", svg_points(path))?;
                        }
                    }
                }
                Err(e) => writeln!(out, "{}: {}", basket.name(), e)?,
            }
            for ticker in &basket_config.tickers {
                if let Some(Err(e)) = self.rows.get(ticker).map(|r| &r.outcome) {
                    writeln!(out, "    {:<8} N/A ({})", ticker, e)?;
                }
            }
            writeln!(out)?;
        }
        Ok(())
    }

    fn write_unavailable<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let failed: Vec<(&Ticker, String)> = self
            .watchlist
            .iter()
            .filter_map(|t| match self.rows.get(t).map(|r| &r.outcome) {
                Some(Err(e)) => Some((t, e.to_string())),
                _ => None,
            })
            .collect();
        if failed.is_empty() {
            return Ok(());
        }
        writeln!(out, "Unavailable")?;
        for (ticker, reason) in failed {
            writeln!(out, "  {:<8} N/A ({})", ticker, reason)?;
        }
        Ok(())
    }
}

/// Missing tickers degrade one row; anything else points at a broken snapshot.
fn log_fetch_failure(ticker: &Ticker, e: &DashboardError) {
    if e.is_per_ticker() {
        warn!("{} unavailable: {}", ticker, e);
    } else {
        error!("{} could not be read from the source: {}", ticker, e);
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Signed percent with two decimals, e.g. `+2.94%`.
pub fn format_change(percent: f64) -> String {
    format!("{:+.2}%", percent)
}

/// Price with two decimals.
pub fn format_price(price: f64) -> String {
    format!("{:.2}", price)
}

/// Volume with thousands separators, `-` when unknown.
pub fn format_volume(volume: Option<u64>) -> String {
    let Some(volume) = volume else {
        return String::from("-");
    };
    let digits = volume.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn format_extended(quote: &Quote) -> String {
    match (quote.extended_price(), quote.extended_percent_change()) {
        (Some(price), Some(change)) => {
            format!("  ext {} {}", format_price(price), format_change(change))
        }
        _ => String::new(),
    }
}

fn arrow(path: &SparklinePath) -> char {
    match path.direction {
        Direction::Up => '▲',
        Direction::Down => '▼',
        Direction::Flat => '·',
    }
}

/// Terminal sparkline: one block character per point, taller for smaller `y`.
pub fn glyph(path: &SparklinePath, viewport: Viewport) -> String {
    let top = (BLOCKS.len() - 1) as f64;
    path.points
        .iter()
        .map(|&(_, y)| {
            let level = ((viewport.height - y) / viewport.height * top).round();
            BLOCKS[level.clamp(0.0, top) as usize]
        })
        .collect()
}

/// Points formatted for an SVG `<polyline points="...">` attribute.
pub fn svg_points(path: &SparklinePath) -> String {
    path.points
        .iter()
        .map(|(x, y)| format!("{:.1},{:.1}", x, y))
        .collect::<Vec<_>>()
        .join(" ")
}
