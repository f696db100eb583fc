//! Overnight Dashboard prints pre-market movers from a provider snapshot. It reads
//! a list of tickers from a text file (or takes every instrument in the snapshot),
//! normalizes each quote, draws a sparkline per ticker, and prints a top gainers
//! table, basket cards and hot sectors. With `--refresh-secs` it keeps re-rendering
//! until Ctrl+C, re-reading the snapshot once cached data goes stale.
//!
//! Usage example (CLI):
//! ```bash
//! overnight_dashboard --snapshot ./snapshot.json --tickers ./tickers.txt --top 5
//! ```
//!
//! The ticker file should contain symbols separated by commas, spaces, or new lines.
//! See `overnight_common::tickers` for details.
#![warn(missing_docs)]
mod args;
mod config;
mod view;

use crate::args::Args;
use crate::config::DashboardConfig;
use crate::view::Dashboard;
use chrono::{Local, NaiveDate};
use clap::Parser;
use log::{error, info, warn};
use overnight_common::DashboardError;
use overnight_common::Result;
use overnight_common::cache::{Clock, SystemClock};
use overnight_common::calendar::previous_trading_day;
use overnight_common::source::{CachedSource, MarketSource, SnapshotFile};
use overnight_common::tickers::{Ticker, TickerParser};
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;
use std::time::{Duration, Instant};

/// Granularity of the shutdown check while waiting for the next refresh.
const SLEEP_STEP: Duration = Duration::from_millis(250);

/// Build and print one dashboard to stdout.
fn print_dashboard<S: MarketSource>(
    source: &S,
    date: NaiveDate,
    watchlist: &[Ticker],
    config: &DashboardConfig,
    svg: bool,
) -> Result<(), DashboardError> {
    let dashboard = Dashboard::build(source, date, watchlist.to_vec(), config);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    dashboard.write(&mut out, config, svg)?;
    out.flush()?;
    Ok(())
}

/// Tracks when the snapshot was last read from disk.
struct ReloadSchedule<C: Clock> {
    clock: C,
    every: Duration,
    loaded_at: Instant,
}

impl<C: Clock> ReloadSchedule<C> {
    /// Start counting from now; the first reload is due after `every`.
    fn new(clock: C, every: Duration) -> Self {
        let loaded_at = clock.now();
        ReloadSchedule {
            clock,
            every,
            loaded_at,
        }
    }

    fn is_due(&self) -> bool {
        self.clock.now().duration_since(self.loaded_at) >= self.every
    }

    fn mark(&mut self) {
        self.loaded_at = self.clock.now();
    }
}

/// Re-read the snapshot once `schedule` says it is due.
///
/// Returns `true` if a new snapshot replaced the old one. A failed read keeps the
/// previous snapshot and waits a full period before trying again.
fn reload_if_due<C: Clock + Clone>(
    source: &mut CachedSource<SnapshotFile, C>,
    schedule: &mut ReloadSchedule<C>,
    snapshot_path: &Path,
) -> bool {
    source.purge_expired();
    if !schedule.is_due() {
        return false;
    }
    schedule.mark();
    match SnapshotFile::load(snapshot_path) {
        Ok(snapshot) => {
            source.replace_inner(snapshot);
            true
        }
        Err(e) => {
            warn!("Keeping previous snapshot, reload failed: {}", e);
            false
        }
    }
}

/// Re-render every `interval` until `shutdown` is set.
///
/// The snapshot is re-read from `snapshot_path` once per `reload_every`, whether or
/// not any lookup succeeded in the meantime.
#[allow(clippy::too_many_arguments)]
fn run_refresh_loop(
    mut source: CachedSource<SnapshotFile>,
    snapshot_path: &Path,
    date: NaiveDate,
    watchlist: &[Ticker],
    config: &DashboardConfig,
    svg: bool,
    interval: Duration,
    shutdown: Arc<AtomicBool>,
) -> Result<(), DashboardError> {
    let reload_every = Duration::from_secs(config.cache_ttl_secs);
    let mut schedule = ReloadSchedule::new(SystemClock, reload_every);
    while !shutdown.load(Ordering::Relaxed) {
        reload_if_due(&mut source, &mut schedule, snapshot_path);
        print_dashboard(&source, date, watchlist, config, svg)?;

        let mut waited = Duration::ZERO;
        while waited < interval && !shutdown.load(Ordering::Relaxed) {
            thread::sleep(SLEEP_STEP);
            waited += SLEEP_STEP;
        }
    }
    info!("Refresh loop stopping...");
    Ok(())
}

fn main() -> Result<(), DashboardError> {
    init_logger();
    let args = Args::parse();

    let config_path = args.config.as_deref().map(normalize_path);
    let mut config = DashboardConfig::load(config_path.as_deref())?;
    args.apply(&mut config);

    let snapshot_path = normalize_path(&args.snapshot);
    if !is_file_exist(&snapshot_path) {
        error!("Snapshot file not found: {}", snapshot_path.display());
        return Err(DashboardError::Format(format!(
            "snapshot file not found: {}",
            snapshot_path.display()
        )));
    }
    let snapshot = SnapshotFile::load(&snapshot_path)?;

    let watchlist = match args.tickers.as_deref().map(normalize_path) {
        Some(path) => {
            let file = File::open(&path).map_err(DashboardError::Io)?;
            Ticker::parse_from_file(BufReader::new(file))?
        }
        None => snapshot.tickers(),
    };
    info!("Tickers: {:?}", watchlist);

    let date = args
        .date
        .or(snapshot.as_of())
        .unwrap_or_else(|| previous_trading_day(Local::now().date_naive()));
    let source = CachedSource::new(snapshot, Duration::from_secs(config.cache_ttl_secs));

    match args.refresh_secs {
        None => print_dashboard(&source, date, &watchlist, &config, args.svg),
        Some(secs) => {
            let shutdown = Arc::new(AtomicBool::new(false));
            {
                let shutdown = shutdown.clone();
                ctrlc::set_handler(move || {
                    info!("Ctrl+C received. Shutting down dashboard...");
                    shutdown.store(true, Ordering::SeqCst);
                })
                .map_err(|e| DashboardError::Format(format!("Ctrl+C handler: {}", e)))?;
            }
            info!("Refreshing every {}s. Press Ctrl+C to exit.", secs);
            run_refresh_loop(
                source,
                &snapshot_path,
                date,
                &watchlist,
                &config,
                args.svg,
                Duration::from_secs(secs.max(1)),
                shutdown,
            )
        }
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

/// Normalize a CLI-provided path string by trimming whitespace and matching quotes.
///
/// This allows passing Windows paths in quotes without breaking parsing.
fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let no_quotes = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    PathBuf::from(no_quotes)
}

/// Returns `true` if the provided path exists and is a regular file.
fn is_file_exist(path: &Path) -> bool {
    path.exists() && path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use overnight_common::cache::ManualClock;
    use std::fs;

    #[test]
    fn test_normalize_path_strips_quotes() {
        assert_eq!(
            normalize_path("  \"C:\\data\\snap.json\" "),
            PathBuf::from("C:\\data\\snap.json")
        );
        assert_eq!(normalize_path("snap.json"), PathBuf::from("snap.json"));
    }

    #[test]
    fn test_missing_file_is_not_a_file() {
        assert!(!is_file_exist(Path::new("/nonexistent/snapshot.json")));
    }

    #[test]
    fn test_snapshot_reloads_after_failed_lookups() {
        let path = std::env::temp_dir().join(format!(
            "overnight_reload_{}.json",
            std::process::id()
        ));
        fs::write(&path, r#"{ "instruments": [] }"#).unwrap();

        let clock = ManualClock::new();
        let ttl = Duration::from_secs(60);
        let mut source =
            CachedSource::with_clock(SnapshotFile::load(&path).unwrap(), ttl, clock.clone());
        let mut schedule = ReloadSchedule::new(clock.clone(), ttl);
        let ticker: Ticker = "AAPL".parse().unwrap();
        assert!(source.fetch_quote(&ticker).is_err());

        fs::write(
            &path,
            r#"{ "instruments": [ { "ticker": "AAPL", "provider": "raw",
                 "quote": { "last_price": 183.32, "previous_close": 178.08 } } ] }"#,
        )
        .unwrap();

        clock.advance(Duration::from_secs(30));
        assert!(!reload_if_due(&mut source, &mut schedule, &path));
        assert!(source.fetch_quote(&ticker).is_err());

        clock.advance(Duration::from_secs(30));
        assert!(reload_if_due(&mut source, &mut schedule, &path));
        assert!(source.fetch_quote(&ticker).is_ok());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_failed_reload_waits_a_full_period() {
        let clock = ManualClock::new();
        let mut schedule = ReloadSchedule::new(clock.clone(), Duration::from_secs(10));
        assert!(!schedule.is_due());

        clock.advance(Duration::from_secs(10));
        let mut source = CachedSource::with_clock(
            SnapshotFile::from_reader(r#"{ "instruments": [] }"#.as_bytes()).unwrap(),
            Duration::from_secs(10),
            clock.clone(),
        );
        assert!(!reload_if_due(
            &mut source,
            &mut schedule,
            Path::new("/nonexistent/snapshot.json")
        ));
        assert!(!schedule.is_due());

        clock.advance(Duration::from_secs(10));
        assert!(schedule.is_due());
    }
}
