//! Command-line arguments for the dashboard.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use chrono::NaiveDate;
use clap::Parser;

use crate::config::DashboardConfig;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to a JSON snapshot of provider quote payloads.
    #[clap(long)]
    pub snapshot: String,

    /// Path to a text file with tickers to show.
    /// Tickers may be separated by commas, spaces, or new lines.
    /// Defaults to every instrument in the snapshot.
    #[clap(long)]
    pub tickers: Option<String>,

    /// Path to a JSON dashboard configuration.
    #[clap(long)]
    pub config: Option<String>,

    /// Number of rows in the top gainers table.
    #[clap(long)]
    pub top: Option<usize>,

    /// Re-render every N seconds until Ctrl+C.
    #[clap(long)]
    pub refresh_secs: Option<u64>,

    /// Analysis date (YYYY-MM-DD). Defaults to the previous trading day.
    #[clap(long)]
    pub date: Option<NaiveDate>,

    /// Also print SVG polyline points for every sparkline.
    #[clap(long)]
    pub svg: bool,
}

impl Args {
    /// Apply flag overrides on top of a loaded configuration.
    pub fn apply(&self, config: &mut DashboardConfig) {
        if let Some(top) = self.top {
            config.top_n = top;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_and_apply() {
        let args = Args::try_parse_from([
            "overnight_dashboard",
            "--snapshot",
            "snap.json",
            "--top",
            "3",
            "--date",
            "2024-03-08",
            "--svg",
        ])
        .unwrap();
        assert_eq!(args.snapshot, "snap.json");
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2024, 3, 8));
        assert!(args.svg);
        assert!(args.refresh_secs.is_none());

        let mut config = DashboardConfig::default();
        args.apply(&mut config);
        assert_eq!(config.top_n, 3);
    }

    #[test]
    fn test_snapshot_is_required() {
        assert!(Args::try_parse_from(["overnight_dashboard"]).is_err());
    }
}
