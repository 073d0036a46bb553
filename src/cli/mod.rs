//! Command line interface.

pub mod command;

use std::{path::PathBuf, time::Duration};

use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{default_workers, SliceConfig, TieRule, DEFAULT_INTERVAL_SECS};

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Snap timestamped observation files into time slices
pub struct Cli {
    /// Label matched as a substring against file names, e.g. `2015-04-15_12`
    pub query_time: String,

    /// Directory holding the observation files
    pub in_path: PathBuf,

    /// Directory the time-slice files are written to
    pub out_path: PathBuf,

    /// Files observed before this instant are ignored
    #[arg(long, value_parser = parse_oldest, default_value = "2015-04-15T00:00:00Z")]
    pub oldest: DateTime<Utc>,

    /// Snapping interval in seconds
    #[arg(long, default_value_t = DEFAULT_INTERVAL_SECS)]
    pub interval_secs: u32,

    /// Number of files inspected at once [default: available parallelism]
    #[arg(long)]
    pub workers: Option<usize>,

    /// How timestamps exactly between two boundaries are rounded
    #[arg(long, value_enum, default_value_t = TieRule::HalfUp)]
    pub tie: TieRule,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn slice_config(&self) -> SliceConfig {
        SliceConfig {
            oldest: self.oldest,
            interval_secs: self.interval_secs,
            workers: self.workers.unwrap_or_else(default_workers),
            tie: self.tie,
        }
    }
}

/// Parses an RFC 3339 instant, or a naive `YYYY-MM-DD[ HH:MM:SS]` read as UTC.
pub fn parse_oldest(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Ok(t.with_timezone(&Utc));
    }

    for layout in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, layout) {
            return Ok(t.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc())
        .ok_or_else(|| anyhow!("`{}` is not a date or date-time", s))
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

/// Creates a progress bar.
pub fn create_progress_bar(size: u64, message: String) -> ProgressBar {
    let bar = ProgressBar::new(size).with_message(message);
    if let Ok(style) = ProgressStyle::with_template("[{eta_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}") {
        bar.set_style(style.progress_chars("##-"));
    }

    bar
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::default_oldest;

    #[test]
    fn should_parse_positionals_with_defaults() {
        let cli = Cli::try_parse_from(["timeslice", "2015-04-15_12", "/in", "/out"]).unwrap();

        assert_eq!(cli.query_time, "2015-04-15_12");
        assert_eq!(cli.in_path, PathBuf::from("/in"));
        assert_eq!(cli.out_path, PathBuf::from("/out"));
        assert_eq!(cli.oldest, default_oldest());
        assert_eq!(cli.interval_secs, 60);
        assert_eq!(cli.tie, TieRule::HalfUp);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn should_parse_overrides() {
        let cli = Cli::try_parse_from([
            "timeslice",
            "2015",
            "/in",
            "/out",
            "--oldest",
            "2016-01-01",
            "--interval-secs",
            "900",
            "--workers",
            "2",
            "--tie",
            "half-even",
            "-vv",
        ])
        .unwrap();

        let config = cli.slice_config();
        assert_eq!(config.oldest.to_rfc3339(), "2016-01-01T00:00:00+00:00");
        assert_eq!(config.interval_secs, 900);
        assert_eq!(config.workers, 2);
        assert_eq!(config.tie, TieRule::HalfEven);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn should_require_three_positionals() {
        assert!(Cli::try_parse_from(["timeslice", "2015", "/in"]).is_err());
    }

    #[test]
    fn should_parse_oldest_layouts() {
        let expected = "2015-04-15T06:30:00+00:00";

        assert_eq!(parse_oldest("2015-04-15T06:30:00Z").unwrap().to_rfc3339(), expected);
        assert_eq!(parse_oldest("2015-04-15T08:30:00+02:00").unwrap().to_rfc3339(), expected);
        assert_eq!(parse_oldest("2015-04-15 06:30:00").unwrap().to_rfc3339(), expected);
        assert_eq!(parse_oldest("2015-04-15T06:30:00").unwrap().to_rfc3339(), expected);
        assert!(parse_oldest("yesterday").is_err());
    }
}
