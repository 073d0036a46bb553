//! Per-invocation settings for building time slices.

use std::{num::NonZeroUsize, thread};

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::SliceError;

/// How a timestamp exactly halfway between two boundaries is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TieRule {
    /// Round to the later boundary.
    #[default]
    HalfUp,
    /// Round to the boundary whose multiple of the interval is even.
    HalfEven,
}

/// Fixed for the duration of one run; never derived from the files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceConfig {
    /// Files observed strictly before this instant are stale.
    pub oldest: DateTime<Utc>,
    /// Snapping interval in seconds.
    pub interval_secs: u32,
    /// Upper bound on files inspected concurrently.
    pub workers: usize,
    pub tie: TieRule,
}

impl Default for SliceConfig {
    fn default() -> Self {
        SliceConfig {
            oldest: default_oldest(),
            interval_secs: DEFAULT_INTERVAL_SECS,
            workers: default_workers(),
            tie: TieRule::default(),
        }
    }
}

pub const DEFAULT_INTERVAL_SECS: u32 = 60;

impl SliceConfig {
    pub fn validate(&self) -> Result<(), SliceError> {
        if self.interval_secs == 0 {
            return Err(SliceError::InvalidConfig(
                "snapping interval must be at least one second".to_string(),
            ));
        }
        if self.workers == 0 {
            return Err(SliceError::InvalidConfig(
                "worker count must be at least one".to_string(),
            ));
        }

        Ok(())
    }
}

/// 2015-04-15T00:00:00Z
pub fn default_oldest() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2015, 4, 15)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or(DateTime::UNIX_EPOCH)
}

pub fn default_workers() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(4)
}

// -- Tests -------------------------------------------------------------------
