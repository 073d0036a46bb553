//! Observation files and what can be learned about them without opening them.

pub mod file_stamp;

use std::{fmt, path::PathBuf};

use chrono::{DateTime, Utc};

pub use file_stamp::parse_file_stamp;

/// A matched file whose name carries a usable timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationFile {
    pub path: PathBuf,
    pub file_name: String,
    pub observed_at: DateTime<Utc>,
    pub size_bytes: u64,
    /// `observed_at` snapped to the configured interval.
    pub slice_time: DateTime<Utc>,
}

/// Why a matched file was left out of every slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoTimestamp,
    Empty,
    Unreadable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoTimestamp => write!(f, "no timestamp in file name"),
            SkipReason::Empty => write!(f, "file is empty"),
            SkipReason::Unreadable(e) => write!(f, "unreadable: {}", e),
        }
    }
}

/// Result of inspecting one matched file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inspected {
    Retained(ObservationFile),
    Stale { path: PathBuf, observed_at: DateTime<Utc> },
    Skipped { path: PathBuf, reason: SkipReason },
}

impl Inspected {
    pub fn path(&self) -> &PathBuf {
        match self {
            Inspected::Retained(file) => &file.path,
            Inspected::Stale { path, .. } | Inspected::Skipped { path, .. } => path,
        }
    }
}
