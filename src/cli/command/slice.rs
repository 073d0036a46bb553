//! Select the observation files matching a query time and write them out as
//! snapped time slices.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::{
    cli::create_spinner,
    config::SliceConfig,
    error::{DirectoryRole, SliceError},
    parquet,
    select::{inspect_all, list_matching},
    slice::{build_slices, merge_rows, TimeSlice},
};

use super::make_slice_file_name;

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SliceOutcome {
    Produced(SliceSummary),
    Empty(EmptyReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyReason {
    NoMatchingFiles,
    /// Files matched but every one was stale or skipped.
    NothingRetained {
        matched: usize,
        stale: usize,
        skipped: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceSummary {
    pub query: String,
    pub matched: usize,
    pub retained: usize,
    pub stale: usize,
    pub skipped: usize,
    pub slices: Vec<WrittenSlice>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenSlice {
    pub slice_time: DateTime<Utc>,
    pub path: PathBuf,
    /// Rows observed in this run.
    pub new_rows: usize,
    /// Rows in the file after merging with what was already there.
    pub total_rows: usize,
}

pub async fn slice(
    query: &str,
    in_dir: &Path,
    out_dir: &Path,
    config: SliceConfig,
) -> Result<SliceOutcome, SliceError> {
    config.validate()?;
    require_directory(in_dir, DirectoryRole::Input)?;
    require_directory(out_dir, DirectoryRole::Output)?;

    let bar = create_spinner(format!("Listing {}...", in_dir.display()));
    let matches = list_matching(in_dir, query)?;
    bar.finish_with_message(format!("{} files match `{}`", matches.len(), query));

    if matches.is_empty() {
        return Ok(SliceOutcome::Empty(EmptyReason::NoMatchingFiles));
    }

    let selection = inspect_all(matches, config).await;

    if selection.retained.is_empty() {
        return Ok(SliceOutcome::Empty(EmptyReason::NothingRetained {
            matched: selection.matched(),
            stale: selection.stale.len(),
            skipped: selection.skipped.len(),
        }));
    }

    let slices = build_slices(&selection.retained);
    let mut written = Vec::with_capacity(slices.len());

    for slice in &slices {
        written.push(write_slice(slice, out_dir, config.interval_secs)?);
    }

    Ok(SliceOutcome::Produced(SliceSummary {
        query: query.to_string(),
        matched: selection.matched(),
        retained: selection.retained.len(),
        stale: selection.stale.len(),
        skipped: selection.skipped.len(),
        slices: written,
    }))
}

fn require_directory(path: &Path, role: DirectoryRole) -> Result<(), SliceError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(SliceError::MissingDirectory {
            role,
            path: path.to_path_buf(),
        })
    }
}

// Merges into an existing slice file for the same instant and interval
fn write_slice(slice: &TimeSlice, out_dir: &Path, interval_secs: u32) -> Result<WrittenSlice, SliceError> {
    let path = make_slice_file_name(out_dir, slice.slice_time, interval_secs);

    let existing = if path.is_file() {
        parquet::load_slice(&path)?
    } else {
        Vec::new()
    };
    let rows = merge_rows(existing, &slice.rows);

    parquet::save_slice(&rows, &path)?;
    info!(path = %path.display(), rows = rows.len(), "wrote time slice");

    Ok(WrittenSlice {
        slice_time: slice.slice_time,
        path,
        new_rows: slice.rows.len(),
        total_rows: rows.len(),
    })
}

impl fmt::Display for SliceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SliceOutcome::Produced(summary) => write!(f, "{}", summary),
            SliceOutcome::Empty(reason) => write!(f, "{}", reason),
        }
    }
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyReason::NoMatchingFiles => write!(f, "no files to process"),
            EmptyReason::NothingRetained {
                matched,
                stale,
                skipped,
            } => write!(
                f,
                "no files to process: {} matched, {} stale, {} skipped",
                matched, stale, skipped
            ),
        }
    }
}

impl fmt::Display for SliceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "query `{}`: {} matched, {} retained, {} stale, {} skipped",
            self.query, self.matched, self.retained, self.stale, self.skipped
        )?;

        for s in &self.slices {
            writeln!(
                f,
                "  {}  {} new / {} total  `{}`",
                s.slice_time.format("%Y-%m-%d %H:%M:%S"),
                s.new_rows,
                s.total_rows,
                s.path.display()
            )?;
        }

        Ok(())
    }
}

// -- Tests -------------------------------------------------------------------
