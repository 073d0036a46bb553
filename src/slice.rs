//! Groups snapped observation files into time slices.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::observation::ObservationFile;

/// All retained files that snap to the same instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlice {
    pub slice_time: DateTime<Utc>,
    pub rows: Vec<SliceRow>,
}

/// One observation file as recorded in a time-slice file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceRow {
    pub file_path: String,
    pub file_name: String,
    pub observed_at: DateTime<Utc>,
    pub slice_time: DateTime<Utc>,
    pub size_bytes: u64,
}

impl From<&ObservationFile> for SliceRow {
    fn from(file: &ObservationFile) -> Self {
        SliceRow {
            file_path: file.path.to_string_lossy().to_string(),
            file_name: file.file_name.clone(),
            observed_at: file.observed_at,
            slice_time: file.slice_time,
            size_bytes: file.size_bytes,
        }
    }
}

/// Slices in chronological order, rows within a slice ordered by path.
pub fn build_slices(files: &[ObservationFile]) -> Vec<TimeSlice> {
    let mut grouped: BTreeMap<DateTime<Utc>, Vec<SliceRow>> = BTreeMap::new();

    for file in files {
        grouped.entry(file.slice_time).or_default().push(SliceRow::from(file));
    }

    grouped
        .into_iter()
        .map(|(slice_time, mut rows)| {
            rows.sort_by(|a, b| a.file_path.cmp(&b.file_path));
            TimeSlice { slice_time, rows }
        })
        .collect()
}

/// Combines rows already on disk with freshly observed ones. A fresh row
/// replaces any existing row for the same file path.
pub fn merge_rows(existing: Vec<SliceRow>, fresh: &[SliceRow]) -> Vec<SliceRow> {
    let mut by_path: BTreeMap<String, SliceRow> = existing
        .into_iter()
        .map(|row| (row.file_path.clone(), row))
        .collect();

    for row in fresh {
        by_path.insert(row.file_path.clone(), row.clone());
    }

    by_path.into_values().collect()
}

// -- Tests -------------------------------------------------------------------
