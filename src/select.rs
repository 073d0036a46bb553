//! Lists the input directory, keeps the files matching a query label and
//! inspects them concurrently.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use futures::{stream, FutureExt, StreamExt};
use tracing::{debug, warn};

use crate::{
    cli::create_progress_bar,
    config::SliceConfig,
    error::SliceError,
    observation::{parse_file_stamp, Inspected, ObservationFile, SkipReason},
    snap::snap,
};

/// Matched files split by what inspection made of them, each list ordered
/// by path.
#[derive(Debug, Default)]
pub struct Selection {
    pub retained: Vec<ObservationFile>,
    pub stale: Vec<(PathBuf, DateTime<Utc>)>,
    pub skipped: Vec<(PathBuf, SkipReason)>,
}

impl Selection {
    pub fn matched(&self) -> usize {
        self.retained.len() + self.stale.len() + self.skipped.len()
    }
}

impl From<Vec<Inspected>> for Selection {
    fn from(mut inspected: Vec<Inspected>) -> Self {
        inspected.sort_by(|a, b| a.path().cmp(b.path()));

        let mut selection = Selection::default();
        for item in inspected {
            match item {
                Inspected::Retained(file) => selection.retained.push(file),
                Inspected::Stale { path, observed_at } => {
                    debug!(path = %path.display(), %observed_at, "dropping stale file");
                    selection.stale.push((path, observed_at));
                }
                Inspected::Skipped { path, reason } => {
                    warn!(path = %path.display(), %reason, "skipping file");
                    selection.skipped.push((path, reason));
                }
            }
        }

        selection
    }
}

/// Regular files directly inside `in_dir` whose name contains `query`.
pub fn list_matching(in_dir: &Path, query: &str) -> Result<Vec<PathBuf>, SliceError> {
    let mut matches = Vec::new();

    for entry in fs::read_dir(in_dir)? {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        if entry.file_name().to_string_lossy().contains(query) {
            matches.push(path);
        }
    }

    matches.sort();

    Ok(matches)
}

/// Inspects every file, at most `config.workers` at a time.
pub async fn inspect_all(files: Vec<PathBuf>, config: SliceConfig) -> Selection {
    let progress_bar = create_progress_bar(files.len() as u64, "Inspecting files".to_string());

    let mut results = stream::iter(files)
        .map(|file| {
            let path = file.clone();
            tokio::spawn(inspect(file, config)).map(move |joined| {
                joined.unwrap_or_else(|e| {
                    warn!("Task join error: {:?}", e);
                    Inspected::Skipped {
                        path,
                        reason: SkipReason::Unreadable(e.to_string()),
                    }
                })
            })
        })
        .buffer_unordered(config.workers.max(1));

    let mut inspected = Vec::new();
    while let Some(item) = results.next().await {
        progress_bar.inc(1);
        inspected.push(item);
    }
    progress_bar.finish_with_message("Inspection complete");

    Selection::from(inspected)
}

/// Parses, filters, stats and snaps a single file.
pub async fn inspect(path: PathBuf, config: SliceConfig) -> Inspected {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let Some(observed_at) = parse_file_stamp(&file_name) else {
        return Inspected::Skipped {
            path,
            reason: SkipReason::NoTimestamp,
        };
    };

    if observed_at < config.oldest {
        return Inspected::Stale { path, observed_at };
    }

    let size_bytes = match tokio::fs::metadata(&path).await {
        Ok(metadata) => metadata.len(),
        Err(e) => {
            return Inspected::Skipped {
                path,
                reason: SkipReason::Unreadable(e.to_string()),
            }
        }
    };

    if size_bytes == 0 {
        return Inspected::Skipped {
            path,
            reason: SkipReason::Empty,
        };
    }

    match snap(observed_at, config.interval_secs, config.tie) {
        Ok(slice_time) => Inspected::Retained(ObservationFile {
            path,
            file_name,
            observed_at,
            size_bytes,
            slice_time,
        }),
        Err(e) => Inspected::Skipped {
            path,
            reason: SkipReason::Unreadable(e.to_string()),
        },
    }
}

// -- Tests -------------------------------------------------------------------
