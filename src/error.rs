//! Error types for the time-slice operation.

use std::{fmt, path::PathBuf};

/// Which of the two directories a precondition refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryRole {
    Input,
    Output,
}

impl fmt::Display for DirectoryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryRole::Input => write!(f, "input"),
            DirectoryRole::Output => write!(f, "output"),
        }
    }
}

/// Error type for all fallible operations while building time slices.
#[derive(Debug, thiserror::Error)]
pub enum SliceError {
    /// The input or output directory does not exist. Reported as a warning,
    /// nothing is written.
    #[error("{role} directory `{}` does not exist", path.display())]
    MissingDirectory { role: DirectoryRole, path: PathBuf },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A snapped timestamp fell outside the range chrono can represent.
    #[error("timestamp {secs}s is out of range")]
    TimestampOutOfRange { secs: i64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),

    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("failed to move slice file into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}

impl SliceError {
    pub fn is_missing_directory(&self) -> bool {
        matches!(self, SliceError::MissingDirectory { .. })
    }
}

// -- Tests -------------------------------------------------------------------
