//! Handles serialising and saving time slices to disk in the _parquet_ file format.

pub mod slice;

pub use slice::{load_slice, save_slice};
