pub mod slice;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
pub use slice::slice;

/// `<out_dir>/2015-04-15_12:03:00.60s.timeSlice.parquet`
pub fn make_slice_file_name(out_dir: &Path, slice_time: DateTime<Utc>, interval_secs: u32) -> PathBuf {
    let file_name = format!(
        "{}.{}s.timeSlice.parquet",
        slice_time.format("%Y-%m-%d_%H:%M:%S"),
        interval_secs
    );

    out_dir.join(file_name)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn should_make_slice_file_name() {
        let t = Utc.with_ymd_and_hms(2015, 4, 15, 12, 3, 0).unwrap();
        let path = make_slice_file_name(Path::new("/out"), t, 60);

        assert_eq!(path, PathBuf::from("/out/2015-04-15_12:03:00.60s.timeSlice.parquet"));
    }
}
