//! Save and load time-slice rows in the _parquet_ file format.

use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Arc,
};

use arrow::{
    array::{ArrayRef, RecordBatch, StringArray, TimestampSecondArray, UInt64Array},
    datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit},
    error::ArrowError,
};
use chrono::{DateTime, Utc};
use parquet::{
    arrow::{arrow_reader::ParquetRecordBatchReaderBuilder, ArrowWriter},
    file::properties::WriterProperties,
};
use tempfile::NamedTempFile;

use crate::{error::SliceError, slice::SliceRow};

const UTC: &str = "UTC";

fn slice_schema() -> SchemaRef {
    let timestamp = DataType::Timestamp(TimeUnit::Second, Some(UTC.into()));

    Arc::new(Schema::new(vec![
        Field::new("file_path", DataType::Utf8, false),
        Field::new("file_name", DataType::Utf8, false),
        Field::new("observed_at", timestamp.clone(), false),
        Field::new("slice_time", timestamp, false),
        Field::new("size_bytes", DataType::UInt64, false),
    ]))
}

/// Writes `rows` to `file_path`, replacing any existing file.
///
/// The rows go to a temporary file next to the target which is renamed into
/// place once the parquet footer is written.
pub fn save_slice(rows: &[SliceRow], file_path: &Path) -> Result<(), SliceError> {
    let dir = file_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let tmp = NamedTempFile::new_in(dir)?;

    let schema = slice_schema();
    let props = WriterProperties::builder()
        .set_compression(parquet::basic::Compression::SNAPPY)
        .build();

    let mut writer = ArrowWriter::try_new(tmp.reopen()?, schema.clone(), Some(props))?;

    let num_rows = rows.len();

    let mut file_paths = Vec::with_capacity(num_rows);
    let mut file_names = Vec::with_capacity(num_rows);
    let mut observed = Vec::with_capacity(num_rows);
    let mut slice_times = Vec::with_capacity(num_rows);
    let mut sizes = Vec::with_capacity(num_rows);

    for r in rows {
        file_paths.push(r.file_path.as_str());
        file_names.push(r.file_name.as_str());
        observed.push(r.observed_at.timestamp());
        slice_times.push(r.slice_time.timestamp());
        sizes.push(r.size_bytes);
    }

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(file_paths)),
        Arc::new(StringArray::from(file_names)),
        Arc::new(TimestampSecondArray::from(observed).with_timezone(UTC)),
        Arc::new(TimestampSecondArray::from(slice_times).with_timezone(UTC)),
        Arc::new(UInt64Array::from(sizes)),
    ];

    let batch = RecordBatch::try_new(schema, columns)?;

    writer.write(&batch)?;
    writer.close()?;

    tmp.persist(file_path)?;

    Ok(())
}

/// Reads back every row of a slice file written by [`save_slice`].
pub fn load_slice(file_path: &Path) -> Result<Vec<SliceRow>, SliceError> {
    let file = File::open(file_path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut rows = Vec::new();

    for batch in reader {
        let batch = batch?;

        let file_paths = column::<StringArray>(&batch, "file_path")?;
        let file_names = column::<StringArray>(&batch, "file_name")?;
        let observed = column::<TimestampSecondArray>(&batch, "observed_at")?;
        let slice_times = column::<TimestampSecondArray>(&batch, "slice_time")?;
        let sizes = column::<UInt64Array>(&batch, "size_bytes")?;

        for i in 0..batch.num_rows() {
            rows.push(SliceRow {
                file_path: file_paths.value(i).to_string(),
                file_name: file_names.value(i).to_string(),
                observed_at: from_secs(observed.value(i))?,
                slice_time: from_secs(slice_times.value(i))?,
                size_bytes: sizes.value(i),
            });
        }
    }

    Ok(rows)
}

fn column<'a, T: 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T, SliceError> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<T>())
        .ok_or_else(|| {
            ArrowError::SchemaError(format!("slice file has no usable `{}` column", name)).into()
        })
}

fn from_secs(secs: i64) -> Result<DateTime<Utc>, SliceError> {
    DateTime::from_timestamp(secs, 0).ok_or(SliceError::TimestampOutOfRange { secs })
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::TimeZone;
    use tempfile::TempDir;

    use super::*;

    fn row(name: &str, second: u32) -> SliceRow {
        SliceRow {
            file_path: format!("/in/{}", name),
            file_name: name.to_string(),
            observed_at: Utc.with_ymd_and_hms(2015, 4, 15, 12, 3, second).unwrap(),
            slice_time: Utc.with_ymd_and_hms(2015, 4, 15, 12, 3, 0).unwrap(),
            size_bytes: 42,
        }
    }

    #[test]
    fn should_save_and_load_slice() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("2015-04-15_12:03:00.60s.timeSlice.parquet");
        let rows = vec![row("a.csv", 1), row("b.csv", 27)];

        save_slice(&rows, &path).unwrap();

        assert_eq!(load_slice(&path).unwrap(), rows);
    }

    #[test]
    fn should_leave_only_the_slice_file_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("slice.parquet");

        save_slice(&[row("a.csv", 1)], &path).unwrap();
        save_slice(&[row("b.csv", 2)], &path).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(load_slice(&path).unwrap(), vec![row("b.csv", 2)]);
    }

    #[test]
    fn should_fail_to_load_non_parquet_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bogus.parquet");
        fs::write(&path, "not parquet").unwrap();

        assert!(matches!(load_slice(&path), Err(SliceError::Parquet(_))));
    }
}
