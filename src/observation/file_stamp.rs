//! Extracting the observation timestamp embedded in a file name.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::{Captures, Regex};

static DASHED_RE: OnceLock<Regex> = OnceLock::new();
static COMPACT_RE: OnceLock<Regex> = OnceLock::new();

/// Finds the first timestamp in `file_name`, read as UTC.
///
/// Accepts `2015-04-15_12:03:27`, `2015-04-15T12-03-27`, `2015-04-15 1203`
/// and the compact `20150415_120327` / `201504151203`. Returns `None` when
/// no layout matches or the fields do not form a real date and time.
pub fn parse_file_stamp(file_name: &str) -> Option<DateTime<Utc>> {
    let dashed = DASHED_RE.get_or_init(|| {
        Regex::new(r"(\d{4})-(\d{2})-(\d{2})[_T ](\d{2})[:\-]?(\d{2})(?:[:\-]?(\d{2}))?").unwrap()
    });
    let compact = COMPACT_RE.get_or_init(|| {
        Regex::new(r"(?:^|\D)(\d{4})(\d{2})(\d{2})[_T]?(\d{2})(\d{2})(\d{2})?(?:\D|$)").unwrap()
    });

    dashed
        .captures(file_name)
        .and_then(|caps| from_captures(&caps))
        .or_else(|| compact.captures(file_name).and_then(|caps| from_captures(&caps)))
}

fn from_captures(caps: &Captures) -> Option<DateTime<Utc>> {
    let field = |i: usize| -> Option<u32> { caps.get(i)?.as_str().parse().ok() };

    let year = i32::try_from(field(1)?).ok()?;
    let second = caps.get(6).map_or(Some(0), |_| field(6))?;

    NaiveDate::from_ymd_opt(year, field(2)?, field(3)?)?
        .and_hms_opt(field(4)?, field(5)?, second)
        .map(|dt| dt.and_utc())
}

// -- Tests -------------------------------------------------------------------
