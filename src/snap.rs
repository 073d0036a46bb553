//! Rounding timestamps to the nearest interval boundary.
//!
//! Boundaries are multiples of the interval counted from the Unix epoch, so a
//! 60 second interval snaps to whole minutes and 900 seconds to quarter hours.

use chrono::{DateTime, Utc};

use crate::{config::TieRule, error::SliceError};

/// Snaps `t` to the nearest multiple of `interval_secs`.
///
/// Sub-second precision is dropped before rounding. `interval_secs` must be
/// non-zero; `SliceConfig::validate` guarantees this for configured runs.
pub fn snap(t: DateTime<Utc>, interval_secs: u32, tie: TieRule) -> Result<DateTime<Utc>, SliceError> {
    let secs = snap_secs(t.timestamp(), i64::from(interval_secs.max(1)), tie);

    DateTime::from_timestamp(secs, 0).ok_or(SliceError::TimestampOutOfRange { secs })
}

fn snap_secs(secs: i64, interval: i64, tie: TieRule) -> i64 {
    let index = secs.div_euclid(interval);
    let floor = index * interval;
    let twice_rem = 2 * (secs - floor);

    let round_up = match twice_rem.cmp(&interval) {
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Equal => match tie {
            TieRule::HalfUp => true,
            TieRule::HalfEven => index.rem_euclid(2) != 0,
        },
    };

    if round_up {
        floor + interval
    } else {
        floor
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2015, 4, 15, h, m, s).unwrap()
    }

    #[test]
    fn should_round_down_below_half() {
        let snapped = snap(at(12, 3, 27), 60, TieRule::HalfUp).unwrap();
        assert_eq!(snapped, at(12, 3, 0));
    }

    #[test]
    fn should_round_up_above_half() {
        let snapped = snap(at(12, 3, 31), 60, TieRule::HalfEven).unwrap();
        assert_eq!(snapped, at(12, 4, 0));
    }

    #[test]
    fn should_round_tie_up_with_half_up() {
        assert_eq!(snap(at(12, 3, 30), 60, TieRule::HalfUp).unwrap(), at(12, 4, 0));
        assert_eq!(snap(at(12, 2, 30), 60, TieRule::HalfUp).unwrap(), at(12, 3, 0));
    }

    #[test]
    fn should_round_tie_to_even_with_half_even() {
        // 12:03 is an odd minute, 12:04 an even one
        assert_eq!(snap(at(12, 3, 30), 60, TieRule::HalfEven).unwrap(), at(12, 4, 0));
        assert_eq!(snap(at(12, 2, 30), 60, TieRule::HalfEven).unwrap(), at(12, 2, 0));
    }

    #[test]
    fn should_be_idempotent() {
        for tie in [TieRule::HalfUp, TieRule::HalfEven] {
            for interval in [1, 60, 300, 900, 3600] {
                for t in [at(0, 0, 0), at(12, 3, 27), at(12, 7, 30), at(23, 59, 59)] {
                    let once = snap(t, interval, tie).unwrap();
                    let twice = snap(once, interval, tie).unwrap();
                    assert_eq!(once, twice);
                }
            }
        }
    }

    #[test]
    fn should_snap_to_quarter_hours() {
        assert_eq!(snap(at(12, 7, 29), 900, TieRule::HalfUp).unwrap(), at(12, 0, 0));
        assert_eq!(snap(at(12, 7, 30), 900, TieRule::HalfUp).unwrap(), at(12, 15, 0));
        assert_eq!(snap(at(23, 59, 0), 900, TieRule::HalfUp).unwrap(), Utc.with_ymd_and_hms(2015, 4, 16, 0, 0, 0).unwrap());
    }

    #[test]
    fn should_snap_before_epoch() {
        assert_eq!(snap_secs(-90, 60, TieRule::HalfUp), -60);
        assert_eq!(snap_secs(-90, 60, TieRule::HalfEven), -120);
        assert_eq!(snap_secs(-31, 60, TieRule::HalfUp), -60);
    }

    #[test]
    fn should_drop_sub_seconds() {
        let t = at(12, 3, 29) + chrono::TimeDelta::milliseconds(900);
        assert_eq!(snap(t, 60, TieRule::HalfUp).unwrap(), at(12, 3, 0));
    }
}
