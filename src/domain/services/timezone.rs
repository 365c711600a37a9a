//! Flat-offset conversion between a caller's local clock and stored UTC.
//!
//! The offset follows the JavaScript `Date.getTimezoneOffset()` convention:
//! minutes *behind* UTC, so UTC+2 is -120 and UTC-5 is +300. Converting local
//! to UTC therefore adds the offset, and UTC to local subtracts it. There is
//! deliberately no calendar awareness here; DST shifts across a repeating
//! series are outside this contract.

use chrono::{Duration, NaiveDateTime};

/// Convert a caller-local timestamp to UTC. Identity when no offset was sent.
pub fn to_utc(local: NaiveDateTime, offset_minutes: Option<i64>) -> NaiveDateTime {
    match offset_minutes {
        Some(m) => local + Duration::minutes(m),
        None => local,
    }
}

/// Convert a stored UTC timestamp to the caller's local clock.
pub fn to_local(utc: NaiveDateTime, offset_minutes: Option<i64>) -> NaiveDateTime {
    match offset_minutes {
        Some(m) => utc - Duration::minutes(m),
        None => utc,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn utc_plus_two_converts_both_ways() {
        // 14:00 local in UTC+2 (offset -120) is 12:00 UTC.
        assert_eq!(to_utc(dt(14, 0), Some(-120)), dt(12, 0));
        assert_eq!(to_local(dt(12, 0), Some(-120)), dt(14, 0));
    }

    #[test]
    fn missing_offset_is_identity() {
        assert_eq!(to_utc(dt(9, 30), None), dt(9, 30));
        assert_eq!(to_local(dt(9, 30), None), dt(9, 30));
    }

    #[test]
    fn round_trip_for_various_offsets() {
        for m in [-720, -120, -60, 0, 300, 720] {
            let t = dt(7, 45);
            assert_eq!(to_local(to_utc(t, Some(m)), Some(m)), t);
        }
    }
}
