//! Time-of-day helpers.
//!
//! Schedule times are wall-clock times within a single day, so they are
//! carried as `NaiveTime` and written as `HH:MM` in config and JSON.

use chrono::{Duration, NaiveTime};

/// Parse an `HH:MM` string.
pub fn parse_hhmm(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").ok()
}

/// Format as `HH:MM`.
pub fn format_hhmm(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// Shorthand for building a time that is known to be valid.
pub(crate) fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

/// Whole minutes from `start` to `end`; zero when `end` is not later.
pub fn minutes_between(start: NaiveTime, end: NaiveTime) -> i64 {
    (end - start).num_minutes().max(0)
}

/// Advance `from` by `minutes`, never going past `limit`.
///
/// Wrapping past midnight counts as going past the limit.
pub fn advance(from: NaiveTime, minutes: i64, limit: NaiveTime) -> NaiveTime {
    let (next, wrapped) = from.overflowing_add_signed(Duration::minutes(minutes));
    if wrapped != 0 || next > limit {
        limit
    } else {
        next
    }
}

/// Serde adapter for `NaiveTime` as `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_hhmm(*t))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_hhmm(&raw)
            .ok_or_else(|| de::Error::custom(format!("expected HH:MM time, got '{raw}'")))
    }
}
