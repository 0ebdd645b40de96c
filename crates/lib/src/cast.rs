//! Basic-type casts applied on read.
//!
//! Some values travel as a simpler JSON type than the one callers want back. A calendar
//! value, for instance, is transmitted as epoch milliseconds. [`Packet::get_cast`] reads
//! the transmitted form, converts it once, and memoizes the converted value;
//! [`Timestamp`] is the built-in example.
//!
//! [`Packet::get_cast`]: crate::Packet::get_cast

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A UTC calendar instant that serializes as epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(#[serde(with = "chrono::serde::ts_milliseconds")] DateTime<Utc>);

impl Timestamp {
    /// Build from epoch milliseconds. `None` if out of chrono's range.
    pub fn from_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(Self)
    }

    /// Current wall-clock time, truncated to milliseconds.
    pub fn now() -> Self {
        let now = Utc::now();
        Self::from_millis(now.timestamp_millis()).unwrap_or(Self(now))
    }

    pub fn millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    pub fn datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(timestamp: Timestamp) -> Self {
        timestamp.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

/// Cast used by [`Packet::get_timestamp`](crate::Packet::get_timestamp).
pub(crate) fn epoch_millis_to_timestamp(millis: i64) -> Option<Timestamp> {
    let timestamp = Timestamp::from_millis(millis);
    if timestamp.is_none() {
        tracing::warn!(millis, "Epoch milliseconds out of calendar range");
    }
    timestamp
}
