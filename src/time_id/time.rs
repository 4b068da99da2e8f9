// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use crate::impl_wrapper_int;
use chrono::offset::LocalResult;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A Unix date/time which contains the number of non leap milliseconds since (or before) 1970.
#[derive(
    Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd, Deserialize, Serialize,
)]
pub struct UnixMillis(pub i64);
impl_wrapper_int!(UnixMillis, i64);

impl UnixMillis {
    /// Creates a `UnixMillis` with the current date and time.
    pub fn now() -> Self {
        Self::new()
    }

    /// Formats the time as a key prefix which sorts in time order, down to the
    /// millisecond, e.g. `20240131235959042`.
    pub fn to_sortable_stamp(&self) -> String {
        self.format("%Y%m%d%H%M%S%3f")
    }
}

impl UnixTime for UnixMillis {
    /// Maximum `UnixMillis`.
    const MAX: UnixMillis = UnixMillis(i64::MAX);
    /// Minimum `UnixMillis`.
    const MIN: UnixMillis = UnixMillis(i64::MIN);

    fn from_i64(value: i64) -> Self {
        Self(value)
    }

    fn to_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UnixMillis {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        if f.alternate() {
            return f.write_str(&self.to_default_format());
        }

        Display::fmt(&self.0, f)
    }
}

/// Convenient time arithmetic.
pub trait UnixTime: Sized + Clone {
    /// Maximum time supported by notation.
    const MAX: Self;
    /// Minimum time supported by notation.
    const MIN: Self;

    /// Milliseconds per second.
    const MILLIS_PER_SECOND: u64 = 1000;
    /// Milliseconds per minute.
    const MILLIS_PER_MINUTE: u64 = 60 * Self::MILLIS_PER_SECOND;
    /// Milliseconds per hour.
    const MILLIS_PER_HOUR: u64 = 60 * Self::MILLIS_PER_MINUTE;
    /// Milliseconds per day.
    const MILLIS_PER_DAY: u64 = 24 * Self::MILLIS_PER_HOUR;

    /// Creates a `UnixTime` with the current date and time.
    fn new() -> Self {
        // Clocks before 1970 read as the epoch.
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_millis())
            .unwrap_or(0);
        Self::from_i64(millis.try_into().unwrap_or(i64::MAX))
    }

    /// Adds a duration to a Unix date/time and returns the result.
    fn add_duration(&self, duration: Duration) -> Self {
        TryInto::<i64>::try_into(duration.as_millis())
            .map(|m| self.add_signed_millis(m))
            .unwrap_or(Self::MAX)
    }

    /// Adds milliseconds to a Unix date/time and returns the result.
    fn add_millis(&self, m: u64) -> Self {
        TryInto::<i64>::try_into(m)
            .map(|m| self.add_signed_millis(m))
            .unwrap_or(Self::MAX)
    }

    /// Adds (or subtracts) millis to (or from) a Unix date/time and returns the result.
    fn add_signed_millis(&self, m: i64) -> Self {
        Self::from_i64(self.to_i64().saturating_add(m))
    }

    /// Adds days to a Unix date/time and returns the result.
    fn add_days(&self, d: u64) -> Self {
        self.add_millis(d * Self::MILLIS_PER_DAY)
    }

    /// Format as string.
    fn format(&self, fmt: &str) -> String {
        self.to_date_time_utc().format(fmt).to_string()
    }

    /// Returns time corresponding to i64.
    fn from_i64(value: i64) -> Self;

    /// Returns the milliseconds since the specified Unix date/time.
    fn millis_since(&self, unix_time: impl UnixTime) -> u64 {
        self.to_i64()
            .saturating_sub(unix_time.to_i64())
            .try_into()
            .unwrap_or(0)
    }

    /// Returns `DateTime<Utc>` corresponding to time.
    fn to_date_time_utc(&self) -> DateTime<Utc> {
        match Utc.timestamp_millis_opt(self.to_i64()) {
            LocalResult::Single(dt) => dt,
            // Out of chrono's range; don't panic.
            _ => DateTime::<Utc>::default(),
        }
    }

    /// Returns a reasonable string representation of the time.
    fn to_default_format(&self) -> String {
        self.format("%Y-%m-%d %H:%M")
    }

    /// Returns i64 corresponding to time.
    fn to_i64(&self) -> i64;
}
