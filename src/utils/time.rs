// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Time utilities.
//!
//! This module provides the [`Clock`] seam used for every "now" in the crate,
//! and the text format timestamps are persisted in.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use std::sync::Mutex;

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock, truncated to the precision timestamps are persisted with.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(6)
    }
}

/// Hand-driven clock for tests and replay.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Serde adapter for persisted timestamps.
///
/// Writes RFC 3339 in UTC with microseconds. Reads RFC 3339 with any offset,
/// and also offset-less ISO-8601 (`2024-05-01T10:15:00.123456`) as written by
/// older deployments, which is wall time in the host's local zone.
pub mod timestamp {
    use chrono::{DateTime, Duration, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    pub fn parse(text: &str) -> Option<DateTime<Utc>> {
        parse_in(text, &Local)
    }

    /// Like [`parse`], but offset-less text is read as wall time in `zone`.
    ///
    /// Ambiguous wall times take the earlier instant; times skipped by a
    /// forward transition are read one hour later.
    pub fn parse_in<Tz: TimeZone>(text: &str, zone: &Tz) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(dt.with_timezone(&Utc));
        }
        let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
        zone.from_local_datetime(&naive)
            .earliest()
            .or_else(|| zone.from_local_datetime(&(naive + Duration::hours(1))).earliest())
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        parse(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    #[test]
    fn test_timestamp_round_trip_same_instant() {
        let t = Utc.timestamp_opt(1_714_558_500, 123_456_000).unwrap();
        let text = timestamp::format(&t);
        assert_eq!(text, "2024-05-01T10:15:00.123456Z");
        assert_eq!(timestamp::parse(&text), Some(t));
    }

    #[test]
    fn test_timestamp_accepts_naive_iso() {
        let parsed = timestamp::parse_in("2024-05-01T10:15:00", &Utc).unwrap();
        assert_eq!(parsed, Utc.timestamp_opt(1_714_558_500, 0).unwrap());
        assert!(timestamp::parse("yesterday").is_none());
    }

    #[test]
    fn test_naive_timestamp_is_local_wall_time() {
        let kolkata = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
        let parsed = timestamp::parse_in("2024-05-01T10:20:00", &kolkata).unwrap();
        assert_eq!(timestamp::format(&parsed), "2024-05-01T04:50:00.000000Z");

        let new_york = FixedOffset::west_opt(4 * 3600).unwrap();
        let parsed = timestamp::parse_in("2024-05-01T10:20:00.250000", &new_york).unwrap();
        assert_eq!(timestamp::format(&parsed), "2024-05-01T14:20:00.250000Z");
    }

    #[test]
    fn test_explicit_offset_ignores_zone() {
        let kolkata = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
        let parsed = timestamp::parse_in("2024-05-01T10:15:00.000000Z", &kolkata).unwrap();
        assert_eq!(parsed, Utc.timestamp_opt(1_714_558_500, 0).unwrap());
    }

    #[test]
    fn test_timestamp_normalizes_offset() {
        let parsed = timestamp::parse("2024-05-01T12:15:00+02:00").unwrap();
        assert_eq!(parsed, Utc.timestamp_opt(1_714_558_500, 0).unwrap());
    }

    #[test]
    fn test_manual_clock_advances() {
        let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let clock = ManualClock::new(start);
        clock.advance(Duration::minutes(5));
        assert_eq!(clock.now(), start + Duration::minutes(5));
        clock.set(start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn test_system_clock_has_microsecond_precision() {
        let now = SystemClock.now();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000, 0);
    }
}
