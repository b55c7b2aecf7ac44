use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Seconds from the UNIX epoch back to 0001-01-01T00:00:00Z.
const ZERO_UNIX_SECS: i64 = -62_135_596_800;

/// UTC wall-clock instant, stored and rendered with millisecond precision.
///
/// Timestamps cross the RPC boundary as their RFC 3339 rendering
/// (`2021-01-12T10:15:30.123Z`). The zero timestamp (`0001-01-01T00:00:00Z`)
/// marks a value that was never assigned.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current instant, truncated to milliseconds.
    pub fn now() -> Self {
        Self(Utc::now().trunc_subsecs(3))
    }

    /// The zero timestamp.
    pub fn zero() -> Self {
        Self(DateTime::from_timestamp(ZERO_UNIX_SECS, 0).unwrap_or_default())
    }

    /// Returns `true` for the zero timestamp.
    pub fn is_zero(&self) -> bool {
        self.0.timestamp() == ZERO_UNIX_SECS && self.0.timestamp_subsec_nanos() == 0
    }

    /// Milliseconds since the UNIX epoch.
    pub fn unix_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt.trunc_subsecs(3))
    }
}

impl FromStr for Timestamp {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self::from(dt.with_timezone(&Utc)))
            .map_err(|e| TypeError::InvalidTimestamp(format!("{s}: {e}")))
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({self})")
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_is_after_2020() {
        let ts = Timestamp::now();
        assert!(ts.unix_millis() > 1_577_836_800_000);
        assert!(!ts.is_zero());
    }

    #[test]
    fn zero_renders_as_year_one() {
        let zero = Timestamp::zero();
        assert!(zero.is_zero());
        assert_eq!(zero.to_string(), "0001-01-01T00:00:00.000Z");
    }

    #[test]
    fn zero_is_smallest() {
        assert!(Timestamp::zero() < Timestamp::now());
    }

    #[test]
    fn text_roundtrip_is_lossless() {
        let ts = Timestamp::now();
        let parsed: Timestamp = ts.to_string().parse().unwrap();
        assert_eq!(parsed, ts);
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = "yesterday".parse::<Timestamp>().unwrap_err();
        assert!(matches!(err, TypeError::InvalidTimestamp(_)));
    }

    #[test]
    fn serde_roundtrip() {
        let ts = Timestamp::now();
        let json = serde_json::to_string(&ts).unwrap();
        let parsed: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ts);
    }
}
