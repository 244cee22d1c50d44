use chrono::{DateTime, TimeZone, Utc};
use std::fmt;

/// A normalized point in time with millisecond precision.
///
/// Anything finer than a millisecond is dropped on construction so that the
/// same physical instant always compares equal, whichever shape it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalInstant(DateTime<Utc>);

impl CanonicalInstant {
    pub fn from_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(Self)
    }

    pub fn from_datetime<Tz: TimeZone>(date: &DateTime<Tz>) -> Option<Self> {
        Self::from_millis(date.timestamp_millis())
    }

    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    pub fn as_utc(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn in_zone<Tz: TimeZone>(&self, tz: &Tz) -> DateTime<Tz> {
        self.0.with_timezone(tz)
    }
}

impl fmt::Display for CanonicalInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S%.3fZ"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn truncates_sub_millisecond_precision() {
        let precise = DateTime::from_timestamp(1_718_360_000, 123_456_789).unwrap();
        let instant = CanonicalInstant::from_datetime(&precise).unwrap();
        assert_eq!(instant.timestamp_millis(), 1_718_360_000_123);
    }

    #[test]
    fn same_instant_in_different_zones_is_equal() {
        let utc = Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap();
        let shifted = utc.with_timezone(&FixedOffset::east_opt(5 * 3600 + 1800).unwrap());
        assert_eq!(
            CanonicalInstant::from_datetime(&utc),
            CanonicalInstant::from_datetime(&shifted)
        );
    }

    #[test]
    fn out_of_range_millis_is_absent() {
        assert!(CanonicalInstant::from_millis(i64::MAX).is_none());
    }

    #[test]
    fn displays_as_rfc3339_millis() {
        let instant = CanonicalInstant::from_millis(0).unwrap();
        assert_eq!(instant.to_string(), "1970-01-01T00:00:00.000Z");
    }
}
