use chrono::{DateTime, TimeZone, Utc};
use std::fmt;
use std::sync::Arc;

use super::instant::CanonicalInstant;

/// Something that can turn itself into a native date, like the document
/// database client's own timestamp type.
pub trait DateSource: fmt::Debug + Send + Sync {
    fn to_date(&self) -> DateTime<Utc>;
}

/// A timestamp as it arrives from outside, before normalization.
///
/// The ingestion boundary picks the variant; nothing downstream inspects
/// shapes again.
#[derive(Debug, Clone, Default)]
pub enum RawTimestamp {
    /// A native date value.
    Native(DateTime<Utc>),
    /// A database client timestamp exposing a date conversion.
    Convertible(Arc<dyn DateSource>),
    /// A plain record carrying Unix epoch seconds.
    EpochSeconds { seconds: i64 },
    /// Null, undefined or otherwise empty. Usually "not loaded yet".
    #[default]
    Missing,
    /// A value of a shape we do not know how to read.
    Unrecognized,
}

impl RawTimestamp {
    pub fn convertible<S: DateSource + 'static>(source: S) -> Self {
        RawTimestamp::Convertible(Arc::new(source))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, RawTimestamp::Missing)
    }

    pub fn is_unrecognized(&self) -> bool {
        matches!(self, RawTimestamp::Unrecognized)
    }

    pub fn to_instant(&self) -> Option<CanonicalInstant> {
        to_instant(self)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for RawTimestamp {
    fn from(date: DateTime<Tz>) -> Self {
        RawTimestamp::Native(date.with_timezone(&Utc))
    }
}

impl<T: Into<RawTimestamp>> From<Option<T>> for RawTimestamp {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(RawTimestamp::Missing)
    }
}

/// Normalize a raw timestamp to a canonical instant.
///
/// Never fails: missing and unreadable values both come back as `None`.
pub fn to_instant(raw: &RawTimestamp) -> Option<CanonicalInstant> {
    match raw {
        RawTimestamp::Missing => None,
        RawTimestamp::Native(date) => CanonicalInstant::from_datetime(date),
        RawTimestamp::Convertible(source) => CanonicalInstant::from_datetime(&source.to_date()),
        RawTimestamp::EpochSeconds { seconds } => seconds
            .checked_mul(1000)
            .and_then(CanonicalInstant::from_millis),
        RawTimestamp::Unrecognized => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Stub(DateTime<Utc>);

    impl DateSource for Stub {
        fn to_date(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn at(millis: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(millis).unwrap()
    }

    #[test]
    fn native_date_is_returned_unchanged() {
        let date = at(1_718_447_400_250);
        let instant = to_instant(&RawTimestamp::from(date)).unwrap();
        assert_eq!(instant.as_utc(), date);
    }

    #[test]
    fn convertible_source_uses_its_conversion() {
        let date = at(1_718_447_400_000);
        let instant = to_instant(&RawTimestamp::convertible(Stub(date))).unwrap();
        assert_eq!(instant.as_utc(), date);
    }

    #[test]
    fn epoch_seconds_scale_to_millis() {
        for seconds in [0_i64, 1, -1, 1_718_447_400, -86_400] {
            let instant = to_instant(&RawTimestamp::EpochSeconds { seconds }).unwrap();
            assert_eq!(instant.timestamp_millis(), seconds * 1000);
        }
    }

    #[test]
    fn epoch_seconds_overflow_is_absent() {
        assert!(to_instant(&RawTimestamp::EpochSeconds { seconds: i64::MAX }).is_none());
        assert!(to_instant(&RawTimestamp::EpochSeconds { seconds: i64::MAX / 1000 }).is_none());
    }

    #[test]
    fn missing_and_unrecognized_are_absent() {
        assert!(to_instant(&RawTimestamp::Missing).is_none());
        assert!(to_instant(&RawTimestamp::Unrecognized).is_none());
        assert!(to_instant(&RawTimestamp::from(None::<DateTime<Utc>>)).is_none());
    }

    #[test]
    fn same_instant_from_every_variant_is_equal() {
        let seconds = 1_718_447_400;
        let native = RawTimestamp::from(at(seconds * 1000));
        let convertible = RawTimestamp::convertible(Stub(at(seconds * 1000)));
        let record = RawTimestamp::EpochSeconds { seconds };

        let expected = to_instant(&native);
        assert!(expected.is_some());
        assert_eq!(to_instant(&convertible), expected);
        assert_eq!(to_instant(&record), expected);
    }
}
