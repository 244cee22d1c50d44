use chrono::{Local, TimeZone};
use std::fmt;

use super::clock::{Clock, SystemClock};
use super::instant::CanonicalInstant;
use super::locale::DisplayLocale;
use super::raw::RawTimestamp;

/// Short label shown next to a list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayLabel {
    Time(String),
    Yesterday,
    Date(String),
}

impl DisplayLabel {
    pub fn as_str(&self) -> &str {
        match self {
            DisplayLabel::Time(s) | DisplayLabel::Date(s) => s,
            DisplayLabel::Yesterday => "Yesterday",
        }
    }
}

impl fmt::Display for DisplayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which calendar day an instant falls on, relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayBucket {
    Today,
    Yesterday,
    Other,
}

/// Renders raw timestamps as list labels against an injected clock and zone.
#[derive(Debug, Clone)]
pub struct RelativeFormatter<C, Tz> {
    clock: C,
    tz: Tz,
    locale: DisplayLocale,
}

impl RelativeFormatter<SystemClock, Local> {
    /// System clock, local zone, environment locale.
    pub fn system() -> Self {
        Self::new(SystemClock, Local, DisplayLocale::from_env())
    }
}

impl<C, Tz> RelativeFormatter<C, Tz>
where
    C: Clock,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    pub fn new(clock: C, tz: Tz, locale: DisplayLocale) -> Self {
        Self { clock, tz, locale }
    }

    pub fn locale(&self) -> &DisplayLocale {
        &self.locale
    }

    /// Bucket by local calendar date. Not a rolling 24 hour window.
    pub fn classify(&self, instant: &CanonicalInstant) -> DayBucket {
        let today = self.clock.now().with_timezone(&self.tz).date_naive();
        let date = instant.in_zone(&self.tz).date_naive();

        if date == today {
            DayBucket::Today
        // previous calendar date, not now - 24h: the two disagree on DST days
        } else if today.pred_opt() == Some(date) {
            DayBucket::Yesterday
        } else {
            DayBucket::Other
        }
    }

    pub fn label_instant(&self, instant: &CanonicalInstant) -> DisplayLabel {
        let local = instant.in_zone(&self.tz);
        match self.classify(instant) {
            DayBucket::Today => DisplayLabel::Time(self.locale.format_time(&local)),
            DayBucket::Yesterday => DisplayLabel::Yesterday,
            DayBucket::Other => DisplayLabel::Date(self.locale.format_date(&local)),
        }
    }

    /// `None` when the timestamp is missing or unreadable.
    pub fn label(&self, raw: &RawTimestamp) -> Option<DisplayLabel> {
        raw.to_instant().map(|instant| self.label_instant(&instant))
    }

    /// Same as [`label`](Self::label) but collapses absence to an empty string.
    pub fn display_label(&self, raw: &RawTimestamp) -> String {
        self.label(raw).map(|l| l.to_string()).unwrap_or_default()
    }
}

/// Label with the system clock, local zone and environment locale.
pub fn to_display_label(raw: &RawTimestamp) -> String {
    RelativeFormatter::system().display_label(raw)
}
