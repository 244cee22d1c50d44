pub mod clock;
pub mod instant;
pub mod label;
pub mod locale;
pub mod raw;

pub use clock::{Clock, FixedClock, SystemClock};
pub use instant::CanonicalInstant;
pub use label::{to_display_label, DayBucket, DisplayLabel, RelativeFormatter};
pub use locale::{DisplayLocale, HourCycle, LocaleError};
pub use raw::{to_instant, DateSource, RawTimestamp};
