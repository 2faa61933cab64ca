//! Fixed-width rendering of durations.

use crate::types::Seconds;

const SECONDS_PER_DAY: Seconds = 86_400;
const SECONDS_PER_HOUR: Seconds = 3600;
const SECONDS_PER_MINUTE: Seconds = 60;

/// A duration broken down into days, hours, minutes and seconds.
///
/// Hours are in `0..24`, minutes and seconds in `0..60`; days are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DurationComponents {
    pub days: Seconds,
    pub hours: Seconds,
    pub minutes: Seconds,
    pub seconds: Seconds,
}

impl DurationComponents {
    /// Decomposes a total number of seconds.
    #[must_use]
    pub fn from_seconds(total: Seconds) -> Self {
        let days = total / SECONDS_PER_DAY;
        let rest = total % SECONDS_PER_DAY;
        let hours = rest / SECONDS_PER_HOUR;
        let rest = rest % SECONDS_PER_HOUR;
        Self {
            days,
            hours,
            minutes: rest / SECONDS_PER_MINUTE,
            seconds: rest % SECONDS_PER_MINUTE,
        }
    }

    /// Recombines the components into total seconds.
    #[must_use]
    pub fn total_seconds(&self) -> Seconds {
        self.days * SECONDS_PER_DAY
            + self.hours * SECONDS_PER_HOUR
            + self.minutes * SECONDS_PER_MINUTE
            + self.seconds
    }
}

impl std::fmt::Display for DurationComponents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:>2}d {:>2}h {:>2}m {:>2}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Formats seconds as `"<d>d <h>h <m>m <s>s"` with every number padded to
/// two characters.
///
/// All four fields are always present, so consecutive frames of a countdown
/// have the same width.
///
/// # Example
///
/// ```rust
/// use notify_timer::duration::format;
///
/// assert_eq!(format(0), " 0d  0h  0m  0s");
/// assert_eq!(format(300), " 0d  0h  5m  0s");
/// ```
#[must_use]
pub fn format(seconds: Seconds) -> String {
    DurationComponents::from_seconds(seconds).to_string()
}
