use serde::Serialize;
use std::fmt;

const MS_PER_MINUTE: u64 = 60 * 1000;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// Whole minutes contained in `ms`, truncated.
///
/// ```
/// use stats_core::formatting::total_minutes;
///
/// assert_eq!(total_minutes(59_999), 0);
/// assert_eq!(total_minutes(60_000), 1);
/// assert_eq!(total_minutes(900_000), 15);
/// ```
pub fn total_minutes(ms: u64) -> u64 {
    ms / MS_PER_MINUTE
}

/// A cumulative play duration split into truncated hours and minutes.
///
/// Both parts are floored, never rounded, so 59 min 59 s is `0h 59min`.
///
/// ```
/// use stats_core::formatting::Playtime;
///
/// assert_eq!(Playtime::from_ms(0).to_string(), "0h 0min");
/// assert_eq!(Playtime::from_ms(900_000).to_string(), "0h 15min");
/// assert_eq!(Playtime::from_ms(3_599_999).to_string(), "0h 59min");
/// assert_eq!(Playtime::from_ms(11_520_000).to_string(), "3h 12min");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Playtime {
    pub hours: u64,
    pub minutes: u64,
}

impl Playtime {
    pub fn from_ms(ms: u64) -> Self {
        Self {
            hours: ms / MS_PER_HOUR,
            minutes: total_minutes(ms) % 60,
        }
    }
}

impl fmt::Display for Playtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}min", self.hours, self.minutes)
    }
}

/// Render a `MM-DD` grouping key as `DD.MM.`.
///
/// Keys that are not of that shape are returned unchanged.
///
/// ```
/// use stats_core::formatting::format_day_label;
///
/// assert_eq!(format_day_label("12-06"), "06.12.");
/// ```
pub fn format_day_label(month_day: &str) -> String {
    match month_day.split_once('-') {
        Some((month, day)) => format!("{}.{}.", day, month),
        None => month_day.to_string(),
    }
}
