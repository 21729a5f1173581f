//! Year and day selection over play events.
//!
//! Both filters are plain prefix matches on `endTime`. The loader guarantees
//! every `endTime` is fixed-width `YYYY-MM-DD HH:MM`, which is what makes a
//! prefix comparison equivalent to a date comparison here. Nothing is checked
//! against a calendar: a day like `2019-13-40` matches no events.

use stats_core::models::{PlayEvent, TargetDay};

/// `true` when the event ended in `year` (a four-digit string).
pub fn matches_year(event: &PlayEvent, year: &str) -> bool {
    event.end_time.starts_with(year)
}

/// `true` when the event ended on `day`.
pub fn matches_day(event: &PlayEvent, day: &TargetDay) -> bool {
    event.end_time.starts_with(&day.prefix())
}

/// Events that ended in `year`, in source order.
pub fn filter_year<'a>(events: &'a [PlayEvent], year: &str) -> Vec<&'a PlayEvent> {
    events.iter().filter(|e| matches_year(e, year)).collect()
}

/// Events that ended on `day`, in source order.
pub fn filter_day<'a>(events: &'a [PlayEvent], day: &TargetDay) -> Vec<&'a PlayEvent> {
    let prefix = day.prefix();
    events
        .iter()
        .filter(|e| e.end_time.starts_with(&prefix))
        .collect()
}
