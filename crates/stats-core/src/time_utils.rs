use chrono::{Duration, NaiveDateTime};

/// `strftime` layout of an export record's `endTime`.
pub const END_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Length of a well-formed `endTime` string.
const END_TIME_LEN: usize = 16;

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse an `endTime` string (`YYYY-MM-DD HH:MM`) into a naive timestamp
/// with zero seconds.
///
/// The layout is checked to be fixed width as well, because the year and day
/// filters compare string prefixes and a short field would shift them.
/// Returns `None` for anything else.
pub fn parse_end_time(s: &str) -> Option<NaiveDateTime> {
    if !is_fixed_width(s) {
        return None;
    }
    NaiveDateTime::parse_from_str(s, END_TIME_FORMAT).ok()
}

fn is_fixed_width(s: &str) -> bool {
    if s.len() != END_TIME_LEN {
        return false;
    }
    s.bytes().enumerate().all(|(i, b)| match i {
        4 | 7 => b == b'-',
        10 => b == b' ',
        13 => b == b':',
        _ => b.is_ascii_digit(),
    })
}

// ── Start-time inference ──────────────────────────────────────────────────────

/// Infer when a play started by subtracting `ms_played` from its end time.
///
/// Returns `None` when `end_time` does not parse or the subtraction leaves
/// the representable range.
pub fn infer_start_time(end_time: &str, ms_played: u64) -> Option<NaiveDateTime> {
    let end = parse_end_time(end_time)?;
    let played = i64::try_from(ms_played)
        .ok()
        .and_then(Duration::try_milliseconds)?;
    end.checked_sub_signed(played)
}

/// Format a timestamp as wall-clock `HH:MM`, dropping seconds and below.
pub fn format_clock(ts: &NaiveDateTime) -> String {
    ts.format("%H:%M").to_string()
}
