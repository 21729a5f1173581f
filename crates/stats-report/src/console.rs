//! Plain-text report in a fixed layout.
//!
//! ```text
//! Minutes listened in 2019: 15 (0 hours)
//! Number of different songs listened to in 2019: 2
//! Number of different artists listened to in 2019: 2
//! 10 favorite songs in 2019:
//!   Song A: 1 times played
//! ...
//! ```

use std::io::{self, Write};

use stats_data::aggregator::YearStats;
use stats_data::analysis::{DaySummary, Report};

/// Write the full text report: year statistics, then the day log if any.
pub fn render<W: Write>(out: &mut W, report: &Report) -> io::Result<()> {
    render_year(out, &report.stats)?;
    if let Some(day) = &report.day {
        render_day(out, day)?;
    }
    Ok(())
}

/// Write the year statistics sections.
pub fn render_year<W: Write>(out: &mut W, stats: &YearStats) -> io::Result<()> {
    let year = &stats.year;

    writeln!(
        out,
        "Minutes listened in {}: {} ({} hours)",
        year, stats.total_minutes, stats.total_hours
    )?;
    writeln!(
        out,
        "Number of different songs listened to in {}: {}",
        year, stats.distinct_songs
    )?;
    writeln!(
        out,
        "Number of different artists listened to in {}: {}",
        year, stats.distinct_artists
    )?;

    writeln!(out, "{} favorite songs in {}:", stats.limits.songs, year)?;
    for song in &stats.top_songs {
        writeln!(out, "  {}: {} times played", song.track_name, song.plays)?;
    }

    writeln!(
        out,
        "{} favorite artists in {} and their playtime:",
        stats.limits.artists,
        year
    )?;
    for artist in &stats.top_artists {
        writeln!(out, "  {}: {} playtime", artist.artist_name, artist.playtime)?;
    }

    writeln!(
        out,
        "{} days with the longest playtime in {}:",
        stats.limits.days,
        year
    )?;
    for day in &stats.top_days {
        writeln!(out, "  {}: {} playtime", day.label, day.playtime)?;
    }

    Ok(())
}

/// Write the listening log for one day followed by its total playtime.
pub fn render_day<W: Write>(out: &mut W, summary: &DaySummary) -> io::Result<()> {
    writeln!(out, "Listening history for {}:", summary.day)?;
    for entry in &summary.entries {
        writeln!(
            out,
            "{}: {} - {}",
            entry.start_time, entry.artist_name, entry.track_name
        )?;
    }
    writeln!(out, "Total playtime on this day: {}", summary.playtime)
}
