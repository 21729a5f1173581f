//! Main report pipeline.
//!
//! Loads the history, filters it to the configured year (and day), runs the
//! aggregations and returns a [`Report`] ready for rendering.

use chrono::NaiveDateTime;
use serde::Serialize;
use stats_core::error::Result;
use stats_core::formatting::Playtime;
use stats_core::models::{PlayEvent, TargetDay};
use stats_core::settings::RunConfig;
use stats_core::time_utils::{format_clock, infer_start_time};
use tracing::{debug, info, warn};

use crate::aggregator::{StatsAggregator, TopLimits, YearStats};
use crate::filter::{filter_day, filter_year};
use crate::reader::load_history;

/// Plays of this many milliseconds or fewer are treated as skips.
pub const DEFAULT_MIN_MS_PLAYED: u64 = 5000;

// ── Public types ──────────────────────────────────────────────────────────────

/// One line of the listening log for a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayLogEntry {
    /// Inferred start of the play, `HH:MM`.
    pub start_time: String,
    pub artist_name: String,
    pub track_name: String,
    pub ms_played: u64,
}

/// The listening log for a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub day: TargetDay,
    pub entries: Vec<DayLogEntry>,
    /// Sum of `ms_played` over `entries` only.
    pub total_ms: u64,
    pub playtime: Playtime,
}

/// The complete output of [`run`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub stats: YearStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<DaySummary>,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the full pipeline for `config`.
///
/// 1. Load every input file, aborting on the first missing or malformed one.
/// 2. Filter to the configured year and aggregate.
/// 3. Build the day log when a day is configured.
pub fn run(config: &RunConfig) -> Result<Report> {
    let load_start = std::time::Instant::now();
    let history = load_history(&config.input_paths)?;
    info!(
        "Loaded {} play records in {:.3}s",
        history.len(),
        load_start.elapsed().as_secs_f64()
    );

    Ok(build_report(&history, config))
}

/// Aggregate an already loaded history according to `config`.
pub fn build_report(history: &[PlayEvent], config: &RunConfig) -> Report {
    let in_year = filter_year(history, &config.year);
    if in_year.is_empty() {
        warn!("No plays found for year {}", config.year);
    }
    debug!("{} of {} plays in {}", in_year.len(), history.len(), config.year);

    let limits = TopLimits {
        songs: config.top_songs,
        artists: config.top_artists,
        days: config.top_days,
    };
    let stats = StatsAggregator::summarize(&in_year, &config.year, limits);

    let day = config
        .day
        .map(|day| day_summary(&day, history, config.min_ms_played, config.chronological));

    Report { stats, day }
}

/// Build the listening log for `day`.
///
/// Only plays longer than `min_ms_played` are listed (strictly greater).
/// Each entry's start time is its `endTime` minus `ms_played`, truncated to
/// the minute. Entries keep the order of `events` unless `chronological` is
/// set, in which case they are stably sorted by inferred start.
pub fn day_summary(
    day: &TargetDay,
    events: &[PlayEvent],
    min_ms_played: u64,
    chronological: bool,
) -> DaySummary {
    let mut timed: Vec<(Option<NaiveDateTime>, &PlayEvent)> = filter_day(events, day)
        .into_iter()
        .filter(|e| e.ms_played > min_ms_played)
        .map(|e| (infer_start_time(&e.end_time, e.ms_played), e))
        .collect();

    if chronological {
        timed.sort_by_key(|(start, _)| *start);
    }

    let entries: Vec<DayLogEntry> = timed
        .into_iter()
        .map(|(start, e)| DayLogEntry {
            start_time: start.map(|ts| format_clock(&ts)).unwrap_or_else(|| {
                warn!("Cannot infer start time from endTime \"{}\"", e.end_time);
                e.end_time.get(11..16).unwrap_or_default().to_string()
            }),
            artist_name: e.artist_name.clone(),
            track_name: e.track_name.clone(),
            ms_played: e.ms_played,
        })
        .collect();

    let total_ms = entries.iter().map(|e| e.ms_played).sum();
    debug!("Day {}: {} plays listed", day, entries.len());

    DaySummary {
        day: *day,
        entries,
        total_ms,
        playtime: Playtime::from_ms(total_ms),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
