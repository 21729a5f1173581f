//! Listening statistics over a filtered set of play events.
//!
//! Every grouping goes through an [`IndexMap`], which keeps keys in the order
//! they were first seen. Rankings then use a stable sort, so among equal
//! values the key that appeared first in the event sequence ranks higher.

use std::collections::HashSet;
use std::hash::Hash;

use indexmap::IndexMap;
use serde::Serialize;
use stats_core::formatting::{format_day_label, total_minutes, Playtime};
use stats_core::models::PlayEvent;

// ── Result types ──────────────────────────────────────────────────────────────

/// A song and how often it was played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SongCount {
    pub track_name: String,
    pub plays: u64,
}

/// An artist and the cumulative time their tracks were played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistPlaytime {
    pub artist_name: String,
    pub ms_played: u64,
    pub playtime: Playtime,
}

/// One calendar day (year ignored) and the time listened on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayPlaytime {
    /// Grouping key, `MM-DD`.
    pub month_day: String,
    /// Display form, `DD.MM.`.
    pub label: String,
    pub ms_played: u64,
    pub playtime: Playtime,
}

/// How many entries each ranking keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TopLimits {
    pub songs: usize,
    pub artists: usize,
    pub days: usize,
}

impl Default for TopLimits {
    fn default() -> Self {
        Self {
            songs: 10,
            artists: 10,
            days: 5,
        }
    }
}

/// All statistics shown for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearStats {
    pub year: String,
    /// Requested ranking sizes; a ranking may hold fewer entries.
    pub limits: TopLimits,
    pub event_count: usize,
    pub total_ms: u64,
    /// `total_ms / 60000`, truncated.
    pub total_minutes: u64,
    /// `total_minutes / 60`, truncated.
    pub total_hours: u64,
    pub distinct_songs: usize,
    pub distinct_artists: usize,
    pub top_songs: Vec<SongCount>,
    pub top_artists: Vec<ArtistPlaytime>,
    pub top_days: Vec<DayPlaytime>,
}

// ── StatsAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that computes counts and rankings over play events.
pub struct StatsAggregator;

impl StatsAggregator {
    /// Compute the full [`YearStats`] for events already filtered to `year`.
    pub fn summarize(events: &[&PlayEvent], year: &str, limits: TopLimits) -> YearStats {
        let total_ms = Self::total_ms(events);
        let total_minutes = total_minutes(total_ms);

        YearStats {
            year: year.to_string(),
            limits,
            event_count: events.len(),
            total_ms,
            total_minutes,
            total_hours: total_minutes / 60,
            distinct_songs: Self::distinct_songs(events),
            distinct_artists: Self::distinct_artists(events),
            top_songs: Self::top_songs(events, limits.songs),
            top_artists: Self::top_artists(events, limits.artists),
            top_days: Self::top_days(events, limits.days),
        }
    }

    /// Sum of `ms_played`.
    pub fn total_ms(events: &[&PlayEvent]) -> u64 {
        events.iter().map(|e| e.ms_played).sum()
    }

    /// Number of distinct track names.
    pub fn distinct_songs(events: &[&PlayEvent]) -> usize {
        events
            .iter()
            .map(|e| e.track_name.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Number of distinct artist names.
    pub fn distinct_artists(events: &[&PlayEvent]) -> usize {
        events
            .iter()
            .map(|e| e.artist_name.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// The `n` most played songs by play count.
    pub fn top_songs(events: &[&PlayEvent], n: usize) -> Vec<SongCount> {
        let mut counts: IndexMap<&str, u64> = IndexMap::new();
        for event in events {
            *counts.entry(event.track_name.as_str()).or_default() += 1;
        }

        rank(counts, n)
            .into_iter()
            .map(|(track, plays)| SongCount {
                track_name: track.to_string(),
                plays,
            })
            .collect()
    }

    /// The `n` artists with the most cumulative playtime.
    pub fn top_artists(events: &[&PlayEvent], n: usize) -> Vec<ArtistPlaytime> {
        let mut totals: IndexMap<&str, u64> = IndexMap::new();
        for event in events {
            *totals.entry(event.artist_name.as_str()).or_default() += event.ms_played;
        }

        rank(totals, n)
            .into_iter()
            .map(|(artist, ms)| ArtistPlaytime {
                artist_name: artist.to_string(),
                ms_played: ms,
                playtime: Playtime::from_ms(ms),
            })
            .collect()
    }

    /// The `k` days with the most cumulative playtime, grouped by `MM-DD`.
    ///
    /// The year is ignored; callers filter to a single year first.
    pub fn top_days(events: &[&PlayEvent], k: usize) -> Vec<DayPlaytime> {
        let mut totals: IndexMap<&str, u64> = IndexMap::new();
        for event in events {
            if let Some(month_day) = event.month_day() {
                *totals.entry(month_day).or_default() += event.ms_played;
            }
        }

        rank(totals, k)
            .into_iter()
            .map(|(month_day, ms)| DayPlaytime {
                month_day: month_day.to_string(),
                label: format_day_label(month_day),
                ms_played: ms,
                playtime: Playtime::from_ms(ms),
            })
            .collect()
    }
}

// ── Private ───────────────────────────────────────────────────────────────────

/// Order `totals` by value, largest first, and keep the first `n`.
///
/// `sort_by` is stable, so equal values stay in first-insertion order.
fn rank<K: Hash + Eq>(totals: IndexMap<K, u64>, n: usize) -> Vec<(K, u64)> {
    let mut ranked: Vec<(K, u64)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    ranked
}

// ── Tests ─────────────────────────────────────────────────────────────────────
