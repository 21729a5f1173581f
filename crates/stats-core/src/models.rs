use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StatsError;

/// A single track play read from a streaming-history export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayEvent {
    /// Title of the song.
    pub track_name: String,
    /// Performing artist.
    pub artist_name: String,
    /// When playback ended, `YYYY-MM-DD HH:MM`, no timezone.
    pub end_time: String,
    /// Milliseconds of the track that were played.
    pub ms_played: u64,
}

impl PlayEvent {
    pub fn new(
        track_name: impl Into<String>,
        artist_name: impl Into<String>,
        end_time: impl Into<String>,
        ms_played: u64,
    ) -> Self {
        Self {
            track_name: track_name.into(),
            artist_name: artist_name.into(),
            end_time: end_time.into(),
            ms_played,
        }
    }

    /// The `MM-DD` portion of `end_time`, or `None` when the string is too short.
    pub fn month_day(&self) -> Option<&str> {
        self.end_time.get(5..10)
    }
}

/// A calendar day selected for the listening log.
///
/// Parts are kept numerically and never checked against a calendar, so a
/// day such as `2019-13-40` is representable and simply matches no events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDay {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl TargetDay {
    pub fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Zero-padded `YYYY-MM-DD` prefix matched against `endTime`.
    pub fn prefix(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl fmt::Display for TargetDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}.{:02}.{:04}", self.day, self.month, self.year)
    }
}

impl FromStr for TargetDay {
    type Err = StatsError;

    /// Parse `YYYY-MM-DD`. Month and day may be given with one or two digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || StatsError::Config(format!("invalid day \"{}\", expected YYYY-MM-DD", s));

        let mut parts = s.trim().split('-');
        let (Some(year), Some(month), Some(day), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        if year.len() != 4 || !is_digits(year) || !is_digits(month) || !is_digits(day) {
            return Err(invalid());
        }
        if month.len() > 2 || day.len() > 2 {
            return Err(invalid());
        }

        Ok(Self {
            year: year.parse().map_err(|_| invalid())?,
            month: month.parse().map_err(|_| invalid())?,
            day: day.parse().map_err(|_| invalid())?,
        })
    }
}

/// How the finished report is written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Fixed human-readable layout.
    #[default]
    Text,
    /// Pretty-printed JSON document.
    Json,
}

/// `true` when `s` is non-empty and made only of ASCII digits.
pub fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
