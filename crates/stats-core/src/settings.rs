use clap::{CommandFactory, FromArgMatches, Parser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, StatsError};
use crate::models::{is_digits, OutputFormat, TargetDay};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Listening statistics from a Spotify streaming-history export
#[derive(Parser, Debug, Clone)]
#[command(
    name = "spotify-stats",
    about = "Listening statistics from a Spotify streaming-history export",
    version
)]
pub struct Settings {
    /// Streaming-history JSON files, or directories containing StreamingHistory*.json
    pub files: Vec<PathBuf>,

    /// Year to report on
    #[arg(short, long, default_value = "2019")]
    pub year: String,

    /// Also print the listening log for one day (YYYY-MM-DD)
    #[arg(short, long)]
    pub day: Option<TargetDay>,

    /// Number of most played songs to list
    #[arg(long, default_value = "10")]
    pub top_songs: usize,

    /// Number of artists with the most playtime to list
    #[arg(long, default_value = "10")]
    pub top_artists: usize,

    /// Number of days with the most playtime to list
    #[arg(long, default_value = "5")]
    pub top_days: usize,

    /// Plays this short or shorter (in ms) are left out of the day log
    #[arg(long, default_value = "5000")]
    pub min_ms_played: u64,

    /// Sort the day log by inferred start time instead of file order
    #[arg(long)]
    pub chronological: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Config file (defaults to ~/.spotify-stats/config.json when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Problems found while loading settings, raised before logging exists.
    /// The caller logs them once the subscriber is installed.
    #[arg(skip)]
    pub warnings: Vec<String>,
}

// ── ConfigFile ─────────────────────────────────────────────────────────────────

/// Run parameters read from a JSON config file.
///
/// Every key is optional; values given on the command line win.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_paths: Option<Vec<PathBuf>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_songs: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_artists: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_days: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_ms_played: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chronological: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
}

impl ConfigFile {
    /// Return the default config path, `~/.spotify-stats/config.json`.
    pub fn default_path() -> PathBuf {
        Self::default_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn default_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".spotify-stats").join("config.json")
    }

    /// Load a config file from an explicit path.
    ///
    /// Relative `input_paths` are resolved against the file's directory.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| StatsError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: ConfigFile = serde_json::from_str(&content)
            .map_err(|e| StatsError::Config(format!("{}: {}", path.display(), e)))?;

        if let (Some(paths), Some(base)) = (config.input_paths.as_mut(), path.parent()) {
            for p in paths.iter_mut().filter(|p| p.is_relative()) {
                *p = base.join(&*p);
            }
        }
        Ok(config)
    }

    /// Write the config as pretty JSON, creating parent directories if needed.
    #[cfg(test)]
    pub(crate) fn save_to(&self, path: &Path) -> std::result::Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

// ── RunConfig ──────────────────────────────────────────────────────────────────

/// Validated parameters for one report run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub input_paths: Vec<PathBuf>,
    pub year: String,
    pub day: Option<TargetDay>,
    pub top_songs: usize,
    pub top_artists: usize,
    pub top_days: usize,
    pub min_ms_played: u64,
    pub chronological: bool,
    pub format: OutputFormat,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments and merge in the config file.
    pub fn load() -> Result<Self> {
        Self::load_impl(std::env::args_os().collect(), &ConfigFile::default_path())
    }

    /// Full implementation, with the fallback config path injectable so tests
    /// never touch the real home directory.
    ///
    /// An explicit `--config` must exist and parse. The fallback file is
    /// optional; when it is broken it is skipped and the problem is recorded
    /// in [`Settings::warnings`].
    pub fn load_impl(args: Vec<std::ffi::OsString>, default_config: &Path) -> Result<Self> {
        let matches = Settings::command().get_matches_from(args);
        let mut settings = Settings::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

        let config = match settings.config.as_deref() {
            Some(path) => ConfigFile::load_from(path)?,
            None if default_config.exists() => match ConfigFile::load_from(default_config) {
                Ok(config) => config,
                Err(e) => {
                    settings.warnings.push(format!(
                        "Ignoring config file {}: {}",
                        default_config.display(),
                        e
                    ));
                    ConfigFile::default()
                }
            },
            None => ConfigFile::default(),
        };

        settings.merge_config(config, &matches)?;

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        Ok(settings)
    }

    /// Fill every value that was not given on the command line from `config`.
    fn merge_config(&mut self, config: ConfigFile, matches: &clap::ArgMatches) -> Result<()> {
        if self.files.is_empty() {
            if let Some(v) = config.input_paths {
                self.files = v;
            }
        }
        if !is_arg_explicitly_set(matches, "year") {
            if let Some(v) = config.year {
                self.year = v;
            }
        }
        if self.day.is_none() {
            if let Some(v) = config.day {
                self.day = Some(v.parse()?);
            }
        }
        if !is_arg_explicitly_set(matches, "top_songs") {
            if let Some(v) = config.top_songs {
                self.top_songs = v;
            }
        }
        if !is_arg_explicitly_set(matches, "top_artists") {
            if let Some(v) = config.top_artists {
                self.top_artists = v;
            }
        }
        if !is_arg_explicitly_set(matches, "top_days") {
            if let Some(v) = config.top_days {
                self.top_days = v;
            }
        }
        if !is_arg_explicitly_set(matches, "min_ms_played") {
            if let Some(v) = config.min_ms_played {
                self.min_ms_played = v;
            }
        }
        if !is_arg_explicitly_set(matches, "chronological") {
            if let Some(v) = config.chronological {
                self.chronological = v;
            }
        }
        if !is_arg_explicitly_set(matches, "format") {
            if let Some(v) = config.format {
                self.format = v;
            }
        }
        Ok(())
    }

    /// Validate the merged settings into a [`RunConfig`].
    pub fn into_run_config(self) -> Result<RunConfig> {
        if self.files.is_empty() {
            return Err(StatsError::Config(
                "no input files given on the command line or in the config file".to_string(),
            ));
        }

        if self.year.len() != 4 || !is_digits(&self.year) {
            return Err(StatsError::Config(format!(
                "year must be four digits, got \"{}\"",
                self.year
            )));
        }

        Ok(RunConfig {
            input_paths: self.files,
            year: self.year,
            day: self.day,
            top_songs: self.top_songs,
            top_artists: self.top_artists,
            top_days: self.top_days,
            min_ms_played: self.min_ms_played,
            chronological: self.chronological,
            format: self.format,
        })
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
