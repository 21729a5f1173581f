use std::path::PathBuf;
use thiserror::Error;

/// All errors produced while building a listening report.
#[derive(Error, Debug)]
pub enum StatsError {
    /// An input file does not exist or could not be opened.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input file is not a JSON array of play records.
    #[error("Malformed streaming history in {path}: {source}")]
    MalformedInput {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A record's `endTime` is not of the form `YYYY-MM-DD HH:MM`.
    #[error("Invalid endTime \"{value}\" in {path}")]
    InvalidTimestamp { path: PathBuf, value: String },

    /// A directory was given as input but holds no streaming-history files.
    #[error("No StreamingHistory*.json files found in {0}")]
    NoHistoryFiles(PathBuf),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the stats crates.
pub type Result<T> = std::result::Result<T, StatsError>;
