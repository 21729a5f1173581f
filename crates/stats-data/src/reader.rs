//! Streaming-history file discovery and loading.
//!
//! Reads the `StreamingHistory*.json` files of a Spotify data export and
//! flattens them into one ordered list of [`PlayEvent`]s.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use stats_core::error::{Result, StatsError};
use stats_core::models::PlayEvent;
use stats_core::time_utils::parse_end_time;
use tracing::{debug, warn};

// ── Public API ────────────────────────────────────────────────────────────────

/// Expand `paths` into the list of history files to read, in read order.
///
/// Plain files pass through untouched. A directory is scanned recursively for
/// files named like `StreamingHistory0.json`, ordered by directory and then
/// by the file's numeric suffix so that `StreamingHistory10.json` follows
/// `StreamingHistory9.json`. A path that does not exist aborts the run.
pub fn resolve_input_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut resolved = Vec::with_capacity(paths.len());

    for path in paths {
        if path.is_dir() {
            let found = find_history_files(path);
            if found.is_empty() {
                return Err(StatsError::NoHistoryFiles(path.clone()));
            }
            debug!("{}: {} history files", path.display(), found.len());
            resolved.extend(found);
        } else if path.exists() {
            resolved.push(path.clone());
        } else {
            return Err(StatsError::FileRead {
                path: path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            });
        }
    }

    Ok(resolved)
}

/// Find all streaming-history files recursively under `dir`.
pub fn find_history_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<(PathBuf, u64)> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let index = entry.file_name().to_str().and_then(history_file_index)?;
            Some((entry.into_path(), index))
        })
        .collect();

    files.sort_by(|(a, ai), (b, bi)| {
        a.parent()
            .cmp(&b.parent())
            .then(ai.cmp(bi))
            .then_with(|| a.cmp(b))
    });
    files.into_iter().map(|(path, _)| path).collect()
}

/// Load every file in `paths` (after directory expansion) and concatenate the
/// records in order.
///
/// The first unreadable or malformed file aborts the whole load: a report
/// over a silently partial history would be wrong without saying so.
pub fn load_history(paths: &[PathBuf]) -> Result<Vec<PlayEvent>> {
    let files = resolve_input_paths(paths)?;

    let mut history = Vec::new();
    for file in &files {
        history.extend(read_history_file(file)?);
    }

    if history.is_empty() {
        warn!("No play records found in {} files", files.len());
    }
    debug!(
        "Loaded {} play records from {} files",
        history.len(),
        files.len()
    );

    Ok(history)
}

/// Read one history file: a JSON array of play records.
///
/// Every `endTime` is validated here so that the prefix filters downstream
/// never see a timestamp of the wrong shape.
pub fn read_history_file(path: &Path) -> Result<Vec<PlayEvent>> {
    let file = File::open(path).map_err(|source| StatsError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let events: Vec<PlayEvent> = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        StatsError::MalformedInput {
            path: path.to_path_buf(),
            source,
        }
    })?;

    if let Some(bad) = events.iter().find(|e| parse_end_time(&e.end_time).is_none()) {
        return Err(StatsError::InvalidTimestamp {
            path: path.to_path_buf(),
            value: bad.end_time.clone(),
        });
    }

    debug!("File {}: {} records", path.display(), events.len());
    Ok(events)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Numeric suffix of a history file name, `0` when absent, or `None` when
/// the name is not a history file at all.
fn history_file_index(name: &str) -> Option<u64> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN.get_or_init(|| {
        Regex::new(r"^StreamingHistory(?:_[A-Za-z]+_?)?(\d*)\.json$").expect("valid regex")
    });

    let caps = re.captures(name)?;
    Some(caps[1].parse().unwrap_or(0))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn write_json(dir: &Path, name: &str, value: &serde_json::Value) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, value.to_string()).unwrap();
        path
    }

    fn record(end_time: &str, artist: &str, track: &str, ms: u64) -> serde_json::Value {
        json!({
            "endTime": end_time,
            "artistName": artist,
            "trackName": track,
            "msPlayed": ms,
        })
    }

    fn sample_history(dir: &Path, name: &str) -> PathBuf {
        write_json(
            dir,
            name,
            &json!([
                record("2019-12-06 08:00", "Lansdowne", "Burn Brighter", 600_000),
                record("2019-12-06 09:00", "Ghost", "Mary On A Cross", 300_000),
            ]),
        )
    }

    // ── read_history_file ─────────────────────────────────────────────────────

    #[test]
    fn test_read_history_file_basic() {
        let dir = TempDir::new().unwrap();
        let path = sample_history(dir.path(), "StreamingHistory0.json");

        let events = read_history_file(&path).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].track_name, "Burn Brighter");
        assert_eq!(events[1].ms_played, 300_000);
    }

    #[test]
    fn test_read_history_file_empty_array() {
        let dir = TempDir::new().unwrap();
        let path = write_json(dir.path(), "StreamingHistory0.json", &json!([]));
        assert!(read_history_file(&path).unwrap().is_empty());
    }

    #[test]
    fn test_read_history_file_missing() {
        let err = read_history_file(Path::new("/tmp/does-not-exist-stats-test.json")).unwrap_err();
        assert!(matches!(err, StatsError::FileRead { .. }));
    }

    #[test]
    fn test_read_history_file_not_an_array() {
        let dir = TempDir::new().unwrap();
        let path = write_json(
            dir.path(),
            "h.json",
            &record("2019-12-06 08:00", "A", "T", 1),
        );
        let err = read_history_file(&path).unwrap_err();
        match err {
            StatsError::MalformedInput { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_read_history_file_missing_field() {
        let dir = TempDir::new().unwrap();
        let path = write_json(
            dir.path(),
            "h.json",
            &json!([{"endTime": "2019-12-06 08:00", "artistName": "A", "msPlayed": 1}]),
        );
        assert!(matches!(
            read_history_file(&path),
            Err(StatsError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_read_history_file_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("h.json");
        std::fs::write(&path, "[{not json").unwrap();
        assert!(matches!(
            read_history_file(&path),
            Err(StatsError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_read_history_file_bad_timestamp() {
        let dir = TempDir::new().unwrap();
        let path = write_json(
            dir.path(),
            "h.json",
            &json!([
                record("2019-12-06 08:00", "A", "T", 1),
                record("06.12.2019 08:00", "A", "T", 1),
            ]),
        );
        match read_history_file(&path).unwrap_err() {
            StatsError::InvalidTimestamp { value, .. } => assert_eq!(value, "06.12.2019 08:00"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    // ── load_history ──────────────────────────────────────────────────────────

    #[test]
    fn test_load_history_preserves_file_order() {
        let dir = TempDir::new().unwrap();
        let first = write_json(
            dir.path(),
            "b.json",
            &json!([record("2019-12-06 10:00", "A", "late", 1)]),
        );
        let second = write_json(
            dir.path(),
            "a.json",
            &json!([record("2019-12-06 08:00", "A", "early", 1)]),
        );

        let events = load_history(&[first, second]).unwrap();
        let tracks: Vec<&str> = events.iter().map(|e| e.track_name.as_str()).collect();
        assert_eq!(tracks, vec!["late", "early"]);
    }

    #[test]
    fn test_load_history_same_file_twice_doubles() {
        let dir = TempDir::new().unwrap();
        let path = sample_history(dir.path(), "StreamingHistory0.json");

        let once = load_history(std::slice::from_ref(&path)).unwrap();
        let twice = load_history(&[path.clone(), path]).unwrap();
        assert_eq!(twice.len(), once.len() * 2);
        assert_eq!(&twice[..once.len()], &once[..]);
        assert_eq!(&twice[once.len()..], &once[..]);
    }

    #[test]
    fn test_load_history_missing_file_aborts() {
        let dir = TempDir::new().unwrap();
        let good = sample_history(dir.path(), "StreamingHistory0.json");
        let missing = dir.path().join("StreamingHistory1.json");

        match load_history(&[good, missing.clone()]).unwrap_err() {
            StatsError::FileRead { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_history_from_directory() {
        let dir = TempDir::new().unwrap();
        write_json(
            dir.path(),
            "StreamingHistory1.json",
            &json!([record("2019-12-06 10:00", "A", "second", 1)]),
        );
        write_json(
            dir.path(),
            "StreamingHistory0.json",
            &json!([record("2019-12-06 08:00", "A", "first", 1)]),
        );
        write_json(dir.path(), "Userdata.json", &json!({"username": "x"}));

        let events = load_history(&[dir.path().to_path_buf()]).unwrap();
        let tracks: Vec<&str> = events.iter().map(|e| e.track_name.as_str()).collect();
        assert_eq!(tracks, vec!["first", "second"]);
    }

    // ── resolve_input_paths / find_history_files ──────────────────────────────

    #[test]
    fn test_find_history_files_numeric_order() {
        let dir = TempDir::new().unwrap();
        for name in [
            "StreamingHistory10.json",
            "StreamingHistory2.json",
            "StreamingHistory0.json",
        ] {
            write_json(dir.path(), name, &json!([]));
        }

        let names: Vec<String> = find_history_files(dir.path())
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "StreamingHistory0.json",
                "StreamingHistory2.json",
                "StreamingHistory10.json"
            ]
        );
    }

    #[test]
    fn test_find_history_files_recursive() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("MyData");
        std::fs::create_dir_all(&sub).unwrap();
        write_json(&sub, "StreamingHistory0.json", &json!([]));

        assert_eq!(find_history_files(dir.path()).len(), 1);
    }

    #[test]
    fn test_resolve_input_paths_empty_directory() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            resolve_input_paths(&[dir.path().to_path_buf()]),
            Err(StatsError::NoHistoryFiles(_))
        ));
    }

    #[test]
    fn test_resolve_input_paths_keeps_plain_files() {
        let dir = TempDir::new().unwrap();
        let path = write_json(dir.path(), "any-name.json", &json!([]));
        assert_eq!(resolve_input_paths(&[path.clone()]).unwrap(), vec![path]);
    }

    #[test]
    fn test_history_file_index() {
        assert_eq!(history_file_index("StreamingHistory0.json"), Some(0));
        assert_eq!(history_file_index("StreamingHistory12.json"), Some(12));
        assert_eq!(history_file_index("StreamingHistory_music_3.json"), Some(3));
        assert_eq!(history_file_index("StreamingHistory.json"), Some(0));
        assert_eq!(history_file_index("Playlist1.json"), None);
        assert_eq!(history_file_index("StreamingHistory0.json.bak"), None);
    }
}
