// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::TimestampEntry;
use crate::core::{RecorderError, Result};

/// Ordered, append-only record of when each frame was encoded.
///
/// Position equals frame index: `entries()[i].frame_index == i` for every `i`.
/// Held in memory for the whole session and written out once, when the
/// session stops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimestampLedger {
    entries: Vec<TimestampEntry>,
}

impl TimestampLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the next frame. Its index is the current length.
    pub fn append(&mut self, timestamp_ns: i64) -> TimestampEntry {
        let entry = TimestampEntry {
            frame_index: self.entries.len() as u64,
            timestamp_ns,
        };
        self.entries.push(entry);
        entry
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TimestampEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimestampEntry> {
        self.entries.iter()
    }

    /// Timestamp recorded for `frame`, if it was encoded.
    pub fn timestamp_of(&self, frame: u64) -> Option<i64> {
        usize::try_from(frame)
            .ok()
            .and_then(|index| self.entries.get(index))
            .map(|entry| entry.timestamp_ns)
    }

    /// Last frame committed at or before `timestamp_ns`.
    ///
    /// Assumes non-decreasing timestamps (an unadjusted clock).
    pub fn frame_at_or_before(&self, timestamp_ns: i64) -> Option<u64> {
        let after = self
            .entries
            .partition_point(|entry| entry.timestamp_ns <= timestamp_ns);
        after.checked_sub(1).map(|index| self.entries[index].frame_index)
    }

    /// True when no timestamp is smaller than the one before it.
    pub fn is_monotonic(&self) -> bool {
        self.entries
            .windows(2)
            .all(|pair| pair[0].timestamp_ns <= pair[1].timestamp_ns)
    }

    /// Write the whole ledger to `path` as a JSON array.
    ///
    /// The file is rewritten from scratch: the array goes to a sibling
    /// temporary file, is synced, then renamed over `path`. An empty ledger
    /// produces `[]`.
    pub fn flush(&self, path: &Path) -> Result<()> {
        let write_failed = |source: std::io::Error| RecorderError::LedgerWriteFailed {
            path: path.to_path_buf(),
            source,
        };

        let mut json = serde_json::to_vec_pretty(&self.entries)
            .map_err(|e| write_failed(e.into()))?;
        json.push(b'\n');

        let staging = staging_path(path);
        let result = File::create(&staging)
            .and_then(|mut file| {
                file.write_all(&json)?;
                file.sync_all()
            })
            .and_then(|()| fs::rename(&staging, path));

        if let Err(e) = result {
            let _ = fs::remove_file(&staging);
            return Err(write_failed(e));
        }

        tracing::debug!(
            "Flushed {} ledger entries to {}",
            self.entries.len(),
            path.display()
        );
        Ok(())
    }

    /// Read a ledger written by [`flush`](Self::flush).
    ///
    /// Fails if the file isn't a JSON array of `{frame, timestamp_ns}` records
    /// or if the frame indices are not exactly `0, 1, 2, ...`.
    pub fn load(path: &Path) -> Result<Self> {
        let read_failed = |reason: String| RecorderError::LedgerReadFailed {
            path: path.to_path_buf(),
            reason,
        };

        let bytes = fs::read(path).map_err(|e| read_failed(e.to_string()))?;
        let entries: Vec<TimestampEntry> =
            serde_json::from_slice(&bytes).map_err(|e| read_failed(e.to_string()))?;

        if let Some((position, entry)) = entries
            .iter()
            .enumerate()
            .find(|(position, entry)| entry.frame_index != *position as u64)
        {
            return Err(read_failed(format!(
                "record {} carries frame {}",
                position, entry.frame_index
            )));
        }

        Ok(Self { entries })
    }
}

impl<'a> IntoIterator for &'a TimestampLedger {
    type Item = &'a TimestampEntry;
    type IntoIter = std::slice::Iter<'a, TimestampEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ledger_with(timestamps: &[i64]) -> TimestampLedger {
        let mut ledger = TimestampLedger::new();
        for &ts in timestamps {
            ledger.append(ts);
        }
        ledger
    }

    #[test]
    fn test_append_assigns_positional_indices() {
        let ledger = ledger_with(&[100, 200, 300]);

        assert_eq!(ledger.len(), 3);
        for (i, entry) in ledger.iter().enumerate() {
            assert_eq!(entry.frame_index, i as u64);
        }
        assert_eq!(ledger.timestamp_of(1), Some(200));
        assert_eq!(ledger.timestamp_of(3), None);
    }

    #[test]
    fn test_clear_restarts_indices() {
        let mut ledger = ledger_with(&[1, 2]);
        ledger.clear();
        assert!(ledger.is_empty());
        assert_eq!(ledger.append(5).frame_index, 0);
    }

    #[test]
    fn test_flush_uses_fixed_field_names() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clip.json");

        ledger_with(&[1_700_000_000_000_000_000, 1_700_000_000_033_333_333])
            .flush(&path)
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                { "frame": 0, "timestamp_ns": 1_700_000_000_000_000_000_i64 },
                { "frame": 1, "timestamp_ns": 1_700_000_000_033_333_333_i64 },
            ])
        );
        assert!(!dir.path().join("clip.json.tmp").exists());
    }

    #[test]
    fn test_flush_empty_ledger_is_empty_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.json");

        TimestampLedger::new().flush(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value, serde_json::json!([]));
    }

    #[test]
    fn test_flush_rewrites_whole_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clip.json");

        ledger_with(&[1, 2, 3, 4]).flush(&path).unwrap();
        ledger_with(&[9]).flush(&path).unwrap();

        let loaded = TimestampLedger::load(&path).unwrap();
        assert_eq!(loaded, ledger_with(&[9]));
    }

    #[test]
    fn test_flush_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("clip.json");

        let err = ledger_with(&[1]).flush(&path).unwrap_err();
        assert!(matches!(err, RecorderError::LedgerWriteFailed { .. }));
    }

    #[test]
    fn test_load_rejects_gaps() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gappy.json");
        fs::write(
            &path,
            r#"[{"frame":0,"timestamp_ns":10},{"frame":2,"timestamp_ns":20}]"#,
        )
        .unwrap();

        let err = TimestampLedger::load(&path).unwrap_err();
        assert!(matches!(err, RecorderError::LedgerReadFailed { .. }));
    }

    #[test]
    fn test_frame_at_or_before() {
        let ledger = ledger_with(&[1_000, 2_000, 2_000, 3_000]);

        assert_eq!(ledger.frame_at_or_before(999), None);
        assert_eq!(ledger.frame_at_or_before(1_000), Some(0));
        assert_eq!(ledger.frame_at_or_before(2_500), Some(2));
        assert_eq!(ledger.frame_at_or_before(i64::MAX), Some(3));
        assert!(ledger.is_monotonic());
        assert!(!ledger_with(&[5, 4]).is_monotonic());
    }
}
