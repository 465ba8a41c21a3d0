// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Extension of the ledger file written next to the video.
pub const LEDGER_EXTENSION: &str = "json";

/// Ledger path for a video: same directory, same stem, `.json` extension.
///
/// Only the final extension is replaced (`a.b.mp4` -> `a.b.json`). A path
/// without an extension gets one appended, and a path without a file name
/// still yields a sibling `.json` in the same directory.
pub fn derive_ledger_path(video_path: &Path) -> PathBuf {
    let directory = video_path.parent().unwrap_or(video_path);
    let mut file_name: OsString = video_path.file_stem().map(OsString::from).unwrap_or_default();
    file_name.push(".");
    file_name.push(LEDGER_EXTENSION);
    directory.join(file_name)
}
