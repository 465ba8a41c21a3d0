// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! FFmpeg-based video encoding for Linux.

mod encoder;

use std::path::PathBuf;

pub use encoder::{encoder_args, FfmpegEncoderSink};

/// Find the `ffmpeg` executable on `PATH`, then in common install locations.
pub fn find_ffmpeg() -> Option<PathBuf> {
    find_executable("ffmpeg")
}

fn find_executable(name: &str) -> Option<PathBuf> {
    let on_path = std::env::var_os("PATH")
        .map(|paths| {
            std::env::split_paths(&paths)
                .map(|dir| dir.join(name))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let common_paths = ["/usr/local/bin", "/usr/bin", "/snap/bin"]
        .into_iter()
        .map(|dir| PathBuf::from(dir).join(name));

    on_path.into_iter().chain(common_paths).find(|path| path.is_file())
}
