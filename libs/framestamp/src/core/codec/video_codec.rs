// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Video codec and container types.

use serde::{Deserialize, Serialize};

/// Video codec used by the frame sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoCodec {
    /// MPEG-4 Part 2, tagged `mp4v`. Plays everywhere an MP4 plays.
    #[default]
    Mpeg4Part2,
    // Future codecs:
    // H264,
}

impl VideoCodec {
    /// Four-character tag as text (e.g. "mp4v").
    pub fn tag(&self) -> &'static str {
        match self {
            VideoCodec::Mpeg4Part2 => "mp4v",
        }
    }

    /// FFmpeg encoder name.
    pub fn ffmpeg_encoder(&self) -> &'static str {
        match self {
            VideoCodec::Mpeg4Part2 => "mpeg4",
        }
    }
}

/// Output container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContainerFormat {
    #[default]
    Mp4,
}

impl ContainerFormat {
    /// File name suffix the command surface requires (matched exactly, case-sensitive).
    pub fn required_suffix(&self) -> &'static str {
        match self {
            ContainerFormat::Mp4 => ".mp4",
        }
    }

    /// FFmpeg muxer name (`-f`).
    pub fn ffmpeg_muxer(&self) -> &'static str {
        match self {
            ContainerFormat::Mp4 => "mp4",
        }
    }
}
