// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::path::PathBuf;

use super::ffmpeg::{find_ffmpeg, FfmpegEncoderSink};
use super::v4l2_camera::V4l2FrameSource;
use crate::core::{
    CameraId, CaptureBackend, EncoderConfig, RecorderError, Result, DEFAULT_BUFFER_COUNT,
};

/// Opens `/dev/video<N>` through V4L2 and encodes with an `ffmpeg` child process.
pub struct LinuxCaptureBackend {
    ffmpeg: Option<PathBuf>,
    buffer_count: u32,
}

impl LinuxCaptureBackend {
    /// `ffmpeg`: encoder binary, or `None` to look it up on `PATH` when the sink opens.
    pub fn new(ffmpeg: Option<PathBuf>, buffer_count: u32) -> Self {
        Self {
            ffmpeg,
            buffer_count: buffer_count.max(1),
        }
    }
}

impl Default for LinuxCaptureBackend {
    fn default() -> Self {
        Self::new(None, DEFAULT_BUFFER_COUNT)
    }
}

impl CaptureBackend for LinuxCaptureBackend {
    type Source = V4l2FrameSource;
    type Sink = FfmpegEncoderSink;

    fn open_source(&mut self, camera: CameraId) -> Result<V4l2FrameSource> {
        V4l2FrameSource::open(camera, self.buffer_count)
    }

    fn open_sink(&mut self, config: &EncoderConfig) -> Result<FfmpegEncoderSink> {
        let ffmpeg = match self.ffmpeg.clone().or_else(find_ffmpeg) {
            Some(path) => path,
            None => {
                return Err(RecorderError::EncoderInitFailed {
                    path: config.output_path.clone(),
                    reason: "ffmpeg executable not found on PATH".into(),
                });
            }
        };
        FfmpegEncoderSink::spawn(&ffmpeg, config)
    }
}
