// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::frames::{FrameGeometry, PixelFormat};
use crate::core::RecorderError;

/// Rate used when the device reports zero, a negative value, or nothing at all.
pub const DEFAULT_FRAME_RATE: f64 = 30.0;

/// Frames between progress log lines.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 30;

/// Replace a non-positive (or NaN) device rate with [`DEFAULT_FRAME_RATE`].
pub fn resolve_frame_rate(reported: f64) -> f64 {
    if reported > 0.0 && reported.is_finite() {
        reported
    } else {
        DEFAULT_FRAME_RATE
    }
}

/// Camera index, e.g. `1` for `/dev/video1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CameraId(pub u32);

impl CameraId {
    pub fn index(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for CameraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CameraId {
    type Err = RecorderError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        text.trim()
            .parse::<u32>()
            .map(CameraId)
            .map_err(|_| RecorderError::InvalidCameraIdentifier(text.to_string()))
    }
}

/// Everything the session fixed during `initialize`. Immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub output_video_path: PathBuf,
    pub ledger_path: PathBuf,
    pub camera: CameraId,
    pub geometry: FrameGeometry,
    pub pixel_format: PixelFormat,
    /// Rate handed to the encoder, after default substitution.
    pub fps: f64,
}

/// Knobs for the capture loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOptions {
    /// Log progress every this many encoded frames (0 disables).
    pub progress_interval: u64,
    /// Fail the session after this many empty pulls in a row. `None` retries forever.
    pub max_consecutive_empty_frames: Option<u32>,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            max_consecutive_empty_frames: None,
        }
    }
}

impl CaptureOptions {
    pub fn progress_interval(mut self, frames: u64) -> Self {
        self.progress_interval = frames;
        self
    }

    pub fn max_consecutive_empty_frames(mut self, limit: Option<u32>) -> Self {
        self.max_consecutive_empty_frames = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_positive_rate_defaults_to_30() {
        assert_eq!(resolve_frame_rate(0.0), 30.0);
        assert_eq!(resolve_frame_rate(-1.0), 30.0);
        assert_eq!(resolve_frame_rate(-0.0), 30.0);
        assert_eq!(resolve_frame_rate(f64::NAN), 30.0);
    }

    #[test]
    fn test_positive_rate_is_kept() {
        assert_eq!(resolve_frame_rate(29.97), 29.97);
        assert_eq!(resolve_frame_rate(60.0), 60.0);
    }

    #[test]
    fn test_camera_id_parse() {
        assert_eq!("2".parse::<CameraId>().unwrap(), CameraId(2));
        assert_eq!(" 1 ".parse::<CameraId>().unwrap(), CameraId(1));
        assert!(matches!(
            "front".parse::<CameraId>(),
            Err(RecorderError::InvalidCameraIdentifier(text)) if text == "front"
        ));
        assert!("-1".parse::<CameraId>().is_err());
        assert!("1abc".parse::<CameraId>().is_err());
    }

    #[test]
    fn test_negative_camera_id_message() {
        let err = "-1".parse::<CameraId>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid camera ID \"-1\" (expected a non-negative integer)"
        );
    }

    #[test]
    fn test_default_options() {
        let options = CaptureOptions::default();
        assert_eq!(options.progress_interval, 30);
        assert_eq!(options.max_consecutive_empty_frames, None);
    }
}
