// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Frame sink configuration.

use super::{ContainerFormat, VideoCodec};
use crate::core::frames::{FrameGeometry, PixelFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration handed to [`CaptureBackend::open_sink`](crate::core::CaptureBackend::open_sink).
///
/// Built by the session from the opened source: geometry and pixel format as
/// negotiated with the device, frame rate after default substitution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Output file path.
    pub output_path: PathBuf,
    /// Container written to `output_path`.
    pub container: ContainerFormat,
    /// Video codec.
    pub codec: VideoCodec,
    /// Frame dimensions in pixels.
    pub geometry: FrameGeometry,
    /// Layout of incoming frame bytes.
    pub input_format: PixelFormat,
    /// Nominal frame rate (always > 0).
    pub fps: f64,
}

impl EncoderConfig {
    /// Create an MP4/mp4v config.
    pub fn mp4(output_path: PathBuf, geometry: FrameGeometry, input_format: PixelFormat, fps: f64) -> Self {
        Self {
            output_path,
            container: ContainerFormat::Mp4,
            codec: VideoCodec::Mpeg4Part2,
            geometry,
            input_format,
            fps,
        }
    }
}
