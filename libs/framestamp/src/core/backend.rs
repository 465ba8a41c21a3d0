// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use crate::core::codec::EncoderConfig;
use crate::core::session::CameraId;
use crate::core::sinks::FrameSink;
use crate::core::sources::FrameSource;
use crate::core::Result;

/// Capture buffers a backend requests from the device when the caller doesn't say.
pub const DEFAULT_BUFFER_COUNT: u32 = 4;

/// Opens the device and encoder a [`RecordingSession`](crate::core::RecordingSession) drives.
pub trait CaptureBackend {
    type Source: FrameSource;
    type Sink: FrameSink;

    /// Open the camera. Fails with `DeviceUnavailable`.
    fn open_source(&mut self, camera: CameraId) -> Result<Self::Source>;

    /// Open the encoder. Fails with `EncoderInitFailed`.
    fn open_sink(&mut self, config: &EncoderConfig) -> Result<Self::Sink>;
}

// Platform-specific re-exports with unified names
// Users import this common name and get the appropriate platform implementation
#[cfg(target_os = "linux")]
pub use crate::linux::LinuxCaptureBackend as PlatformCaptureBackend;

#[cfg(not(target_os = "linux"))]
pub use unsupported::UnsupportedCaptureBackend as PlatformCaptureBackend;

// Fallback for unsupported platforms
#[cfg(not(target_os = "linux"))]
mod unsupported {
    use super::*;
    use crate::core::frames::{FrameGeometry, PixelFormat, VideoFrame};
    use crate::core::sources::PullResult;
    use crate::core::RecorderError;
    use std::path::PathBuf;

    /// Backend for platforms without a camera implementation yet.
    pub struct UnsupportedCaptureBackend;

    impl UnsupportedCaptureBackend {
        pub fn new(_ffmpeg: Option<PathBuf>, _buffer_count: u32) -> Self {
            Self
        }
    }

    pub enum Never {}

    impl FrameSource for Never {
        fn geometry(&self) -> FrameGeometry {
            match *self {}
        }

        fn frame_rate(&self) -> f64 {
            match *self {}
        }

        fn pixel_format(&self) -> PixelFormat {
            match *self {}
        }

        fn pull(&mut self) -> Result<PullResult> {
            match *self {}
        }

        fn release(self) {
            match self {}
        }
    }

    impl FrameSink for Never {
        fn write(&mut self, _frame: &VideoFrame) -> Result<()> {
            match *self {}
        }

        fn frames_written(&self) -> u64 {
            match *self {}
        }

        fn release(self) -> Result<()> {
            match self {}
        }
    }

    impl CaptureBackend for UnsupportedCaptureBackend {
        type Source = Never;
        type Sink = Never;

        fn open_source(&mut self, camera: CameraId) -> Result<Never> {
            Err(RecorderError::DeviceUnavailable {
                camera,
                reason: "camera capture not supported on this platform".into(),
            })
        }

        fn open_sink(&mut self, config: &EncoderConfig) -> Result<Never> {
            Err(RecorderError::EncoderInitFailed {
                path: config.output_path.clone(),
                reason: "encoding not supported on this platform".into(),
            })
        }
    }
}
