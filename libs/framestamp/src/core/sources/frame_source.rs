// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use crate::core::frames::{FrameGeometry, PixelFormat, VideoFrame};
use crate::core::Result;

/// Outcome of a single [`FrameSource::pull`].
#[derive(Debug)]
pub enum PullResult {
    /// A complete frame, ready to be encoded.
    Frame(VideoFrame),
    /// Nothing usable this time (empty or truncated buffer, interrupted read).
    /// The caller retries on its next iteration.
    Empty,
    /// The source has no more frames (end of a finite stream, device gone quiet for good).
    End,
}

/// Producer of raw frames, opened by a [`CaptureBackend`](crate::core::CaptureBackend).
///
/// Owned exclusively by one [`RecordingSession`](crate::core::RecordingSession).
/// `release` consumes the source so it cannot be touched afterwards.
pub trait FrameSource {
    /// Native frame dimensions negotiated with the device.
    fn geometry(&self) -> FrameGeometry;

    /// Frame rate reported by the device. May be zero or negative when the
    /// device doesn't know; the session substitutes a default.
    fn frame_rate(&self) -> f64;

    /// Layout of the bytes returned by [`pull`](Self::pull).
    fn pixel_format(&self) -> PixelFormat;

    /// Block until the next frame is available.
    fn pull(&mut self) -> Result<PullResult>;

    /// Stop streaming and close the device.
    fn release(self);
}
