// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use crate::core::frames::VideoFrame;
use crate::core::Result;

/// Consumer that encodes frames, in order, into a container file.
///
/// Opened by a [`CaptureBackend`](crate::core::CaptureBackend) from an
/// [`EncoderConfig`](crate::core::EncoderConfig).
pub trait FrameSink {
    /// Queue one frame for encoding.
    ///
    /// Synchronous: returning `Ok` means the frame has been handed to the
    /// encoder and will be part of the finalized file. Errors are
    /// [`RecorderError::WriteFailed`](crate::core::RecorderError::WriteFailed).
    fn write(&mut self, frame: &VideoFrame) -> Result<()>;

    /// Frames accepted so far.
    fn frames_written(&self) -> u64;

    /// Flush buffered data and finalize the container.
    fn release(self) -> Result<()>;
}
