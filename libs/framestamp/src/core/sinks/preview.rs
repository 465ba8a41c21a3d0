// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use crate::core::frames::VideoFrame;
use crate::core::Result;

/// Optional live view of the frames being recorded.
///
/// Purely a side effect: preview errors are logged and never affect the
/// video or the ledger.
pub trait FramePreview: Send {
    /// Show a frame that has just been encoded.
    fn show(&mut self, frame: &VideoFrame) -> Result<()>;

    /// Tear down any window or display resource.
    fn close(&mut self) {}
}
