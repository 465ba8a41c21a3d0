// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

mod frame_sink;
mod preview;

pub use frame_sink::FrameSink;
pub use preview::FramePreview;
