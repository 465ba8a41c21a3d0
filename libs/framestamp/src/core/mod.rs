// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

pub mod backend;
pub mod clocks;
pub mod codec;
pub mod error;
pub mod frames;
pub mod ledger;
pub mod loop_utils;
pub mod session;
pub mod signals;
pub mod sinks;
pub mod sources;

pub use backend::{CaptureBackend, PlatformCaptureBackend, DEFAULT_BUFFER_COUNT};
pub use clocks::{Clock, SystemClock};
pub use codec::{ContainerFormat, EncoderConfig, VideoCodec};
pub use error::{RecorderError, Result};
pub use frames::{FrameGeometry, PixelFormat, VideoFrame};
pub use ledger::{derive_ledger_path, TimestampEntry, TimestampLedger, LEDGER_EXTENSION};
pub use loop_utils::{stop_aware_loop, LoopControl, LoopExit};
pub use session::{
    resolve_frame_rate, CameraId, CaptureOptions, RecordingSession, SessionConfig, SessionReport,
    SessionStatus, Termination, DEFAULT_FRAME_RATE, DEFAULT_PROGRESS_INTERVAL,
};
pub use signals::{install_signal_handlers, stop_channel, StopHandle, StopSignal};
pub use sinks::{FramePreview, FrameSink};
pub use sources::{FrameSource, PullResult};
