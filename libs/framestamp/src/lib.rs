// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Frame-accurate camera recording.
//!
//! A [`RecordingSession`] pulls frames from a [`FrameSource`], stamps each one
//! with the wall clock in nanoseconds since the Unix epoch, hands it to a
//! [`FrameSink`] for encoding, and keeps a [`TimestampLedger`] in lockstep with
//! the encoded frames. When the session stops, the ledger is written next to
//! the video as a JSON array of `{ "frame", "timestamp_ns" }` records.

pub mod core;

#[cfg(target_os = "linux")]
pub mod linux;

pub use crate::core::{
    derive_ledger_path, install_signal_handlers, resolve_frame_rate, stop_aware_loop,
    stop_channel, CameraId, CaptureBackend, CaptureOptions, Clock, ContainerFormat,
    EncoderConfig, FrameGeometry, FramePreview, FrameSink, FrameSource, LoopControl, LoopExit,
    PixelFormat, PlatformCaptureBackend, PullResult, RecorderError, RecordingSession, Result,
    SessionConfig, SessionReport, SessionStatus, StopHandle, StopSignal, SystemClock, Termination,
    TimestampEntry, TimestampLedger, VideoCodec, VideoFrame, DEFAULT_FRAME_RATE,
    DEFAULT_BUFFER_COUNT, DEFAULT_PROGRESS_INTERVAL, LEDGER_EXTENSION,
};
