// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Recording session - the capture -> timestamp -> encode loop and its lifecycle.

mod config;
mod recording_session;
mod report;
mod status;

pub use config::{
    resolve_frame_rate, CameraId, CaptureOptions, SessionConfig, DEFAULT_FRAME_RATE,
    DEFAULT_PROGRESS_INTERVAL,
};
pub use recording_session::RecordingSession;
pub use report::{SessionReport, Termination};
pub use status::SessionStatus;
