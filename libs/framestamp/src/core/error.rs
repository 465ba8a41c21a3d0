// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::path::PathBuf;

use thiserror::Error;

use crate::core::session::{CameraId, SessionStatus};

#[derive(Error, Debug)]
pub enum RecorderError {
    #[error("Cannot open camera {camera}: {reason}")]
    DeviceUnavailable { camera: CameraId, reason: String },

    #[error("Cannot open video encoder for {}: {reason}", path.display())]
    EncoderInitFailed { path: PathBuf, reason: String },

    #[error("Frame write failed: {0}")]
    WriteFailed(String),

    #[error("Frame capture failed: {0}")]
    CaptureFailed(String),

    #[error("Frame source stalled: {0} consecutive empty frames")]
    SourceStalled(u32),

    #[error("Cannot write timestamp ledger {}: {source}", path.display())]
    LedgerWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read timestamp ledger {}: {reason}", path.display())]
    LedgerReadFailed { path: PathBuf, reason: String },

    #[error("Timestamp ledger would overwrite the video file {}", path.display())]
    LedgerPathCollision { path: PathBuf },

    #[error("Camera or video writer not initialized")]
    NotInitialized,

    #[error("Operation not allowed while session is {0:?}")]
    InvalidState(SessionStatus),

    #[error("Output file must have {expected} extension: {path}")]
    InvalidOutputExtension { path: String, expected: &'static str },

    #[error("Invalid camera ID {0:?} (expected a non-negative integer)")]
    InvalidCameraIdentifier(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RecorderError>;
