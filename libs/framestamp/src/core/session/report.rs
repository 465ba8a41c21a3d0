// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::path::PathBuf;
use std::time::Duration;

use crate::core::RecorderError;

/// Why a session reached `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The stop signal was raised.
    StopRequested,
    /// The frame source reported the end of its frames.
    SourceEnded,
    /// Pull or write failed; see [`SessionReport::capture_error`].
    CaptureFailed,
    /// Stopped without ever starting capture.
    StoppedBeforeStart,
    /// Unwound out of the capture loop, or the session was dropped while live.
    Aborted,
}

/// Outcome of a session, produced once when it stops.
#[derive(Debug)]
pub struct SessionReport {
    pub termination: Termination,
    pub frames_recorded: u64,
    pub fps: f64,
    pub video_path: PathBuf,
    pub ledger_path: PathBuf,
    /// Error that ended the capture loop early.
    pub capture_error: Option<RecorderError>,
    /// The encoder failed to finalize the container.
    pub encoder_error: Option<RecorderError>,
    /// The ledger could not be written. The video is kept regardless.
    pub ledger_error: Option<RecorderError>,
}

impl SessionReport {
    /// Playback length implied by the frame count and the encoder's rate.
    pub fn nominal_duration(&self) -> Duration {
        Duration::from_secs_f64(self.frames_recorded as f64 / self.fps)
    }

    /// True when the encoder never worked: it failed to finalize, or it
    /// rejected the very first frame.
    pub fn encoder_failed(&self) -> bool {
        self.encoder_error.is_some()
            || (self.frames_recorded == 0
                && matches!(self.capture_error, Some(RecorderError::WriteFailed(_))))
    }

    /// True when nothing went wrong on any path.
    pub fn is_clean(&self) -> bool {
        self.capture_error.is_none() && self.encoder_error.is_none() && self.ledger_error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nominal_duration_uses_rate() {
        let report = SessionReport {
            termination: Termination::StopRequested,
            frames_recorded: 90,
            fps: 30.0,
            video_path: PathBuf::from("clip.mp4"),
            ledger_path: PathBuf::from("clip.json"),
            capture_error: None,
            encoder_error: None,
            ledger_error: None,
        };

        assert_eq!(report.nominal_duration(), Duration::from_secs(3));
        assert!(report.is_clean());
        assert!(!report.encoder_failed());
    }

    #[test]
    fn test_encoder_failed() {
        let report = |frames_recorded, capture_error, encoder_error| SessionReport {
            termination: Termination::CaptureFailed,
            frames_recorded,
            fps: 30.0,
            video_path: PathBuf::from("clip.mp4"),
            ledger_path: PathBuf::from("clip.json"),
            capture_error,
            encoder_error,
            ledger_error: None,
        };
        let write_failed = || Some(RecorderError::WriteFailed("broken pipe".into()));

        assert!(report(0, write_failed(), None).encoder_failed());
        assert!(!report(12, write_failed(), None).encoder_failed());
        assert!(report(12, None, write_failed()).encoder_failed());
        assert!(!report(0, Some(RecorderError::SourceStalled(5)), None).encoder_failed());
    }
}
