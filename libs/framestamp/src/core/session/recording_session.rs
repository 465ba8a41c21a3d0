// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::fs;
use std::path::{Path, PathBuf};

use super::{
    resolve_frame_rate, CameraId, CaptureOptions, SessionConfig, SessionReport, SessionStatus,
    Termination,
};
use crate::core::backend::CaptureBackend;
use crate::core::clocks::{Clock, SystemClock};
use crate::core::codec::EncoderConfig;
use crate::core::ledger::{derive_ledger_path, TimestampLedger};
use crate::core::loop_utils::{stop_aware_loop, LoopControl, LoopExit};
use crate::core::signals::StopSignal;
use crate::core::sinks::{FramePreview, FrameSink};
use crate::core::sources::{FrameSource, PullResult};
use crate::core::{RecorderError, Result};

/// Source and sink, held together for exactly as long as the session is live.
struct Devices<S, K> {
    source: S,
    sink: K,
}

/// One recording, from opening the camera to writing the ledger.
///
/// ```rust,ignore
/// let (stop_handle, stop_signal) = stop_channel();
/// let mut session = RecordingSession::new(backend, stop_signal);
/// session.initialize("out/clip.mp4", CameraId(0))?;
/// let report = session.start()?; // blocks until stopped; ledger is on disk when it returns
/// ```
///
/// Every frame goes pull -> clock sample -> encode -> ledger append, in that
/// order and on one thread, so `ledger[i]` is always the timestamp of the
/// `i`-th frame the sink accepted.
pub struct RecordingSession<B: CaptureBackend, C: Clock = SystemClock> {
    backend: B,
    clock: C,
    options: CaptureOptions,
    stop: StopSignal,
    preview: Option<Box<dyn FramePreview>>,

    status: SessionStatus,
    config: Option<SessionConfig>,
    devices: Option<Devices<B::Source, B::Sink>>,
    ledger: TimestampLedger,
    frame_counter: u64,
}

impl<B: CaptureBackend> RecordingSession<B, SystemClock> {
    /// Session stamped with the system wall clock.
    pub fn new(backend: B, stop: StopSignal) -> Self {
        Self::with_clock(backend, SystemClock::new(), stop)
    }
}

impl<B: CaptureBackend, C: Clock> RecordingSession<B, C> {
    pub fn with_clock(backend: B, clock: C, stop: StopSignal) -> Self {
        Self {
            backend,
            clock,
            options: CaptureOptions::default(),
            stop,
            preview: None,
            status: SessionStatus::Uninitialized,
            config: None,
            devices: None,
            ledger: TimestampLedger::new(),
            frame_counter: 0,
        }
    }

    pub fn with_options(mut self, options: CaptureOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_preview(mut self, preview: Box<dyn FramePreview>) -> Self {
        self.preview = Some(preview);
        self
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Set by `initialize`; `None` before that.
    pub fn config(&self) -> Option<&SessionConfig> {
        self.config.as_ref()
    }

    pub fn ledger_path(&self) -> Option<&Path> {
        self.config.as_ref().map(|config| config.ledger_path.as_path())
    }

    pub fn ledger(&self) -> &TimestampLedger {
        &self.ledger
    }

    /// Frames encoded in the current (or last) recording.
    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    /// Open the camera and the encoder for `output_path`.
    ///
    /// Derives the ledger path first and fails with `LedgerPathCollision`
    /// if it is the video path itself. Then queries the device geometry and
    /// rate (a non-positive rate becomes
    /// [`DEFAULT_FRAME_RATE`](super::DEFAULT_FRAME_RATE)), creates the output
    /// directory, and opens the sink. On any failure whatever was opened is
    /// released again and the session stays `Uninitialized`.
    pub fn initialize(
        &mut self,
        output_path: impl Into<PathBuf>,
        camera: CameraId,
    ) -> Result<&SessionConfig> {
        if self.status != SessionStatus::Uninitialized {
            return Err(RecorderError::InvalidState(self.status));
        }
        let output_path = output_path.into();
        let ledger_path = derive_ledger_path(&output_path);
        if ledger_path == output_path {
            tracing::error!("Ledger path collides with video path {}", output_path.display());
            return Err(RecorderError::LedgerPathCollision { path: output_path });
        }

        let source = self.backend.open_source(camera).inspect_err(|e| {
            tracing::error!("{}", e);
        })?;

        let geometry = source.geometry();
        let pixel_format = source.pixel_format();
        let reported_fps = source.frame_rate();
        let fps = resolve_frame_rate(reported_fps);
        if fps != reported_fps {
            tracing::warn!(
                "Camera {} reported {} fps, using default {} fps",
                camera,
                reported_fps,
                fps
            );
        }
        tracing::info!(
            "Camera initialized: resolution {}, {} fps, {:?}",
            geometry,
            fps,
            pixel_format
        );

        if let Err(e) = create_parent_dir(&output_path) {
            source.release();
            return Err(RecorderError::EncoderInitFailed {
                path: output_path,
                reason: format!("cannot create output directory: {}", e),
            });
        }

        let encoder = EncoderConfig::mp4(output_path.clone(), geometry, pixel_format, fps);
        let sink = match self.backend.open_sink(&encoder) {
            Ok(sink) => sink,
            Err(e) => {
                tracing::error!("{}", e);
                source.release();
                return Err(e);
            }
        };

        tracing::info!("Video writer initialized for: {}", output_path.display());
        tracing::info!("Timestamps will be saved to: {}", ledger_path.display());

        self.devices = Some(Devices { source, sink });
        self.status = SessionStatus::Initialized;
        Ok(&*self.config.insert(SessionConfig {
            output_video_path: output_path,
            ledger_path,
            camera,
            geometry,
            pixel_format,
            fps,
        }))
    }

    /// Record until the stop signal is raised, the source ends, or capture fails.
    ///
    /// Blocks for the whole recording. When it returns the session is
    /// `Stopped`, the video is finalized and the ledger has been written
    /// (or the write failure is in the report). Errors only with
    /// `NotInitialized`, in which case nothing changes.
    pub fn start(&mut self) -> Result<SessionReport> {
        if self.status != SessionStatus::Initialized || self.devices.is_none() {
            tracing::error!("Camera or video writer not initialized");
            return Err(RecorderError::NotInitialized);
        }

        self.ledger.clear();
        self.frame_counter = 0;
        self.status = SessionStatus::Recording;
        tracing::info!("Starting recording...");

        let mut scope = RecordingScope { session: self };
        let outcome = scope.session.capture_loop();
        Ok(scope.complete(outcome))
    }

    /// Release the devices, write the ledger, and enter `Stopped`.
    ///
    /// Only `Initialized` and `Recording` sessions have anything to stop;
    /// calling this in any other state returns `None` and does nothing, so
    /// repeated calls are harmless.
    pub fn stop(&mut self) -> Option<SessionReport> {
        match self.status {
            SessionStatus::Uninitialized | SessionStatus::Stopped => {
                tracing::debug!("stop() ignored: session is {:?}", self.status);
                None
            }
            SessionStatus::Initialized => Some(self.shut_down(Termination::StoppedBeforeStart, None)),
            SessionStatus::Recording => Some(self.shut_down(Termination::Aborted, None)),
        }
    }

    fn capture_loop(&mut self) -> Result<LoopExit> {
        let Self {
            clock,
            options,
            stop,
            preview,
            devices,
            ledger,
            frame_counter,
            ..
        } = self;
        let Some(Devices { source, sink }) = devices.as_mut() else {
            return Err(RecorderError::NotInitialized);
        };
        let mut consecutive_empty: u32 = 0;

        stop_aware_loop(stop, || {
            let frame = match source.pull()? {
                PullResult::Frame(frame) => frame,
                PullResult::Empty => {
                    consecutive_empty += 1;
                    tracing::warn!("Empty frame captured ({} in a row)", consecutive_empty);
                    if let Some(limit) = options.max_consecutive_empty_frames {
                        if consecutive_empty >= limit {
                            return Err(RecorderError::SourceStalled(consecutive_empty));
                        }
                    }
                    return Ok(LoopControl::Continue);
                }
                PullResult::End => {
                    tracing::info!("Frame source has no more frames");
                    return Ok(LoopControl::Break);
                }
            };
            consecutive_empty = 0;

            // No blocking call between the clock sample and the encode call.
            let timestamp_ns = clock.now_ns();
            sink.write(&frame)?;
            let entry = ledger.append(timestamp_ns);
            *frame_counter += 1;
            debug_assert_eq!(entry.frame_index + 1, *frame_counter);
            debug_assert_eq!(sink.frames_written(), ledger.len() as u64);

            if let Some(preview) = preview.as_mut() {
                if let Err(e) = preview.show(&frame) {
                    tracing::warn!("Preview failed for frame {}: {}", entry.frame_index, e);
                }
            }

            if options.progress_interval > 0 && *frame_counter % options.progress_interval == 0 {
                tracing::info!("Recorded {} frames", frame_counter);
            }
            Ok(LoopControl::Continue)
        })
    }

    /// Sink first, then source, then preview, then the ledger.
    fn shut_down(
        &mut self,
        termination: Termination,
        capture_error: Option<RecorderError>,
    ) -> SessionReport {
        let mut encoder_error = None;
        if let Some(Devices { source, sink }) = self.devices.take() {
            if let Err(e) = sink.release() {
                tracing::warn!("Video writer did not finalize cleanly: {}", e);
                encoder_error = Some(e);
            }
            source.release();
        }
        if let Some(preview) = self.preview.as_mut() {
            preview.close();
        }

        let (video_path, ledger_path, fps, ledger_error) = match &self.config {
            Some(config) => {
                let ledger_error = self.ledger.flush(&config.ledger_path).err();
                if let Some(e) = &ledger_error {
                    tracing::warn!("{}", e);
                }
                (
                    config.output_video_path.clone(),
                    config.ledger_path.clone(),
                    config.fps,
                    ledger_error,
                )
            }
            None => (PathBuf::new(), PathBuf::new(), resolve_frame_rate(0.0), None),
        };
        self.status = SessionStatus::Stopped;

        tracing::info!(
            "Recording finished: {} frames, video {}, timestamps {}",
            self.frame_counter,
            video_path.display(),
            ledger_path.display()
        );

        SessionReport {
            termination,
            frames_recorded: self.frame_counter,
            fps,
            video_path,
            ledger_path,
            capture_error,
            encoder_error,
            ledger_error,
        }
    }
}

impl<B: CaptureBackend, C: Clock> Drop for RecordingSession<B, C> {
    fn drop(&mut self) {
        if matches!(
            self.status,
            SessionStatus::Initialized | SessionStatus::Recording
        ) {
            tracing::warn!("Session dropped while {:?}, stopping", self.status);
            self.stop();
        }
    }
}

/// Scope of one `start()` call.
///
/// Whatever way control leaves the capture loop, including a panic inside a
/// source or sink, the devices are released and the ledger is flushed before
/// the scope ends.
struct RecordingScope<'s, B: CaptureBackend, C: Clock> {
    session: &'s mut RecordingSession<B, C>,
}

impl<B: CaptureBackend, C: Clock> RecordingScope<'_, B, C> {
    fn complete(self, outcome: Result<LoopExit>) -> SessionReport {
        let (termination, capture_error) = match outcome {
            Ok(LoopExit::StopRequested) => (Termination::StopRequested, None),
            Ok(LoopExit::Completed) => (Termination::SourceEnded, None),
            Err(e) => {
                tracing::error!("Recording interrupted: {}", e);
                (Termination::CaptureFailed, Some(e))
            }
        };
        self.session.shut_down(termination, capture_error)
    }
}

impl<B: CaptureBackend, C: Clock> Drop for RecordingScope<'_, B, C> {
    fn drop(&mut self) {
        if self.session.status == SessionStatus::Recording {
            self.session.shut_down(Termination::Aborted, None);
        }
    }
}

fn create_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir),
        _ => Ok(()),
    }
}
