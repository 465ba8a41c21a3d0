// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! framestamp CLI
//!
//! Records a camera to MP4 and writes a JSON ledger with the epoch
//! timestamp of every encoded frame next to it.

use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use framestamp::{
    install_signal_handlers, stop_channel, CaptureBackend, CaptureOptions,
    PlatformCaptureBackend, RecordingSession, SessionReport, StopHandle, StopSignal,
    DEFAULT_BUFFER_COUNT, DEFAULT_PROGRESS_INTERVAL,
};

mod args;

use args::{parse_camera_or_default, validate_output_path};

#[derive(Parser)]
#[command(name = "framestamp")]
#[command(author, version, about = "Camera recorder with per-frame epoch timestamps", long_about = None)]
struct Cli {
    /// Path where the MP4 video will be saved
    #[arg(value_name = "OUTPUT_FILE.mp4")]
    output: Option<String>,

    /// Camera index (default: 0)
    #[arg(value_name = "CAMERA_ID", allow_hyphen_values = true)]
    camera: Option<String>,

    /// FFmpeg binary used for encoding (default: found on PATH)
    #[arg(long, value_name = "PATH")]
    ffmpeg: Option<PathBuf>,

    /// Give up after this many empty frames in a row (default: retry forever)
    #[arg(long, value_name = "N")]
    max_empty_frames: Option<u32>,

    /// Log progress every N frames (0 disables)
    #[arg(long, value_name = "N", default_value_t = DEFAULT_PROGRESS_INTERVAL)]
    progress_every: u64,

    /// Number of V4L2 capture buffers
    #[arg(long, value_name = "N", default_value_t = DEFAULT_BUFFER_COUNT)]
    buffers: u32,
}

fn print_usage() {
    println!("Usage: framestamp <output_file.mp4> [camera_id]");
    println!("  output_file.mp4: Path where the MP4 video will be saved");
    println!("  camera_id: Camera index (default: 0)");
    println!();
    println!("Example:");
    println!("  framestamp recording.mp4");
    println!("  framestamp /path/to/my_video.mp4 1");
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let Some(output) = cli.output.as_deref() else {
        print_usage();
        return ExitCode::FAILURE;
    };

    let (stop_handle, stop_signal) = stop_channel();
    if let Err(e) = install_signal_handlers(stop_handle.clone()) {
        eprintln!("Error: Failed to install signal handlers: {}", e);
        return ExitCode::FAILURE;
    }
    spawn_quit_listener(stop_handle);

    let options = CaptureOptions::default()
        .progress_interval(cli.progress_every)
        .max_consecutive_empty_frames(cli.max_empty_frames);
    let backend = PlatformCaptureBackend::new(cli.ffmpeg.clone(), cli.buffers);

    let result = record(output, cli.camera.as_deref(), backend, stop_signal, options);
    match &result {
        Ok(report) => print_summary(report),
        Err(e) => eprintln!("Error: {:#}", e),
    }
    ExitCode::from(exit_status(&result))
}

/// Process exit status for a recording attempt.
///
/// Zero once the session has reached `Stopped` with a working encoder, even
/// if the ledger could not be written. Non-zero for any setup failure,
/// including an encoder that never accepted a frame.
fn exit_status(result: &Result<SessionReport>) -> u8 {
    match result {
        Ok(report) if !report.encoder_failed() => 0,
        _ => 1,
    }
}

fn record<B: CaptureBackend>(
    output: &str,
    camera: Option<&str>,
    backend: B,
    stop_signal: StopSignal,
    options: CaptureOptions,
) -> Result<SessionReport> {
    let output_path = validate_output_path(output)?;
    let camera = parse_camera_or_default(camera);

    println!("Camera Recorder with Epoch Timestamps");
    println!("=====================================");
    println!("Output file: {}", output_path.display());
    println!("Camera ID: {}", camera);
    println!();

    let mut session = RecordingSession::new(backend, stop_signal).with_options(options);
    session
        .initialize(output_path, camera)
        .context("Failed to initialize video recorder")?;

    println!();
    println!("Press 'q' then Enter (or Ctrl+C) to stop recording");

    let report = session.start()?;
    Ok(report)
}

/// Raise `handle` when a line reading `q` arrives on stdin.
fn spawn_quit_listener(handle: StopHandle) {
    let spawned = std::thread::Builder::new()
        .name("quit-listener".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if line.trim().eq_ignore_ascii_case("q") {
                    handle.raise();
                    break;
                }
            }
        });
    if let Err(e) = spawned {
        tracing::warn!("Key listener unavailable, use Ctrl+C to stop: {}", e);
    }
}

fn print_summary(report: &SessionReport) {
    println!();
    println!("Recording finished!");
    println!("Total frames recorded: {}", report.frames_recorded);
    println!(
        "Duration: {:.2}s at {} fps",
        report.nominal_duration().as_secs_f64(),
        report.fps
    );
    println!("Video saved to: {}", report.video_path.display());

    match &report.ledger_error {
        None => println!("Timestamps saved to: {}", report.ledger_path.display()),
        Some(e) => eprintln!("Error: {}", e),
    }
    if let Some(e) = &report.capture_error {
        eprintln!("Recording ended early: {}", e);
    }
    if let Some(e) = &report.encoder_error {
        eprintln!("Warning: {}", e);
    }
    if report.encoder_failed() {
        eprintln!("Error: the video encoder failed, {} is not usable", report.video_path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framestamp::{
        CameraId, EncoderConfig, FrameGeometry, FrameSink, FrameSource, PixelFormat, PullResult,
        RecorderError, VideoFrame,
    };
    use std::cell::Cell;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// How the test backend behaves once asked to open devices.
    #[derive(Clone, Copy)]
    enum Outcome {
        NoCamera,
        NoEncoder,
        /// Two frames, then the source ends.
        Records,
        /// The encoder rejects every frame.
        RejectsFrames,
    }

    struct TestBackend {
        outcome: Outcome,
        /// Devices opened so far, shared so it can be read after `record`.
        opened: Rc<Cell<u32>>,
    }

    impl TestBackend {
        fn new(outcome: Outcome) -> Self {
            Self {
                outcome,
                opened: Rc::new(Cell::new(0)),
            }
        }
    }

    struct TestSource {
        remaining: u32,
    }

    impl FrameSource for TestSource {
        fn geometry(&self) -> FrameGeometry {
            FrameGeometry::new(2, 2)
        }

        fn frame_rate(&self) -> f64 {
            30.0
        }

        fn pixel_format(&self) -> PixelFormat {
            PixelFormat::Yuyv422
        }

        fn pull(&mut self) -> framestamp::Result<PullResult> {
            if self.remaining == 0 {
                return Ok(PullResult::End);
            }
            self.remaining -= 1;
            Ok(PullResult::Frame(VideoFrame::new(
                vec![0; 8],
                self.geometry(),
                PixelFormat::Yuyv422,
            )))
        }

        fn release(self) {}
    }

    struct TestSink {
        rejects: bool,
        written: u64,
    }

    impl FrameSink for TestSink {
        fn write(&mut self, _frame: &VideoFrame) -> framestamp::Result<()> {
            if self.rejects {
                return Err(RecorderError::WriteFailed("encoder exited".into()));
            }
            self.written += 1;
            Ok(())
        }

        fn frames_written(&self) -> u64 {
            self.written
        }

        fn release(self) -> framestamp::Result<()> {
            Ok(())
        }
    }

    impl CaptureBackend for TestBackend {
        type Source = TestSource;
        type Sink = TestSink;

        fn open_source(&mut self, camera: CameraId) -> framestamp::Result<TestSource> {
            self.opened.set(self.opened.get() + 1);
            match self.outcome {
                Outcome::NoCamera => Err(RecorderError::DeviceUnavailable {
                    camera,
                    reason: "no such device".into(),
                }),
                _ => Ok(TestSource { remaining: 2 }),
            }
        }

        fn open_sink(&mut self, config: &EncoderConfig) -> framestamp::Result<TestSink> {
            self.opened.set(self.opened.get() + 1);
            match self.outcome {
                Outcome::NoEncoder => Err(RecorderError::EncoderInitFailed {
                    path: config.output_path.clone(),
                    reason: "codec unavailable".into(),
                }),
                outcome => Ok(TestSink {
                    rejects: matches!(outcome, Outcome::RejectsFrames),
                    written: 0,
                }),
            }
        }
    }

    fn record_to(output: &str, outcome: Outcome) -> Result<SessionReport> {
        record(
            output,
            None,
            TestBackend::new(outcome),
            StopSignal::never(),
            CaptureOptions::default(),
        )
    }

    fn clip_path(dir: &TempDir) -> String {
        dir.path().join("clip.mp4").to_string_lossy().into_owned()
    }

    #[test]
    fn test_completed_recording_exits_zero() {
        let dir = TempDir::new().unwrap();
        let result = record_to(&clip_path(&dir), Outcome::Records);

        assert_eq!(result.as_ref().unwrap().frames_recorded, 2);
        assert_eq!(exit_status(&result), 0);
        assert!(dir.path().join("clip.json").is_file());
    }

    #[test]
    fn test_bad_extension_exits_non_zero_without_opening_camera() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("clip.MP4").to_string_lossy().into_owned();
        let backend = TestBackend::new(Outcome::Records);
        let opened = Rc::clone(&backend.opened);

        let result = record(
            &output,
            None,
            backend,
            StopSignal::never(),
            CaptureOptions::default(),
        );

        assert_ne!(exit_status(&result), 0);
        assert_eq!(opened.get(), 0);
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RecorderError>(),
            Some(RecorderError::InvalidOutputExtension { .. })
        ));
    }

    #[test]
    fn test_device_unavailable_exits_non_zero() {
        let dir = TempDir::new().unwrap();
        let result = record_to(&clip_path(&dir), Outcome::NoCamera);

        assert_ne!(exit_status(&result), 0);
        assert!(matches!(
            result.unwrap_err().downcast_ref::<RecorderError>(),
            Some(RecorderError::DeviceUnavailable { .. })
        ));
    }

    #[test]
    fn test_encoder_init_failure_exits_non_zero() {
        let dir = TempDir::new().unwrap();
        let result = record_to(&clip_path(&dir), Outcome::NoEncoder);

        assert_ne!(exit_status(&result), 0);
        assert!(matches!(
            result.unwrap_err().downcast_ref::<RecorderError>(),
            Some(RecorderError::EncoderInitFailed { .. })
        ));
    }

    #[test]
    fn test_encoder_rejecting_every_frame_exits_non_zero() {
        let dir = TempDir::new().unwrap();
        let result = record_to(&clip_path(&dir), Outcome::RejectsFrames);

        assert_eq!(result.as_ref().unwrap().frames_recorded, 0);
        assert_ne!(exit_status(&result), 0);
    }

    #[test]
    fn test_positionals_and_flags() {
        let cli = Cli::try_parse_from([
            "framestamp",
            "clip.mp4",
            "1",
            "--max-empty-frames",
            "50",
            "--buffers",
            "8",
        ])
        .unwrap();

        assert_eq!(cli.output.as_deref(), Some("clip.mp4"));
        assert_eq!(cli.camera.as_deref(), Some("1"));
        assert_eq!(cli.max_empty_frames, Some(50));
        assert_eq!(cli.buffers, 8);
        assert_eq!(cli.progress_every, 30);
        assert!(cli.ffmpeg.is_none());
    }

    #[test]
    fn test_buffer_default_follows_library() {
        let cli = Cli::try_parse_from(["framestamp", "clip.mp4"]).unwrap();
        assert_eq!(cli.buffers, DEFAULT_BUFFER_COUNT);
    }

    #[test]
    fn test_no_arguments_parses_to_usage() {
        let cli = Cli::try_parse_from(["framestamp"]).unwrap();
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_non_integer_camera_is_accepted_by_parser() {
        let cli = Cli::try_parse_from(["framestamp", "clip.mp4", "-2"]).unwrap();
        assert_eq!(cli.camera.as_deref(), Some("-2"));
    }
}
