// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Frame sink that pipes frames into an `ffmpeg` child process.

use std::fs::{self, File};
use std::io::Write;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use crate::core::{
    EncoderConfig, FrameGeometry, FrameSink, PixelFormat, RecorderError, Result, VideoFrame,
};

/// How long a freshly spawned encoder is watched for an early exit
/// (bad arguments, unknown muxer) before it counts as started.
const STARTUP_GRACE: Duration = Duration::from_millis(250);

/// Encodes frames by writing them to `ffmpeg`'s stdin.
///
/// Each `write` hands the whole frame to the pipe before returning, so frames
/// reach the encoder in call order. `release` closes the pipe and waits for
/// `ffmpeg` to write the MP4 trailer.
pub struct FfmpegEncoderSink {
    child: Child,
    stdin: Option<ChildStdin>,
    output_path: PathBuf,
    geometry: FrameGeometry,
    input_format: PixelFormat,
    frames_written: u64,
}

impl FfmpegEncoderSink {
    /// Start `ffmpeg` for `config`.
    ///
    /// Fails with `EncoderInitFailed` if the geometry or rate is unusable, the
    /// output file can't be created, or the process doesn't start or exits
    /// within [`STARTUP_GRACE`]. No process and no empty output file are left
    /// behind on failure.
    ///
    /// The child runs in its own process group: a terminal Ctrl+C reaches the
    /// recorder only, and the encoder ends when its stdin is closed, after the
    /// last frame the ledger recorded.
    pub fn spawn(ffmpeg: &Path, config: &EncoderConfig) -> Result<Self> {
        let init_failed = |reason: String| RecorderError::EncoderInitFailed {
            path: config.output_path.clone(),
            reason,
        };

        if config.geometry.is_empty() {
            return Err(init_failed(format!("invalid frame size {}", config.geometry)));
        }
        if config.fps.is_nan() || config.fps <= 0.0 {
            return Err(init_failed(format!("invalid frame rate {}", config.fps)));
        }

        // Fails early on a read-only or missing destination; ffmpeg overwrites it (-y).
        File::create(&config.output_path).map_err(|e| init_failed(e.to_string()))?;

        let args = encoder_args(config);
        tracing::debug!("Spawning {} {:?}", ffmpeg.display(), args);

        let mut command = Command::new(ffmpeg);
        command
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .process_group(0);

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                let _ = fs::remove_file(&config.output_path);
                return Err(init_failed(format!("cannot start {}: {}", ffmpeg.display(), e)));
            }
        };

        let Some(stdin) = child.stdin.take() else {
            let _ = child.kill();
            let _ = child.wait();
            let _ = fs::remove_file(&config.output_path);
            return Err(init_failed("encoder stdin not available".into()));
        };

        if let Some(status) = early_exit(&mut child, STARTUP_GRACE) {
            drop(stdin);
            let _ = fs::remove_file(&config.output_path);
            return Err(init_failed(format!("encoder exited during startup ({})", status)));
        }

        tracing::info!(
            "FFmpeg encoder started (pid {}): {} {} @ {} fps -> {}",
            child.id(),
            config.codec.tag(),
            config.geometry,
            config.fps,
            config.output_path.display()
        );

        Ok(Self {
            child,
            stdin: Some(stdin),
            output_path: config.output_path.clone(),
            geometry: config.geometry,
            input_format: config.input_format,
            frames_written: 0,
        })
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

impl FrameSink for FfmpegEncoderSink {
    fn write(&mut self, frame: &VideoFrame) -> Result<()> {
        if frame.geometry != self.geometry || frame.format != self.input_format {
            return Err(RecorderError::WriteFailed(format!(
                "frame is {} {:?}, encoder expects {} {:?}",
                frame.geometry, frame.format, self.geometry, self.input_format
            )));
        }

        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| RecorderError::WriteFailed("encoder input already closed".into()))?;
        stdin
            .write_all(&frame.data)
            .map_err(|e| RecorderError::WriteFailed(format!("encoder pipe: {}", e)))?;

        self.frames_written += 1;
        Ok(())
    }

    fn frames_written(&self) -> u64 {
        self.frames_written
    }

    fn release(mut self) -> Result<()> {
        // Closing stdin is ffmpeg's end-of-stream; it then writes the trailer.
        drop(self.stdin.take());
        let status = self.child.wait()?;
        if !status.success() {
            return Err(RecorderError::WriteFailed(format!(
                "encoder exited with {} after {} frames",
                status, self.frames_written
            )));
        }

        tracing::info!(
            "FFmpeg encoder finalized {} ({} frames)",
            self.output_path.display(),
            self.frames_written
        );
        Ok(())
    }
}

impl Drop for FfmpegEncoderSink {
    fn drop(&mut self) {
        if self.stdin.take().is_some() {
            let _ = self.child.wait();
        }
    }
}

/// Exit status if `child` terminates within `grace`. The child is reaped.
fn early_exit(child: &mut Child, grace: Duration) -> Option<ExitStatus> {
    let deadline = Instant::now() + grace;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Some(status),
            Ok(None) if Instant::now() < deadline => std::thread::sleep(Duration::from_millis(10)),
            Ok(None) => return None,
            Err(e) => {
                tracing::debug!("Cannot poll encoder process: {}", e);
                return None;
            }
        }
    }
}

/// Command line for encoding `config` from stdin.
pub fn encoder_args(config: &EncoderConfig) -> Vec<String> {
    let mut args: Vec<String> = ["-hide_banner", "-loglevel", "error", "-y"]
        .into_iter()
        .map(String::from)
        .collect();

    match config.input_format.ffmpeg_pix_fmt() {
        Some(pix_fmt) => args.extend([
            "-f".to_string(),
            "rawvideo".to_string(),
            "-pix_fmt".to_string(),
            pix_fmt.to_string(),
            "-video_size".to_string(),
            config.geometry.to_string(),
        ]),
        None => args.extend(["-f".to_string(), "mjpeg".to_string()]),
    }

    args.extend([
        "-framerate".to_string(),
        config.fps.to_string(),
        "-i".to_string(),
        "-".to_string(),
        "-an".to_string(),
        "-c:v".to_string(),
        config.codec.ffmpeg_encoder().to_string(),
        "-tag:v".to_string(),
        config.codec.tag().to_string(),
        "-q:v".to_string(),
        "3".to_string(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
        "-f".to_string(),
        config.container.ffmpeg_muxer().to_string(),
        config.output_path.to_string_lossy().into_owned(),
    ]);
    args
}
