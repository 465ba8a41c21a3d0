// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Linux capture backend: V4L2 camera in, FFmpeg encoder out.

mod backend;
pub mod ffmpeg;
mod v4l2_camera;

pub use backend::LinuxCaptureBackend;
pub use ffmpeg::FfmpegEncoderSink;
pub use v4l2_camera::V4l2FrameSource;
