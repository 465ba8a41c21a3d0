// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! V4L2 camera source.

use std::io;

use v4l::buffer::Type;
use v4l::fraction::Fraction;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, FourCC};

use crate::core::{
    CameraId, FrameGeometry, FrameSource, PixelFormat, PullResult, RecorderError, Result,
    VideoFrame,
};

/// Formats to ask the driver for, most preferred first.
const PREFERRED_FOURCCS: [&[u8; 4]; 4] = [b"YUYV", b"RGB3", b"BGR3", b"MJPG"];

/// Memory-mapped capture from `/dev/video<N>`.
pub struct V4l2FrameSource {
    camera: CameraId,
    // Declared before `device` so streaming stops before the fd closes.
    stream: MmapStream<'static>,
    _device: Device,
    geometry: FrameGeometry,
    format: PixelFormat,
    fps: f64,
}

impl V4l2FrameSource {
    /// Open the camera, negotiate a pixel format, and start streaming.
    pub fn open(camera: CameraId, buffer_count: u32) -> Result<Self> {
        let unavailable = |reason: String| RecorderError::DeviceUnavailable { camera, reason };

        let device = Device::new(camera.index() as usize)
            .map_err(|e| unavailable(format!("cannot open /dev/video{}: {}", camera, e)))?;

        let (geometry, format) = negotiate_format(&device).map_err(unavailable)?;

        let fps = match device.params() {
            Ok(params) => fps_from_interval(params.interval),
            Err(e) => {
                tracing::debug!("Camera {} has no frame interval: {}", camera, e);
                0.0
            }
        };

        let stream = MmapStream::with_buffers(&device, Type::VideoCapture, buffer_count)
            .map_err(|e| unavailable(format!("cannot start streaming: {}", e)))?;

        tracing::debug!(
            "Opened /dev/video{}: {} {:?}, {} buffers",
            camera,
            geometry,
            format,
            buffer_count
        );

        Ok(Self {
            camera,
            stream,
            _device: device,
            geometry,
            format,
            fps,
        })
    }

    pub fn camera(&self) -> CameraId {
        self.camera
    }
}

impl FrameSource for V4l2FrameSource {
    fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    fn frame_rate(&self) -> f64 {
        self.fps
    }

    fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    fn pull(&mut self) -> Result<PullResult> {
        match self.stream.next() {
            Ok((buf, meta)) => {
                let used = (meta.bytesused as usize).min(buf.len());
                let frame = VideoFrame::new(buf[..used].to_vec(), self.geometry, self.format);
                if frame.is_complete() {
                    Ok(PullResult::Frame(frame))
                } else {
                    tracing::debug!(
                        "Dropping incomplete buffer {} ({} bytes)",
                        meta.sequence,
                        used
                    );
                    Ok(PullResult::Empty)
                }
            }
            Err(e) if is_transient(&e) => Ok(PullResult::Empty),
            Err(e) => Err(RecorderError::CaptureFailed(format!(
                "camera {}: {}",
                self.camera, e
            ))),
        }
    }

    fn release(self) {
        let camera = self.camera;
        drop(self);
        tracing::debug!("Released /dev/video{}", camera);
    }
}

/// Try the preferred formats at the driver's current size; keep the first it accepts.
fn negotiate_format(device: &Device) -> std::result::Result<(FrameGeometry, PixelFormat), String> {
    let current = device
        .format()
        .map_err(|e| format!("cannot query format: {}", e))?;

    for fourcc in PREFERRED_FOURCCS {
        let mut wanted = current.clone();
        wanted.fourcc = FourCC::new(fourcc);
        match device.set_format(&wanted) {
            Ok(actual) => {
                if let Some(format) = pixel_format_for(&actual.fourcc.repr) {
                    return Ok((FrameGeometry::new(actual.width, actual.height), format));
                }
            }
            Err(e) => tracing::debug!("Driver refused {}: {}", fourcc_name(fourcc), e),
        }
    }

    Err(format!(
        "no supported pixel format (driver offers {})",
        fourcc_name(&current.fourcc.repr)
    ))
}

fn pixel_format_for(fourcc: &[u8; 4]) -> Option<PixelFormat> {
    match fourcc {
        b"YUYV" => Some(PixelFormat::Yuyv422),
        b"RGB3" => Some(PixelFormat::Rgb24),
        b"BGR3" => Some(PixelFormat::Bgr24),
        b"MJPG" => Some(PixelFormat::Mjpeg),
        _ => None,
    }
}

fn fourcc_name(fourcc: &[u8; 4]) -> String {
    String::from_utf8_lossy(fourcc).into_owned()
}

/// V4L2 reports seconds per frame; zero numerator means unknown.
fn fps_from_interval(interval: Fraction) -> f64 {
    if interval.numerator == 0 {
        return 0.0;
    }
    f64::from(interval.denominator) / f64::from(interval.numerator)
}

fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_from_interval() {
        assert_eq!(fps_from_interval(Fraction::new(1, 30)), 30.0);
        assert_eq!(fps_from_interval(Fraction::new(1001, 30000)), 30000.0 / 1001.0);
        assert_eq!(fps_from_interval(Fraction::new(0, 30)), 0.0);
    }

    #[test]
    fn test_pixel_format_mapping() {
        assert_eq!(pixel_format_for(b"YUYV"), Some(PixelFormat::Yuyv422));
        assert_eq!(pixel_format_for(b"MJPG"), Some(PixelFormat::Mjpeg));
        assert_eq!(pixel_format_for(b"NV12"), None);
    }

    #[test]
    fn test_transient_errors() {
        assert!(is_transient(&io::Error::from(io::ErrorKind::Interrupted)));
        assert!(is_transient(&io::Error::from(io::ErrorKind::WouldBlock)));
        assert!(!is_transient(&io::Error::from(io::ErrorKind::NotFound)));
    }

    #[test]
    fn test_missing_device_is_unavailable() {
        match V4l2FrameSource::open(CameraId(250), 2) {
            Err(RecorderError::DeviceUnavailable { camera, .. }) => assert_eq!(camera, CameraId(250)),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("/dev/video250 should not exist"),
        }
    }
}
