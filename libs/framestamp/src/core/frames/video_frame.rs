// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use serde::{Deserialize, Serialize};

/// Frame dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameGeometry {
    pub width: u32,
    pub height: u32,
}

impl FrameGeometry {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl std::fmt::Display for FrameGeometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Pixel layout of the bytes carried by a [`VideoFrame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PixelFormat {
    /// Packed 4:2:2 YUV, 2 bytes per pixel (V4L2 `YUYV`).
    #[default]
    Yuyv422,
    /// Packed RGB, 3 bytes per pixel (V4L2 `RGB3`).
    Rgb24,
    /// Packed BGR, 3 bytes per pixel (V4L2 `BGR3`).
    Bgr24,
    /// One complete JPEG image per frame (V4L2 `MJPG`).
    Mjpeg,
}

impl PixelFormat {
    /// Bytes per pixel for packed raw formats; `None` for compressed ones.
    pub fn bytes_per_pixel(&self) -> Option<usize> {
        match self {
            PixelFormat::Yuyv422 => Some(2),
            PixelFormat::Rgb24 | PixelFormat::Bgr24 => Some(3),
            PixelFormat::Mjpeg => None,
        }
    }

    /// Exact frame size in bytes for raw formats.
    pub fn frame_len(&self, geometry: FrameGeometry) -> Option<usize> {
        self.bytes_per_pixel()
            .map(|bpp| geometry.pixel_count() * bpp)
    }

    /// FFmpeg `-pix_fmt` name for raw formats.
    pub fn ffmpeg_pix_fmt(&self) -> Option<&'static str> {
        match self {
            PixelFormat::Yuyv422 => Some("yuyv422"),
            PixelFormat::Rgb24 => Some("rgb24"),
            PixelFormat::Bgr24 => Some("bgr24"),
            PixelFormat::Mjpeg => None,
        }
    }
}

/// One captured frame, owned by the recording loop until it has been encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    /// Frame bytes in `format` layout.
    pub data: Vec<u8>,
    pub geometry: FrameGeometry,
    pub format: PixelFormat,
}

impl VideoFrame {
    pub fn new(data: Vec<u8>, geometry: FrameGeometry, format: PixelFormat) -> Self {
        Self {
            data,
            geometry,
            format,
        }
    }

    /// True when the frame carries a full image: non-empty, and for raw formats
    /// exactly `width * height * bytes_per_pixel` bytes.
    pub fn is_complete(&self) -> bool {
        if self.data.is_empty() || self.geometry.is_empty() {
            return false;
        }
        match self.format.frame_len(self.geometry) {
            Some(expected) => self.data.len() == expected,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_frame_completeness() {
        let geometry = FrameGeometry::new(4, 2);
        let full = VideoFrame::new(vec![0; 16], geometry, PixelFormat::Yuyv422);
        assert!(full.is_complete());

        let truncated = VideoFrame::new(vec![0; 10], geometry, PixelFormat::Yuyv422);
        assert!(!truncated.is_complete());

        let empty = VideoFrame::new(Vec::new(), geometry, PixelFormat::Rgb24);
        assert!(!empty.is_complete());
    }

    #[test]
    fn test_mjpeg_frame_only_needs_bytes() {
        let frame = VideoFrame::new(vec![0xff, 0xd8, 0xff], FrameGeometry::new(640, 480), PixelFormat::Mjpeg);
        assert!(frame.is_complete());
        assert_eq!(PixelFormat::Mjpeg.frame_len(frame.geometry), None);
    }

    #[test]
    fn test_geometry_display() {
        assert_eq!(FrameGeometry::new(1280, 720).to_string(), "1280x720");
        assert!(FrameGeometry::new(0, 720).is_empty());
    }
}
