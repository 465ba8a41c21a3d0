// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Positional argument checks.

use std::path::PathBuf;

use framestamp::{CameraId, ContainerFormat, RecorderError};

/// Accept the output path only if it ends in exactly `.mp4` (case-sensitive).
pub fn validate_output_path(output: &str) -> Result<PathBuf, RecorderError> {
    let expected = ContainerFormat::Mp4.required_suffix();
    if output.ends_with(expected) {
        Ok(PathBuf::from(output))
    } else {
        Err(RecorderError::InvalidOutputExtension {
            path: output.to_string(),
            expected,
        })
    }
}

/// Parse the optional camera argument. Anything that isn't a non-negative
/// integer falls back to camera 0 with a warning.
pub fn parse_camera_or_default(camera: Option<&str>) -> CameraId {
    match camera.map(str::parse::<CameraId>) {
        None => CameraId::default(),
        Some(Ok(id)) => id,
        Some(Err(e)) => {
            tracing::warn!("{}. Using default camera (0)", e);
            CameraId::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mp4_suffix_accepted() {
        assert_eq!(
            validate_output_path("out/clip.mp4").unwrap(),
            PathBuf::from("out/clip.mp4")
        );
        assert!(validate_output_path("archive.tar.mp4").is_ok());
    }

    #[test]
    fn test_other_suffixes_rejected() {
        for bad in ["clip.MP4", "clip.mov", "clip.mp4 ", "clip", "clip.mp4.bak"] {
            assert!(
                matches!(
                    validate_output_path(bad),
                    Err(RecorderError::InvalidOutputExtension { expected: ".mp4", .. })
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_camera_defaults_to_zero() {
        assert_eq!(parse_camera_or_default(None), CameraId(0));
        assert_eq!(parse_camera_or_default(Some("front")), CameraId(0));
        assert_eq!(parse_camera_or_default(Some("-3")), CameraId(0));
    }

    #[test]
    fn test_camera_parsed() {
        assert_eq!(parse_camera_or_default(Some("2")), CameraId(2));
    }
}
