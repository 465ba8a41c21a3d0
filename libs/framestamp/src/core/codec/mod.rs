// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

mod encoder_config;
mod video_codec;

pub use encoder_config::EncoderConfig;
pub use video_codec::{ContainerFormat, VideoCodec};
