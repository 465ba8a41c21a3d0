// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

mod frame_source;

pub use frame_source::{FrameSource, PullResult};
