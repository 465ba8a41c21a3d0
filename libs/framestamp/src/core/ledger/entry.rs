// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use serde::{Deserialize, Serialize};

/// One ledger record. Serialized as `{ "frame": <index>, "timestamp_ns": <ns> }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampEntry {
    /// Zero-based ordinal of the frame within the session.
    #[serde(rename = "frame")]
    pub frame_index: u64,
    /// Nanoseconds since the Unix epoch, sampled right before the frame was encoded.
    pub timestamp_ns: i64,
}
