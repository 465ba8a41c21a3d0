// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use super::Clock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Wall clock backed by `SystemTime`.
///
/// Sampled fresh on every call. Unlike a start-instant-plus-elapsed clock this
/// follows system clock adjustments, which is what an absolute
/// "when was this frame committed" timestamp needs.
pub struct SystemClock {
    description: String,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::with_description("System Clock (Unix epoch)".to_string())
    }

    pub fn with_description(description: String) -> Self {
        Self { description }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ns(&self) -> i64 {
        epoch_nanos(SystemTime::now())
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Signed nanoseconds between `UNIX_EPOCH` and `time`, saturating at the i64 range.
pub(crate) fn epoch_nanos(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_nanos()).unwrap_or(i64::MAX),
        Err(before) => i64::try_from(before.duration().as_nanos())
            .map(|ns| -ns)
            .unwrap_or(i64::MIN),
    }
}
