// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Clock trait - passive wall-clock reference for frame stamping

/// Passive clock interface queried once per encoded frame.
///
/// ## Design
///
/// - **Passive**: the recording loop calls `now_ns()`; the clock never schedules anything
/// - **Epoch based**: values are nanoseconds since the Unix epoch, so ledgers from
///   different machines and runs can be aligned against each other
/// - **Not strictly monotonic**: consecutive calls are made at increasing real
///   times, but an adjusted system clock can step backwards
///
/// ## Usage in the capture loop
///
/// ```rust,ignore
/// let frame = source.pull()?;
/// let timestamp_ns = clock.now_ns(); // immediately before the encode call
/// sink.write(&frame)?;
/// ledger.append(timestamp_ns);
/// ```
pub trait Clock: Send + Sync {
    /// Current wall-clock time in nanoseconds since the Unix epoch.
    fn now_ns(&self) -> i64;

    /// Human-readable clock description
    ///
    /// Used for debugging and logging.
    fn description(&self) -> &str;
}
