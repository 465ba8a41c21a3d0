// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

mod clock_trait;
mod system_clock;

pub use clock_trait::Clock;
pub use system_clock::SystemClock;
