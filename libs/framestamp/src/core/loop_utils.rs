// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Loop utilities with stop signal support
//!
//! Provides a helper for loops that run until their body says they're done
//! or until a [`StopSignal`] is raised, whichever comes first.
//!
//! # Example
//! ```no_run
//! use framestamp::core::loop_utils::{stop_aware_loop, LoopControl};
//! use framestamp::core::signals::stop_channel;
//!
//! let (_handle, signal) = stop_channel();
//! let mut remaining = 3;
//! stop_aware_loop(&signal, || {
//!     remaining -= 1;
//!     if remaining == 0 {
//!         return Ok::<_, ()>(LoopControl::Break);
//!     }
//!     Ok(LoopControl::Continue)
//! })
//! .unwrap();
//! ```

use crate::core::signals::StopSignal;

/// Control flow for stop-aware loops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    /// Continue loop iteration
    Continue,
    /// Break loop and exit gracefully
    Break,
}

/// Why a stop-aware loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The stop signal was observed.
    StopRequested,
    /// The body returned [`LoopControl::Break`].
    Completed,
}

/// Run `f` until it breaks, errors, or `stop` is raised.
///
/// The signal is polled once after every iteration, never in the middle of
/// one, so whatever the body was doing (a blocking read, an encode) always
/// finishes first.
///
/// # Errors
/// Returns the error from the user closure if it fails.
pub fn stop_aware_loop<F, E>(stop: &StopSignal, mut f: F) -> std::result::Result<LoopExit, E>
where
    F: FnMut() -> std::result::Result<LoopControl, E>,
{
    loop {
        match f()? {
            LoopControl::Continue => {}
            LoopControl::Break => {
                tracing::trace!("Loop exited via LoopControl::Break");
                return Ok(LoopExit::Completed);
            }
        }

        if stop.is_raised() {
            tracing::info!("Stop signal received, exiting loop");
            return Ok(LoopExit::StopRequested);
        }
    }
}
