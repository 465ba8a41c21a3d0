// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Stop signalling for the capture loop.
//!
//! The loop never reads shared mutable flags. It owns a [`StopSignal`] and
//! polls it once per iteration; anything that wants the recording to end
//! (Ctrl+C, SIGTERM, a key press, a test) holds a cloned [`StopHandle`].

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::core::Result;

/// Create a connected stop handle / stop signal pair.
pub fn stop_channel() -> (StopHandle, StopSignal) {
    // Capacity 1: the first raise parks a token that is never consumed,
    // so the signal stays raised.
    let (tx, rx) = bounded(1);
    (StopHandle { tx }, StopSignal { rx })
}

/// Sending half. Cheap to clone, safe to move to other threads.
#[derive(Clone, Debug)]
pub struct StopHandle {
    tx: Sender<()>,
}

impl StopHandle {
    /// Ask the recording to stop after the current iteration.
    pub fn raise(&self) {
        match self.tx.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => {}
            Err(TrySendError::Disconnected(())) => {
                tracing::debug!("Stop raised after the session was dropped");
            }
        }
    }
}

/// Receiving half, owned by the session.
#[derive(Debug)]
pub struct StopSignal {
    rx: Receiver<()>,
}

impl StopSignal {
    /// A signal nobody can raise; the loop only ends when the source does.
    pub fn never() -> Self {
        stop_channel().1
    }

    /// True once any handle has called [`StopHandle::raise`]. Never resets.
    pub fn is_raised(&self) -> bool {
        !self.rx.is_empty()
    }
}

/// Install Ctrl+C / SIGTERM handlers that raise `handle`.
///
/// Uses the `ctrlc` crate with its `termination` feature so both interactive
/// interrupts and `kill` end the recording through the normal stop path.
pub fn install_signal_handlers(handle: StopHandle) -> Result<()> {
    ctrlc::set_handler(move || {
        tracing::info!("Interrupt received, stopping recording");
        handle.raise();
    })
    .map_err(std::io::Error::other)?;

    tracing::debug!("Signal handlers installed (SIGINT, SIGTERM)");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_starts_lowered() {
        let (_handle, signal) = stop_channel();
        assert!(!signal.is_raised());
    }

    #[test]
    fn test_raise_latches() {
        let (handle, signal) = stop_channel();
        handle.raise();
        assert!(signal.is_raised());
        assert!(signal.is_raised());

        // Raising again is harmless.
        handle.raise();
        assert!(signal.is_raised());
    }

    #[test]
    fn test_raise_from_another_thread() {
        let (handle, signal) = stop_channel();
        let remote = handle.clone();
        std::thread::spawn(move || remote.raise()).join().unwrap();
        assert!(signal.is_raised());
    }

    #[test]
    fn test_never_signal() {
        assert!(!StopSignal::never().is_raised());
    }

    #[test]
    fn test_raise_after_signal_dropped() {
        let (handle, signal) = stop_channel();
        drop(signal);
        handle.raise();
    }
}
