// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

/// Session lifecycle status.
///
/// `Uninitialized -> Initialized -> Recording -> Stopped`. `Stopped` is
/// terminal; recording again needs a new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Uninitialized,
    Initialized,
    Recording,
    Stopped,
}
