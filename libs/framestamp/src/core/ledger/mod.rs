// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Timestamp ledger - one `(frame, timestamp_ns)` record per encoded frame.

mod entry;
mod path;
mod timestamp_ledger;

pub use entry::TimestampEntry;
pub use path::{derive_ledger_path, LEDGER_EXTENSION};
pub use timestamp_ledger::TimestampLedger;
