// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! A tool for folding repository download logs into per-day package statistics.
//!
//! This crate provides functionality to:
//! - Parse download logs into individual download records
//! - Resolve and cache commit checksums to the refs they were built from
//! - Classify refs into the identifiers statistics are grouped under
//! - Merge downloads into incrementally-updated per-day JSON files

pub mod log;
pub mod refs;
pub mod stats;

// Re-export key types for convenience
pub use log::DownloadRecord;
pub use refs::{CommitRefs, Ref, RefCache, ResolveCommit};
pub use stats::{summarize_update, update_statistics, DayStats, InstallCounts, UpdateSummary};
